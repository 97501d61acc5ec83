//! Fake upstream HTTP services
//!
//! Binds an axum router to an ephemeral localhost port so the real reqwest
//! clients can be exercised end to end.

use axum::Router;

/// Serve `router` on 127.0.0.1:0 and return its base URL
pub async fn spawn_fake_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}
