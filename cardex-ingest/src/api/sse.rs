//! Server-Sent Events for catalog updates

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /events
///
/// Streams every catalog event: batch progress, manual resolution attempts,
/// focus and version changes, preferred set changes.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    cardex_common::sse::create_event_sse_stream("cardex-ingest", &state.event_bus)
}
