//! Catalog event types and broadcast bus
//!
//! Events are published by the ingest pipeline and the catalog session and
//! forwarded to SSE clients. Emitting never blocks and never fails the
//! operation that produced the event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events describing catalog changes during a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CatalogEvent {
    /// An upload batch entered the resolution pipeline
    BatchStarted {
        batch_size: usize,
        timestamp: DateTime<Utc>,
    },

    /// One image resolved to a catalog card
    ImageResolved {
        image_id: Uuid,
        display_name: String,
        catalog_id: String,
        card_name: String,
        version_count: usize,
    },

    /// One image landed in the unresolved list
    ImageUnresolved {
        image_id: Uuid,
        display_name: String,
        reason: String,
    },

    /// Every image of the batch has been processed
    BatchCompleted {
        resolved: usize,
        unresolved: usize,
        errors: usize,
        timestamp: DateTime<Utc>,
    },

    /// A user-supplied name was looked up for an unresolved entry
    ManualResolutionAttempted {
        entry: String,
        name: String,
        resolved: bool,
    },

    /// The focused card changed
    FocusChanged { index: usize },

    /// A different printing was chosen for the focused card
    VersionSelected { index: usize, catalog_id: String },

    /// The preferred set used for version ordering changed
    PreferredSetChanged { set_code: Option<String> },
}

impl CatalogEvent {
    /// Get event type as string for SSE event names
    pub fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::BatchStarted { .. } => "BatchStarted",
            CatalogEvent::ImageResolved { .. } => "ImageResolved",
            CatalogEvent::ImageUnresolved { .. } => "ImageUnresolved",
            CatalogEvent::BatchCompleted { .. } => "BatchCompleted",
            CatalogEvent::ManualResolutionAttempted { .. } => "ManualResolutionAttempted",
            CatalogEvent::FocusChanged { .. } => "FocusChanged",
            CatalogEvent::VersionSelected { .. } => "VersionSelected",
            CatalogEvent::PreferredSetChanged { .. } => "PreferredSetChanged",
        }
    }
}

/// Broadcast bus for catalog events
///
/// Cloning is cheap; all clones share one channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per slow subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: CatalogEvent,
    ) -> Result<usize, broadcast::error::SendError<CatalogEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: CatalogEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_err() {
        let bus = EventBus::new(10);
        assert!(bus.emit(CatalogEvent::FocusChanged { index: 0 }).is_err());
        // Lossy emit swallows the same condition
        bus.emit_lossy(CatalogEvent::FocusChanged { index: 0 });
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.emit_lossy(CatalogEvent::VersionSelected {
            index: 2,
            catalog_id: "abc".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "VersionSelected");
    }

    #[test]
    fn test_serialized_event_is_tagged() {
        let json = serde_json::to_value(CatalogEvent::PreferredSetChanged {
            set_code: Some("lea".to_string()),
        })
        .unwrap();

        assert_eq!(json["type"], "PreferredSetChanged");
        assert_eq!(json["set_code"], "lea");
    }
}
