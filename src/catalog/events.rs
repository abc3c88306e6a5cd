//! Catalog change notifications
//!
//! Every successful mutation on the store is broadcast so SSE clients can
//! refetch the listings they show.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// =============================================================================
// EVENT TYPES
// =============================================================================

/// Events emitted by the store after a committed write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum CatalogEvent {
    UnitChanged { id: String, action: ChangeAction },
    BuildingChanged { id: String, action: ChangeAction },
    /// A visitor submitted the scheduling/contact form
    AppointmentReceived { id: String },
    /// The whole catalog was replaced (seeding)
    Reloaded { buildings: usize, units: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

impl CatalogEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::UnitChanged { .. } => "unit-changed",
            Self::BuildingChanged { .. } => "building-changed",
            Self::AppointmentReceived { .. } => "appointment-received",
            Self::Reloaded { .. } => "reloaded",
        }
    }
}

// =============================================================================
// EVENT BROADCASTER
// =============================================================================

/// Broadcasts catalog events to all subscribers
#[derive(Clone)]
pub struct CatalogEvents {
    sender: broadcast::Sender<CatalogEvent>,
}

impl CatalogEvents {
    /// Create a new broadcaster with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcast an event, returning how many receivers got it
    pub fn broadcast(&self, event: CatalogEvent) -> usize {
        // send() fails only when nobody is listening
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn unit_changed(&self, id: &str, action: ChangeAction) {
        self.broadcast(CatalogEvent::UnitChanged {
            id: id.to_string(),
            action,
        });
    }

    pub fn building_changed(&self, id: &str, action: ChangeAction) {
        self.broadcast(CatalogEvent::BuildingChanged {
            id: id.to_string(),
            action,
        });
    }
}

impl Default for CatalogEvents {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_change() {
        let events = CatalogEvents::new(16);
        let mut rx = events.subscribe();

        events.unit_changed("CRC-501", ChangeAction::Updated);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            CatalogEvent::UnitChanged {
                id: "CRC-501".to_string(),
                action: ChangeAction::Updated,
            }
        );
        assert_eq!(event.name(), "unit-changed");
    }

    #[test]
    fn test_no_subscribers() {
        let events = CatalogEvents::new(16);
        let count = events.broadcast(CatalogEvent::Reloaded {
            buildings: 0,
            units: 0,
        });
        assert_eq!(count, 0);
    }
}
