//! Outbound lifecycle events.
//!
//! The core publishes fire-and-forget events through an injected sink; it
//! never awaits or retries delivery. Transports (mail, queues, websockets)
//! live outside this crate and subscribe to whichever events they care
//! about.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::{BookingId, Claim, ClaimId, ClaimStatus, TrainId, UserId};
use crate::form::ClaimFormSnapshot;

/// A journey finished with a recorded final delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingCompleted {
    pub booking_id: BookingId,
    pub train_id: TrainId,
    pub delay_minutes: i64,

    /// Whether the delay alone clears the 60-minute claim threshold.
    pub is_eligible_for_claim: bool,

    pub completed_at: DateTime<Utc>,
}

/// A claim record was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimCreated {
    pub claim: Claim,
    pub user_id: UserId,
    pub booking_id: BookingId,
    pub form_data: ClaimFormSnapshot,
}

/// A claim's status changed, for any reason. General audit interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimStatusChanged {
    pub claim_id: ClaimId,
    pub previous_status: ClaimStatus,
    pub new_status: ClaimStatus,
    pub user_id: UserId,
}

/// A claim was marked as submitted. Emitted alongside the status-changed
/// event for subscribers that only care about submissions (e.g. stopping
/// reminder notifications).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSubmitted {
    pub claim_id: ClaimId,
    pub user_id: UserId,
    pub booking_id: BookingId,
    pub submitted_at: DateTime<Utc>,
}

/// Any outbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    BookingCompleted(BookingCompleted),
    ClaimCreated(ClaimCreated),
    ClaimStatusChanged(ClaimStatusChanged),
    ClaimSubmitted(ClaimSubmitted),
}

/// Destination for outbound events.
///
/// `publish` must not block on delivery; the event pipeline is strictly
/// fire-and-forget from the core's point of view.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: Event);
}

/// Sink that logs each event as structured JSON. Useful standalone and as
/// the default drain in the service binary.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: Event) {
        match serde_json::to_string(&event) {
            Ok(json) => info!(event = %json, "event published"),
            Err(e) => debug!(error = %e, "event not serializable"),
        }
    }
}

/// Sink backed by an unbounded tokio channel.
///
/// Dropped receivers lose events silently; delivery guarantees are the
/// subscriber's problem, not ours.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelSink {
    /// Create a sink and the receiving half for the subscriber task.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            debug!("event dropped: no subscriber");
        }
    }
}

/// Test sink that records everything it receives.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<Event>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn publish(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}
