//! Journey status classification.
//!
//! A pure function of (booking, train, now). Status is recomputed fresh on
//! every call rather than persisted as a transitioned state machine; each
//! call is self-consistent for its own `now`, which is what makes
//! time-travel testing trivial.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Booking, Train};

/// Grace period after scheduled arrival before a journey counts as
/// completed, covering unloading and realtime-feed lag.
pub const COMPLETION_BUFFER_MINS: i64 = 60;

/// Where a journey is in its life, as of a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStatus {
    /// The journey has not started.
    Pending,

    /// The train has departed and is inside the completion buffer.
    InProgress,

    /// The journey finished; a final delay can be read off.
    Completed,

    /// The journey date has passed but no train record exists. Distinct
    /// from "not departed yet": the train should be visible by now.
    Unknown,
}

impl fmt::Display for JourneyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JourneyStatus::Pending => "pending",
            JourneyStatus::InProgress => "in_progress",
            JourneyStatus::Completed => "completed",
            JourneyStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Result of one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyCheck {
    pub status: JourneyStatus,

    /// Only meaningful when `status` is [`JourneyStatus::Completed`].
    pub delay_minutes: Option<i64>,

    /// The `now` this check was computed for.
    pub checked_at: DateTime<Utc>,
}

/// Classify a booking's journey as of `now`.
///
/// With no matched train: [`JourneyStatus::Pending`] before the journey
/// date, [`JourneyStatus::Unknown`] from the journey date onwards. With a
/// train: pending before scheduled departure, in progress until scheduled
/// arrival plus the completion buffer, completed after.
pub fn classify(booking: &Booking, train: Option<&Train>, now: DateTime<Utc>) -> JourneyCheck {
    let (status, delay_minutes) = match train {
        None => {
            if now.date_naive() < booking.journey_date {
                (JourneyStatus::Pending, None)
            } else {
                (JourneyStatus::Unknown, None)
            }
        }
        Some(train) => {
            let completion =
                train.scheduled_arrival + Duration::minutes(COMPLETION_BUFFER_MINS);
            if now < train.scheduled_departure {
                (JourneyStatus::Pending, None)
            } else if now < completion {
                (JourneyStatus::InProgress, None)
            } else {
                (JourneyStatus::Completed, Some(final_delay(train)))
            }
        }
    };

    JourneyCheck {
        status,
        delay_minutes,
        checked_at: now,
    }
}

/// The final delay of a completed train, in minutes, never negative.
///
/// Prefers the observed arrival (rounded to the nearest minute); falls back
/// to the feed's own delay figure, then to zero.
fn final_delay(train: &Train) -> i64 {
    match train.actual_arrival {
        Some(actual) => {
            let secs = (actual - train.scheduled_arrival).num_seconds();
            let mins = (secs + 30).div_euclid(60);
            mins.max(0)
        }
        None => train.delay_minutes.unwrap_or(0).max(0),
    }
}
