//! Booking-to-train matching.
//!
//! Resolves a booking to the realtime train record for its trip. An
//! unmatched booking is an expected, retryable state: the feed simply has
//! not produced the trip yet. The delay monitor owns the re-poll policy;
//! this module only answers "is the train there right now".

use crate::domain::{Booking, Train, trip::InvalidTrainNumber};
use crate::store::{StoreError, TrainStore};

/// Reason string carried by unmatched results.
pub const NOT_FOUND: &str = "not_found";

/// Errors from matching. Note that "no train found" is not among them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchError {
    /// The booking's ticket carries a train number that cannot be
    /// normalized into a trip key.
    #[error(transparent)]
    InvalidTrainNumber(#[from] InvalidTrainNumber),

    /// The train store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of matching a booking against the train store.
#[derive(Debug, Clone)]
pub enum MatchResult {
    /// The booking's trip was found.
    Matched(Train),

    /// No train record exists yet for the trip. Retryable.
    NotFound,
}

impl MatchResult {
    /// Whether a train was found.
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    /// The matched train, if any.
    pub fn train(&self) -> Option<&Train> {
        match self {
            MatchResult::Matched(train) => Some(train),
            MatchResult::NotFound => None,
        }
    }

    /// The reason string for an unmatched result (`"not_found"`).
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            MatchResult::Matched(_) => None,
            MatchResult::NotFound => Some(NOT_FOUND),
        }
    }
}

/// Match a booking to its train record.
///
/// Tries the exact trip-key lookup first, then falls back to (normalized
/// number, journey date) for train records whose stored trip id was built
/// from an upstream key variant.
pub fn match_booking<S: TrainStore>(
    trains: &S,
    booking: &Booking,
) -> Result<MatchResult, MatchError> {
    let trip_key = booking.trip_key()?;

    if let Some(train) = trains.train_by_trip_id(&trip_key)? {
        return Ok(MatchResult::Matched(train));
    }

    let number = crate::domain::TrainNumber::parse(&booking.train_number)?;
    if let Some(train) = trains.train_by_number_and_date(&number, booking.journey_date)? {
        return Ok(MatchResult::Matched(train));
    }

    Ok(MatchResult::NotFound)
}
