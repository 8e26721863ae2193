//! Persistence seam.
//!
//! The storage engine itself is out of scope; these traits describe the
//! lookups and field-level updates the pipeline needs, and [`memory`]
//! provides the in-memory implementation used by the binary and by tests.
//! Uniqueness of one claim per booking is enforced here: a losing
//! concurrent writer receives [`StoreError::DuplicateClaim`], which callers
//! treat as a benign race.

pub mod memory;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    Booking, BookingId, Claim, ClaimId, ClaimStatus, Currency, Train, TrainId, TrainNumber,
    TripKey,
};

pub use memory::InMemoryStore;

/// Errors from the persistence layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Infrastructure failure. Not retried here; the delay monitor collects
    /// per-item failures and claim callers surface them.
    #[error("database error: {0}")]
    Database(String),

    /// The one-claim-per-booking uniqueness constraint fired.
    #[error("a claim already exists for booking {booking_id}")]
    DuplicateClaim { booking_id: BookingId },
}

/// Read access to realtime train records.
pub trait TrainStore {
    /// Look up a train by its canonical trip key.
    fn train_by_trip_id(&self, trip_id: &TripKey) -> Result<Option<Train>, StoreError>;

    /// Fallback lookup by normalized train number and service date.
    fn train_by_number_and_date(
        &self,
        number: &TrainNumber,
        date: NaiveDate,
    ) -> Result<Option<Train>, StoreError>;
}

/// Access to booking records.
pub trait BookingStore {
    /// Look up a booking by id.
    fn booking(&self, id: &BookingId) -> Result<Option<Booking>, StoreError>;

    /// Bookings not yet resolved whose journey date falls in `[from, to]`.
    fn unresolved_in_window(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError>;

    /// Record the journey outcome: final delay and matched train id.
    ///
    /// The write is conditional on the booking still being unresolved, so
    /// `final_delay_minutes` stays write-once even if two monitor runs
    /// overlap. Returns `true` if this call performed the write.
    fn record_journey_outcome(
        &self,
        id: &BookingId,
        train_id: &TrainId,
        delay_minutes: i64,
    ) -> Result<bool, StoreError>;
}

/// Fields for a claim about to be created.
///
/// The claim id is assigned by the store on insert.
#[derive(Debug, Clone)]
pub struct NewClaim {
    pub booking_id: BookingId,
    pub delay_minutes: i64,
    pub eligible_cash_amount: Decimal,
    pub eligible_voucher_amount: Decimal,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

/// Access to claim records.
pub trait ClaimStore {
    /// Look up a claim by id.
    fn claim(&self, id: &ClaimId) -> Result<Option<Claim>, StoreError>;

    /// Look up the claim for a booking, if one exists.
    fn claim_for_booking(&self, booking_id: &BookingId) -> Result<Option<Claim>, StoreError>;

    /// Insert a new claim in `Pending` status.
    ///
    /// Fails with [`StoreError::DuplicateClaim`] if a claim already exists
    /// for the booking, whichever writer got there first.
    fn insert_claim(&self, new: NewClaim) -> Result<Claim, StoreError>;

    /// Update a claim's status and, when supplied, its submission time.
    fn update_claim_status(
        &self,
        id: &ClaimId,
        status: ClaimStatus,
        submitted_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError>;
}
