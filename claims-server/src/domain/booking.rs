//! Booking record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Currency;
use super::station::StationCode;
use super::trip::{InvalidTrainNumber, TripKey};
use super::{BookingId, TrainId, UserId};

/// A rail booking as sold to a passenger.
///
/// The train number is kept exactly as printed on the ticket (which may use
/// the letter 'O' for UK-issued tickets); normalization happens when the
/// booking is matched against realtime train records.
///
/// `final_delay_minutes` is write-once: it is set exactly once, when the
/// journey is classified as completed, and never revised afterwards. A
/// booking with `final_delay_minutes` set is *resolved* and drops out of
/// the delay monitor's scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,

    /// Train number as printed on the ticket, un-normalized.
    pub train_number: String,

    /// Calendar date of the journey.
    pub journey_date: NaiveDate,

    pub origin: StationCode,
    pub destination: StationCode,

    pub ticket_price: Decimal,
    pub currency: Currency,

    /// Set once the booking has been matched to a train record.
    pub train_id: Option<TrainId>,

    /// Write-once final delay, set when the journey completes.
    pub final_delay_minutes: Option<i64>,
}

impl Booking {
    /// The canonical trip key for this booking's train number and date.
    pub fn trip_key(&self) -> Result<TripKey, InvalidTrainNumber> {
        TripKey::for_raw(&self.train_number, self.journey_date)
    }

    /// Whether the journey outcome has been recorded.
    pub fn is_resolved(&self) -> bool {
        self.final_delay_minutes.is_some()
    }
}
