//! Claim form snapshot.
//!
//! The operator's claim portal is filled in manually by the user; this
//! crate's only obligation is assembling a complete, accurate snapshot of
//! the fields the form asks for. Nothing here submits anything.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deadline;
use crate::domain::{Booking, Claim, Currency, StationCode};

/// Every field needed to fill in the operator's claim form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimFormSnapshot {
    /// The booking reference the operator knows the journey by.
    pub booking_reference: String,

    /// Our claim reference, quoted in correspondence.
    pub claim_reference: String,

    pub passenger_name: String,

    /// Train number exactly as printed on the ticket.
    pub train_number: String,

    pub journey_date: NaiveDate,
    pub origin: StationCode,
    pub destination: StationCode,

    pub delay_minutes: i64,
    pub ticket_price: Decimal,
    pub cash_amount: Decimal,
    pub voucher_amount: Decimal,
    pub currency: Currency,

    /// Last day the form will still be accepted.
    pub claim_deadline: DateTime<Utc>,
}

impl ClaimFormSnapshot {
    /// Assemble the snapshot from a booking and its claim.
    ///
    /// The passenger name comes from the caller (user profiles live
    /// outside this crate).
    pub fn assemble(booking: &Booking, claim: &Claim, passenger_name: &str) -> Self {
        Self {
            booking_reference: booking.id.to_string(),
            claim_reference: claim.id.to_string(),
            passenger_name: passenger_name.to_owned(),
            train_number: booking.train_number.clone(),
            journey_date: booking.journey_date,
            origin: booking.origin.clone(),
            destination: booking.destination.clone(),
            delay_minutes: claim.delay_minutes,
            ticket_price: booking.ticket_price,
            cash_amount: claim.eligible_cash_amount,
            voucher_amount: claim.eligible_voucher_amount,
            currency: claim.currency,
            claim_deadline: deadline::deadline(booking.journey_date),
        }
    }
}
