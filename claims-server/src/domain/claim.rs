//! Claim record and status state machine.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Currency;
use super::{BookingId, ClaimId};

/// Lifecycle status of a claim.
///
/// The submission path is `Pending → Eligible → Submitted → Approved |
/// Rejected`. `Expired` is reachable from `Eligible` or `Submitted` through
/// an administrative transition only; nothing in this crate expires claims
/// on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Eligible,
    Submitted,
    Approved,
    Rejected,
    Expired,
}

impl ClaimStatus {
    /// Whether a claim in this status may be marked as submitted.
    pub fn can_submit(self) -> bool {
        matches!(self, ClaimStatus::Pending | ClaimStatus::Eligible)
    }

    /// Whether this status is a terminal outcome of the submission path.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ClaimStatus::Approved | ClaimStatus::Rejected | ClaimStatus::Expired
        )
    }

    /// Returns the status as its wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Eligible => "eligible",
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compensation claim for a delayed booking.
///
/// A claim is created exactly once per booking, when eligibility first
/// evaluates true; everything after creation is a status transition. The
/// eligible amounts are frozen at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,

    /// Unique per claim: at most one claim exists for any booking.
    pub booking_id: BookingId,

    pub delay_minutes: i64,
    pub eligible_cash_amount: Decimal,
    pub eligible_voucher_amount: Decimal,
    pub currency: Currency,

    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}
