//! Claim eligibility verdicts.
//!
//! Composes the journey delay, the compensation calculation, and the
//! window/deadline arithmetic into one verdict. Every check is evaluated
//! independently, no short-circuiting, so a caller always sees the full
//! set of failed checks and not just the first.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::compensation::{self, Compensation, CompensationTier};
use crate::deadline;
use crate::domain::Currency;

/// Why a claim is (not) eligible.
///
/// Variants other than `Eligible` are ordered by reporting priority: the
/// primary reason of a failed verdict is the first of these that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityReason {
    Eligible,
    InsufficientDelay,
    ClaimWindowNotOpen,
    DeadlineExpired,
    BelowMinimumPayout,
}

impl EligibilityReason {
    /// Returns the reason as its wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            EligibilityReason::Eligible => "ELIGIBLE",
            EligibilityReason::InsufficientDelay => "INSUFFICIENT_DELAY",
            EligibilityReason::ClaimWindowNotOpen => "CLAIM_WINDOW_NOT_OPEN",
            EligibilityReason::DeadlineExpired => "DEADLINE_EXPIRED",
            EligibilityReason::BelowMinimumPayout => "BELOW_MINIMUM_PAYOUT",
        }
    }
}

impl fmt::Display for EligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A full eligibility verdict.
///
/// `compensation` is populated only when `eligible` is true. Ineligible
/// verdicts never expose amounts through this type, even though they are
/// computable; callers that only see a failed verdict cannot quote a
/// payout that will never be offered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityStatus {
    pub eligible: bool,

    /// Primary reason: the first failed check, or `Eligible`.
    pub reason: EligibilityReason,

    /// Every failed check, in reporting order.
    pub failed_checks: Vec<EligibilityReason>,

    /// The offer, present only on eligible verdicts.
    pub compensation: Option<Compensation>,

    pub claim_deadline: DateTime<Utc>,
    pub days_until_deadline: i64,
    pub claim_window_open: bool,
}

/// Cheap pre-check: does the delay alone qualify for any tier?
pub fn delay_qualifies(delay_minutes: i64) -> bool {
    CompensationTier::for_delay(delay_minutes).is_some()
}

/// Cheap pre-check: is `now` inside the claimable period (window open and
/// deadline not passed), ignoring the delay entirely?
pub fn can_claim_now(journey_date: NaiveDate, now: DateTime<Utc>) -> bool {
    deadline::is_claim_window_open(journey_date, now)
        && deadline::is_within_deadline(journey_date, now)
}

/// Evaluate full eligibility for a completed journey.
///
/// Checks, in reporting order:
/// 1. delay ≥ 60 minutes (`INSUFFICIENT_DELAY`)
/// 2. claim window open (`CLAIM_WINDOW_NOT_OPEN`)
/// 3. within the 3-month deadline (`DEADLINE_EXPIRED`)
/// 4. computed amounts clear the minimum-payout floor
///    (`BELOW_MINIMUM_PAYOUT`, reported only when check 1 passed)
///
/// Deterministic: identical inputs, including `now`, give identical
/// verdicts.
pub fn evaluate(
    delay_minutes: i64,
    ticket_price: Decimal,
    currency: Currency,
    journey_date: NaiveDate,
    now: DateTime<Utc>,
) -> EligibilityStatus {
    let computed = compensation::calculate(delay_minutes, ticket_price, currency);
    let window_open = deadline::is_claim_window_open(journey_date, now);
    let within_deadline = deadline::is_within_deadline(journey_date, now);

    let mut failed = Vec::new();
    if computed.is_none() {
        failed.push(EligibilityReason::InsufficientDelay);
    }
    if !window_open {
        failed.push(EligibilityReason::ClaimWindowNotOpen);
    }
    if !within_deadline {
        failed.push(EligibilityReason::DeadlineExpired);
    }
    // Only meaningful when the delay check passed; otherwise the floor
    // check would just restate "no tier".
    if let Some(comp) = &computed
        && !comp.meets_minimum_payout()
    {
        failed.push(EligibilityReason::BelowMinimumPayout);
    }

    let eligible = failed.is_empty();
    let reason = failed
        .first()
        .copied()
        .unwrap_or(EligibilityReason::Eligible);

    EligibilityStatus {
        eligible,
        reason,
        failed_checks: failed,
        compensation: if eligible { computed } else { None },
        claim_deadline: deadline::deadline(journey_date),
        days_until_deadline: deadline::days_until_deadline(journey_date, now),
        claim_window_open: window_open,
    }
}
