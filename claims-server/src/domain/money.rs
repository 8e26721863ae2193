//! Currency and monetary rounding rules.
//!
//! Payout amounts are always rounded half-up to 2 decimal places. Currency
//! conversion is an explicit helper only; nothing in the compensation path
//! converts implicitly.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default EUR → GBP conversion rate.
///
/// The rate applied when the caller does not supply one; 0.85 GBP per EUR.
pub const DEFAULT_EUR_TO_GBP: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

/// Ticket and payout currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Gbp,
}

impl Currency {
    /// The minimum-payout floor for this currency (€4 / £4).
    ///
    /// A compensation result is only worth offering if at least one of its
    /// amounts clears this floor.
    pub fn minimum_payout(self) -> Decimal {
        Decimal::from(4)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Eur => f.write_str("EUR"),
            Currency::Gbp => f.write_str("GBP"),
        }
    }
}

/// Round a monetary amount half-up to 2 decimal places.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an amount between EUR and GBP at the given EUR→GBP rate.
///
/// Same-currency conversion is the identity. The result is rounded to
/// 2 decimal places. This is never applied inside the compensation
/// calculation; callers opt in explicitly.
pub fn convert(amount: Decimal, from: Currency, to: Currency, eur_to_gbp: Decimal) -> Decimal {
    match (from, to) {
        (Currency::Eur, Currency::Gbp) => round2(amount * eur_to_gbp),
        (Currency::Gbp, Currency::Eur) => round2(amount / eur_to_gbp),
        _ => amount,
    }
}
