//! Tiered compensation calculation.
//!
//! Three tiers keyed by inclusive delay lower bounds, paying a percentage
//! of the ticket price in cash or voucher form. Currency conversion is
//! never applied here; see [`crate::domain::money::convert`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Currency, round2};

/// Delay bracket determining payout percentages.
///
/// | Delay (min) | Tier     | Cash | Voucher |
/// |-------------|----------|------|---------|
/// | [60, 120)   | Standard | 25%  | 60%     |
/// | [120, 180)  | Extended | 50%  | 60%     |
/// | ≥180        | Severe   | 50%  | 75%     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompensationTier {
    Standard,
    Extended,
    Severe,
}

impl CompensationTier {
    /// The tier for a delay, or `None` below the 60-minute threshold.
    pub fn for_delay(delay_minutes: i64) -> Option<Self> {
        match delay_minutes {
            d if d < 60 => None,
            d if d < 120 => Some(CompensationTier::Standard),
            d if d < 180 => Some(CompensationTier::Extended),
            _ => Some(CompensationTier::Severe),
        }
    }

    /// Inclusive minimum delay for this tier, in minutes.
    pub fn min_delay_minutes(self) -> i64 {
        match self {
            CompensationTier::Standard => 60,
            CompensationTier::Extended => 120,
            CompensationTier::Severe => 180,
        }
    }

    /// Cash payout as a fraction of the ticket price.
    pub fn cash_fraction(self) -> Decimal {
        match self {
            CompensationTier::Standard => Decimal::new(25, 2),
            CompensationTier::Extended | CompensationTier::Severe => Decimal::new(50, 2),
        }
    }

    /// Voucher payout as a fraction of the ticket price.
    pub fn voucher_fraction(self) -> Decimal {
        match self {
            CompensationTier::Standard | CompensationTier::Extended => Decimal::new(60, 2),
            CompensationTier::Severe => Decimal::new(75, 2),
        }
    }

    /// The tier's display name.
    pub fn name(self) -> &'static str {
        match self {
            CompensationTier::Standard => "Standard",
            CompensationTier::Extended => "Extended",
            CompensationTier::Severe => "Severe",
        }
    }
}

/// A computed compensation offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub tier: CompensationTier,
    pub cash_amount: Decimal,
    pub voucher_amount: Decimal,
    pub currency: Currency,
}

impl Compensation {
    /// Whether the offer clears the minimum-payout floor (€4 / £4).
    ///
    /// Either amount clearing the floor is sufficient; the offer is only
    /// worthless when both fall below it.
    pub fn meets_minimum_payout(&self) -> bool {
        let floor = self.currency.minimum_payout();
        self.cash_amount >= floor || self.voucher_amount >= floor
    }
}

/// Compute the compensation for a delay, or `None` below the first tier.
///
/// Amounts are the tier percentages of the ticket price, rounded half-up
/// to 2 decimal places. The minimum-payout floor is *not* applied here;
/// callers check [`Compensation::meets_minimum_payout`] separately so the
/// reason for ineligibility stays distinguishable.
pub fn calculate(
    delay_minutes: i64,
    ticket_price: Decimal,
    currency: Currency,
) -> Option<Compensation> {
    let tier = CompensationTier::for_delay(delay_minutes)?;

    Some(Compensation {
        tier,
        cash_amount: round2(ticket_price * tier.cash_fraction()),
        voucher_amount: round2(ticket_price * tier.voucher_fraction()),
        currency,
    })
}
