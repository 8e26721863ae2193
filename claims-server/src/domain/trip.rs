//! Train number normalization and canonical trip keys.
//!
//! UK-issued tickets print the letter 'O' in train numbers where EU-issued
//! tickets print the digit '0' (a "9O07" and a "9007" are the same service).
//! Normalization reconciles the two into one canonical form so that bookings
//! and realtime train records join on the same key regardless of issuer.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Error returned when parsing an invalid train number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train number: {reason}")]
pub struct InvalidTrainNumber {
    reason: &'static str,
}

/// A normalized train number.
///
/// Construction replaces every letter 'O' (either case) with the digit '0',
/// so any two spellings of the same service compare equal. Normalization is
/// idempotent: parsing an already-normalized number is a no-op.
///
/// # Examples
///
/// ```
/// use claims_server::domain::TrainNumber;
///
/// let uk = TrainNumber::parse("9O07").unwrap();
/// let eu = TrainNumber::parse("9007").unwrap();
/// assert_eq!(uk, eu);
/// assert_eq!(uk.as_str(), "9007");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TrainNumber(String);

impl TrainNumber {
    /// Parse and normalize a train number.
    ///
    /// The input is trimmed; it must be non-empty ASCII with no interior
    /// whitespace. Every 'O' or 'o' becomes '0'.
    pub fn parse(raw: &str) -> Result<Self, InvalidTrainNumber> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(InvalidTrainNumber {
                reason: "must not be empty",
            });
        }

        if !trimmed.is_ascii() {
            return Err(InvalidTrainNumber {
                reason: "must be ASCII",
            });
        }

        if trimmed.bytes().any(|b| b.is_ascii_whitespace()) {
            return Err(InvalidTrainNumber {
                reason: "must not contain whitespace",
            });
        }

        Ok(Self(Self::normalize(trimmed)))
    }

    /// Replace every letter 'O' (either case) with the digit '0'.
    ///
    /// Pure, total, and idempotent.
    pub fn normalize(raw: &str) -> String {
        raw.chars()
            .map(|c| if c == 'O' || c == 'o' { '0' } else { c })
            .collect()
    }

    /// Returns the normalized train number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainNumber({})", self.0)
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A canonical trip key: normalized train number plus service date.
///
/// The key is `<normalized number>-<MM><DD>` (zero-padded month and day,
/// time-of-day ignored). It is the join key between a [`crate::domain::Booking`]
/// and the [`crate::domain::Train`] record produced by the realtime feed.
///
/// # Examples
///
/// ```
/// use claims_server::domain::{TrainNumber, TripKey};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// let number = TrainNumber::parse("9O07").unwrap();
/// assert_eq!(TripKey::new(&number, date).as_str(), "9007-0105");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TripKey(String);

impl TripKey {
    /// Build the canonical key for a train number on a given service date.
    pub fn new(number: &TrainNumber, date: NaiveDate) -> Self {
        Self(format!(
            "{}-{:02}{:02}",
            number.as_str(),
            date.month(),
            date.day()
        ))
    }

    /// Build the key directly from a raw (possibly un-normalized) number.
    pub fn for_raw(raw: &str, date: NaiveDate) -> Result<Self, InvalidTrainNumber> {
        Ok(Self::new(&TrainNumber::parse(raw)?, date))
    }

    /// Wrap a key that was previously produced by [`TripKey::new`] and stored.
    ///
    /// No re-validation is performed; this exists for rehydrating persisted
    /// train records.
    pub fn from_stored(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TripKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripKey({})", self.0)
    }
}

impl fmt::Display for TripKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
