//! Station code type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A validated station code.
///
/// Bookings carry the codes printed on the ticket: 3-letter national codes
/// ("PAD", "SPX") or 5-letter international codes ("GBSPX", "FRPNO"). Both
/// are uppercase ASCII letters; this type accepts 3 to 5 of them and
/// guarantees validity by construction.
///
/// # Examples
///
/// ```
/// use claims_server::domain::StationCode;
///
/// let spx = StationCode::parse("SPX").unwrap();
/// assert_eq!(spx.as_str(), "SPX");
///
/// assert!(StationCode::parse("FRPNO").is_ok());
/// assert!(StationCode::parse("spx").is_err());
/// assert!(StationCode::parse("SP").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationCode(String);

impl StationCode {
    /// Parse a station code: 3 to 5 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        if s.len() < 3 || s.len() > 5 {
            return Err(InvalidStationCode {
                reason: "must be 3 to 5 characters",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(InvalidStationCode {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationCode {
    type Error = InvalidStationCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<StationCode> for String {
    fn from(code: StationCode) -> Self {
        code.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
