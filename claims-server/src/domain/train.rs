//! Realtime train record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrainId;
use super::trip::{TrainNumber, TripKey};

/// A train record produced by the realtime feed.
///
/// The feed layer delivers these already parsed; this crate never touches
/// raw feed bytes. `trip_id` is the canonical join key to bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,

    /// Canonical trip key: normalized number plus MMDD service date.
    #[serde(with = "trip_key_string")]
    pub trip_id: TripKey,

    #[serde(with = "train_number_string")]
    pub train_number: TrainNumber,

    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,

    /// Observed arrival, once the feed has reported one.
    pub actual_arrival: Option<DateTime<Utc>>,

    /// Delay as reported by the feed itself, if any.
    pub delay_minutes: Option<i64>,
}

mod trip_key_string {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::trip::TripKey;

    pub fn serialize<S: Serializer>(key: &TripKey, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(key.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TripKey, D::Error> {
        Ok(TripKey::from_stored(String::deserialize(d)?))
    }
}

mod train_number_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::domain::trip::TrainNumber;

    pub fn serialize<S: Serializer>(n: &TrainNumber, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(n.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TrainNumber, D::Error> {
        TrainNumber::parse(&String::deserialize(d)?).map_err(D::Error::custom)
    }
}
