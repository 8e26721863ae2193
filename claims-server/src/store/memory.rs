//! In-memory store.
//!
//! Backs the service binary and the tests. A single `RwLock` over all
//! tables keeps every individual operation atomic, which is what gives the
//! claim uniqueness check its insert-if-absent semantics.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    Booking, BookingId, Claim, ClaimId, ClaimStatus, Train, TrainId, TrainNumber, TripKey,
};

use super::{BookingStore, ClaimStore, NewClaim, StoreError, TrainStore};

#[derive(Default)]
struct Tables {
    bookings: HashMap<BookingId, Booking>,
    trains: HashMap<TripKey, Train>,
    claims: HashMap<ClaimId, Claim>,
    claims_by_booking: HashMap<BookingId, ClaimId>,
    next_claim_id: u64,
}

/// In-memory implementation of all store traits.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a booking.
    pub fn put_booking(&self, booking: Booking) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    /// Insert or replace a train record, keyed by its trip id.
    pub fn put_train(&self, train: Train) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.trains.insert(train.trip_id.clone(), train);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {e}")))
    }
}

impl TrainStore for InMemoryStore {
    fn train_by_trip_id(&self, trip_id: &TripKey) -> Result<Option<Train>, StoreError> {
        Ok(self.read()?.trains.get(trip_id).cloned())
    }

    fn train_by_number_and_date(
        &self,
        number: &TrainNumber,
        date: NaiveDate,
    ) -> Result<Option<Train>, StoreError> {
        // Linear scan; this is the rare fallback path for trains whose
        // stored trip id was built from an upstream key variant.
        Ok(self
            .read()?
            .trains
            .values()
            .find(|t| t.train_number == *number && t.scheduled_departure.date_naive() == date)
            .cloned())
    }
}

impl BookingStore for InMemoryStore {
    fn booking(&self, id: &BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self.read()?.bookings.get(id).cloned())
    }

    fn unresolved_in_window(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError> {
        let mut found: Vec<Booking> = self
            .read()?
            .bookings
            .values()
            .filter(|b| !b.is_resolved() && b.journey_date >= from && b.journey_date <= to)
            .cloned()
            .collect();
        // Deterministic scan order for stable summaries and tests.
        found.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(found)
    }

    fn record_journey_outcome(
        &self,
        id: &BookingId,
        train_id: &TrainId,
        delay_minutes: i64,
    ) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        let booking = tables
            .bookings
            .get_mut(id)
            .ok_or_else(|| StoreError::Database(format!("booking {id} not found")))?;

        // final_delay_minutes is write-once.
        if booking.is_resolved() {
            return Ok(false);
        }

        booking.final_delay_minutes = Some(delay_minutes);
        booking.train_id = Some(train_id.clone());
        Ok(true)
    }
}

impl ClaimStore for InMemoryStore {
    fn claim(&self, id: &ClaimId) -> Result<Option<Claim>, StoreError> {
        Ok(self.read()?.claims.get(id).cloned())
    }

    fn claim_for_booking(&self, booking_id: &BookingId) -> Result<Option<Claim>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .claims_by_booking
            .get(booking_id)
            .and_then(|id| tables.claims.get(id))
            .cloned())
    }

    fn insert_claim(&self, new: NewClaim) -> Result<Claim, StoreError> {
        let mut tables = self.write()?;

        if tables.claims_by_booking.contains_key(&new.booking_id) {
            return Err(StoreError::DuplicateClaim {
                booking_id: new.booking_id,
            });
        }

        tables.next_claim_id += 1;
        let id = ClaimId::new(format!("claim-{}", tables.next_claim_id));

        let claim = Claim {
            id: id.clone(),
            booking_id: new.booking_id.clone(),
            delay_minutes: new.delay_minutes,
            eligible_cash_amount: new.eligible_cash_amount,
            eligible_voucher_amount: new.eligible_voucher_amount,
            currency: new.currency,
            status: ClaimStatus::Pending,
            created_at: new.created_at,
            submitted_at: None,
        };

        tables.claims_by_booking.insert(new.booking_id, id.clone());
        tables.claims.insert(id, claim.clone());
        Ok(claim)
    }

    fn update_claim_status(
        &self,
        id: &ClaimId,
        status: ClaimStatus,
        submitted_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let claim = tables
            .claims
            .get_mut(id)
            .ok_or_else(|| StoreError::Database(format!("claim {id} not found")))?;

        claim.status = status;
        if let Some(at) = submitted_at {
            claim.submitted_at = Some(at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Currency, StationCode, UserId};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(id: &str, journey: NaiveDate) -> Booking {
        Booking {
            id: BookingId::new(id),
            user_id: UserId::new("u-1"),
            train_number: "9O07".to_owned(),
            journey_date: journey,
            origin: StationCode::parse("SPX").unwrap(),
            destination: StationCode::parse("FRPNO").unwrap(),
            ticket_price: Decimal::from(100),
            currency: Currency::Eur,
            train_id: None,
            final_delay_minutes: None,
        }
    }

    fn train(number: &str, date: NaiveDate) -> Train {
        let n = TrainNumber::parse(number).unwrap();
        Train {
            id: TrainId::new(format!("tr-{number}")),
            trip_id: TripKey::new(&n, date),
            train_number: n,
            scheduled_departure: date.and_hms_opt(8, 1, 0).unwrap().and_utc(),
            scheduled_arrival: date.and_hms_opt(11, 17, 0).unwrap().and_utc(),
            actual_arrival: None,
            delay_minutes: None,
        }
    }

    fn new_claim(booking_id: &str) -> NewClaim {
        NewClaim {
            booking_id: BookingId::new(booking_id),
            delay_minutes: 90,
            eligible_cash_amount: Decimal::from(25),
            eligible_voucher_amount: Decimal::from(60),
            currency: Currency::Eur,
            created_at: "2026-01-06T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn train_lookup_by_trip_id() {
        let store = InMemoryStore::new();
        let d = date(2026, 1, 5);
        store.put_train(train("9007", d)).unwrap();

        let key = TripKey::for_raw("9O07", d).unwrap();
        assert!(store.train_by_trip_id(&key).unwrap().is_some());

        let missing = TripKey::for_raw("9008", d).unwrap();
        assert!(store.train_by_trip_id(&missing).unwrap().is_none());
    }

    #[test]
    fn train_fallback_by_number_and_date() {
        let store = InMemoryStore::new();
        let d = date(2026, 1, 5);
        store.put_train(train("9007", d)).unwrap();

        let n = TrainNumber::parse("9007").unwrap();
        assert!(store.train_by_number_and_date(&n, d).unwrap().is_some());
        assert!(
            store
                .train_by_number_and_date(&n, date(2026, 1, 6))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn window_scan_excludes_resolved_and_out_of_window() {
        let store = InMemoryStore::new();
        store.put_booking(booking("bk-1", date(2026, 1, 5))).unwrap();
        store.put_booking(booking("bk-2", date(2026, 1, 4))).unwrap();
        store.put_booking(booking("bk-3", date(2026, 1, 1))).unwrap();

        let mut resolved = booking("bk-4", date(2026, 1, 5));
        resolved.final_delay_minutes = Some(0);
        store.put_booking(resolved).unwrap();

        let found = store
            .unresolved_in_window(date(2026, 1, 4), date(2026, 1, 5))
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["bk-1", "bk-2"]);
    }

    #[test]
    fn journey_outcome_is_write_once() {
        let store = InMemoryStore::new();
        let d = date(2026, 1, 5);
        store.put_booking(booking("bk-1", d)).unwrap();
        let id = BookingId::new("bk-1");
        let tr = TrainId::new("tr-9007");

        assert!(store.record_journey_outcome(&id, &tr, 90).unwrap());
        // Second write is refused, even with a different value.
        assert!(!store.record_journey_outcome(&id, &tr, 120).unwrap());

        let b = store.booking(&id).unwrap().unwrap();
        assert_eq!(b.final_delay_minutes, Some(90));
        assert_eq!(b.train_id, Some(tr));
    }

    #[test]
    fn journey_outcome_on_unknown_booking_is_database_error() {
        let store = InMemoryStore::new();
        let err = store
            .record_journey_outcome(&BookingId::new("nope"), &TrainId::new("tr"), 1)
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn claim_insert_assigns_id_and_pending_status() {
        let store = InMemoryStore::new();
        let claim = store.insert_claim(new_claim("bk-1")).unwrap();
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert!(claim.submitted_at.is_none());
        assert_eq!(
            store.claim(&claim.id).unwrap().unwrap().booking_id,
            BookingId::new("bk-1")
        );
    }

    #[test]
    fn claim_uniqueness_per_booking() {
        let store = InMemoryStore::new();
        store.insert_claim(new_claim("bk-1")).unwrap();

        let err = store.insert_claim(new_claim("bk-1")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateClaim { ref booking_id } if booking_id.as_str() == "bk-1"
        ));

        // A different booking is unaffected.
        assert!(store.insert_claim(new_claim("bk-2")).is_ok());
    }

    #[test]
    fn update_claim_status_preserves_submitted_at() {
        let store = InMemoryStore::new();
        let claim = store.insert_claim(new_claim("bk-1")).unwrap();

        let at: DateTime<Utc> = "2026-01-07T09:00:00Z".parse().unwrap();
        store
            .update_claim_status(&claim.id, ClaimStatus::Submitted, Some(at))
            .unwrap();
        store
            .update_claim_status(&claim.id, ClaimStatus::Approved, None)
            .unwrap();

        let updated = store.claim(&claim.id).unwrap().unwrap();
        assert_eq!(updated.status, ClaimStatus::Approved);
        assert_eq!(updated.submitted_at, Some(at));
    }
}
