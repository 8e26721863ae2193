//! End-to-end flow: booking → monitor run → completion event →
//! eligibility → claim creation → submission.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use claims_server::claims::{ClaimError, ClaimService};
use claims_server::domain::{
    Booking, BookingId, ClaimStatus, Currency, StationCode, Train, TrainId, TrainNumber, TripKey,
    UserId,
};
use claims_server::eligibility;
use claims_server::events::{Event, EventSink};
use claims_server::monitor::{DelayMonitor, MonitorConfig};
use claims_server::store::{BookingStore, InMemoryStore};

/// Sink capturing every published event.
#[derive(Default)]
struct CapturingSink {
    events: Mutex<Vec<Event>>,
}

impl CapturingSink {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for CapturingSink {
    fn publish(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// A UK-issued booking for Eurostar-style service 9007 on 5 Jan 2026,
/// ticket price 100 EUR.
fn seed(store: &InMemoryStore) {
    let journey = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    store
        .put_booking(Booking {
            id: BookingId::new("bk-1"),
            user_id: UserId::new("u-1"),
            train_number: "9O07".to_owned(),
            journey_date: journey,
            origin: StationCode::parse("GBSPX").unwrap(),
            destination: StationCode::parse("FRPNO").unwrap(),
            ticket_price: dec("100.00"),
            currency: Currency::Eur,
            train_id: None,
            final_delay_minutes: None,
        })
        .unwrap();

    let number = TrainNumber::parse("9007").unwrap();
    store
        .put_train(Train {
            id: TrainId::new("tr-1"),
            trip_id: TripKey::new(&number, journey),
            train_number: number,
            scheduled_departure: at("2026-01-05T08:01:00Z"),
            scheduled_arrival: at("2026-01-05T11:17:00Z"),
            actual_arrival: Some(at("2026-01-05T12:47:00Z")),
            delay_minutes: None,
        })
        .unwrap();
}

#[test]
fn delay_to_claim_flow() {
    let store = Arc::new(InMemoryStore::new());
    let sink = Arc::new(CapturingSink::default());
    seed(&store);

    // Evening of the journey day: the train finished 90 minutes late.
    let monitor = DelayMonitor::new(store.clone(), sink.clone(), MonitorConfig::default());
    let summary = monitor.run_once(at("2026-01-05T20:00:00Z")).unwrap();
    assert_eq!(summary.completed, 1);
    assert!(summary.errors.is_empty());

    let booking = store.booking(&BookingId::new("bk-1")).unwrap().unwrap();
    assert_eq!(booking.final_delay_minutes, Some(90));

    match &sink.events()[0] {
        Event::BookingCompleted(e) => {
            assert_eq!(e.delay_minutes, 90);
            assert!(e.is_eligible_for_claim);
        }
        other => panic!("unexpected event {other:?}"),
    }

    // Same evening: the 24-hour window has not opened yet.
    assert!(!eligibility::can_claim_now(
        booking.journey_date,
        at("2026-01-05T20:05:00Z")
    ));
    let claims = ClaimService::new(store.clone(), sink.clone());
    let err = claims
        .create_claim(
            &BookingId::new("bk-1"),
            &UserId::new("u-1"),
            "A. Passenger",
            at("2026-01-05T20:05:00Z"),
        )
        .unwrap_err();
    assert!(matches!(err, ClaimError::NotEligible { .. }));

    // Two days later the claim goes through with the Standard-tier offer.
    let claim = claims
        .create_claim(
            &BookingId::new("bk-1"),
            &UserId::new("u-1"),
            "A. Passenger",
            at("2026-01-07T09:00:00Z"),
        )
        .unwrap();
    assert_eq!(claim.status, ClaimStatus::Pending);
    assert_eq!(claim.eligible_cash_amount, dec("25.00"));
    assert_eq!(claim.eligible_voucher_amount, dec("60.00"));

    // Duplicate creation is rejected, not merged.
    let err = claims
        .create_claim(
            &BookingId::new("bk-1"),
            &UserId::new("u-1"),
            "A. Passenger",
            at("2026-01-07T09:01:00Z"),
        )
        .unwrap_err();
    assert!(matches!(err, ClaimError::AlreadyExists { .. }));

    // The user submits; approval follows administratively.
    let submitted = claims
        .mark_as_submitted(&claim.id, &UserId::new("u-1"), at("2026-01-08T10:00:00Z"))
        .unwrap();
    assert_eq!(submitted.status, ClaimStatus::Submitted);

    let approved = claims
        .update_status(&claim.id, ClaimStatus::Approved, &UserId::new("admin"))
        .unwrap();
    assert_eq!(approved.status, ClaimStatus::Approved);

    // BookingCompleted, ClaimCreated, ClaimStatusChanged, ClaimSubmitted,
    // ClaimStatusChanged.
    let events = sink.events();
    assert_eq!(events.len(), 5);
    assert!(matches!(events[1], Event::ClaimCreated(_)));
    assert!(matches!(events[3], Event::ClaimSubmitted(_)));
}

#[test]
fn monitor_runs_are_idempotent_for_resolved_bookings() {
    let store = Arc::new(InMemoryStore::new());
    let sink = Arc::new(CapturingSink::default());
    seed(&store);

    let monitor = DelayMonitor::new(store.clone(), sink.clone(), MonitorConfig::default());
    monitor.run_once(at("2026-01-05T20:00:00Z")).unwrap();
    let second = monitor.run_once(at("2026-01-05T20:05:00Z")).unwrap();

    assert_eq!(second.processed, 0);
    assert_eq!(sink.events().len(), 1);
}
