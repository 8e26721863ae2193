//! Claim lifecycle.
//!
//! Creates claim records when eligibility first evaluates true and drives
//! them through `pending → eligible → submitted → approved | rejected`,
//! with `expired` reachable only through the administrative path. Every
//! status mutation emits an event so external consumers react without
//! polling.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{Booking, BookingId, Claim, ClaimId, ClaimStatus, UserId};
use crate::eligibility::{self, EligibilityReason};
use crate::events::{ClaimCreated, ClaimStatusChanged, ClaimSubmitted, Event, EventSink};
use crate::form::ClaimFormSnapshot;
use crate::store::{BookingStore, ClaimStore, NewClaim, StoreError};

/// Errors from claim operations.
///
/// Business-rule rejections are typed variants, never panics: a well-formed
/// request that cannot proceed given current state comes back as one of
/// these and the caller decides what to do.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClaimError {
    /// The booking does not meet the eligibility rules.
    #[error("booking {booking_id} is not eligible: {reason}")]
    NotEligible {
        booking_id: BookingId,
        reason: EligibilityReason,
    },

    /// A claim already exists for the booking. Also what the loser of a
    /// concurrent create race sees; callers treat it as benign.
    #[error("a claim already exists for booking {booking_id}")]
    AlreadyExists { booking_id: BookingId },

    /// No claim with the given id.
    #[error("claim {claim_id} not found")]
    NotFound { claim_id: ClaimId },

    /// No booking with the given id.
    #[error("booking {booking_id} not found")]
    BookingNotFound { booking_id: BookingId },

    /// The journey outcome has not been recorded yet, so there is no
    /// delay to claim for.
    #[error("journey outcome for booking {booking_id} not recorded yet")]
    JourneyNotResolved { booking_id: BookingId },

    /// The requested status change is not legal from the current status.
    #[error("cannot move claim {claim_id} from {from} to {to}")]
    InvalidStatusTransition {
        claim_id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    },

    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Claim lifecycle operations over an injected store and event sink.
pub struct ClaimService<S, E> {
    store: Arc<S>,
    events: Arc<E>,
}

impl<S, E> ClaimService<S, E>
where
    S: BookingStore + ClaimStore,
    E: EventSink,
{
    pub fn new(store: Arc<S>, events: Arc<E>) -> Self {
        Self { store, events }
    }

    /// Create the claim for a booking.
    ///
    /// Requires the journey outcome to be recorded and the eligibility
    /// verdict to be positive. At most one claim ever exists per booking;
    /// a second attempt fails with [`ClaimError::AlreadyExists`] and
    /// creates nothing (idempotent by rejection, not by merge).
    pub fn create_claim(
        &self,
        booking_id: &BookingId,
        user_id: &UserId,
        passenger_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Claim, ClaimError> {
        let booking = self.booking(booking_id)?;

        let delay_minutes =
            booking
                .final_delay_minutes
                .ok_or_else(|| ClaimError::JourneyNotResolved {
                    booking_id: booking_id.clone(),
                })?;

        let verdict = eligibility::evaluate(
            delay_minutes,
            booking.ticket_price,
            booking.currency,
            booking.journey_date,
            now,
        );

        // Eligible verdicts always carry the computed offer.
        let compensation = match verdict.compensation {
            Some(comp) if verdict.eligible => comp,
            _ => {
                return Err(ClaimError::NotEligible {
                    booking_id: booking_id.clone(),
                    reason: verdict.reason,
                });
            }
        };

        let claim = self
            .store
            .insert_claim(NewClaim {
                booking_id: booking_id.clone(),
                delay_minutes,
                eligible_cash_amount: compensation.cash_amount,
                eligible_voucher_amount: compensation.voucher_amount,
                currency: compensation.currency,
                created_at: now,
            })
            .map_err(|e| match e {
                StoreError::DuplicateClaim { booking_id } => {
                    ClaimError::AlreadyExists { booking_id }
                }
                other => ClaimError::Store(other),
            })?;

        info!(
            claim_id = %claim.id,
            booking_id = %booking_id,
            delay_minutes,
            "claim created"
        );

        let form_data = ClaimFormSnapshot::assemble(&booking, &claim, passenger_name);
        self.events.publish(Event::ClaimCreated(ClaimCreated {
            claim: claim.clone(),
            user_id: user_id.clone(),
            booking_id: booking_id.clone(),
            form_data,
        }));

        Ok(claim)
    }

    /// Mark a claim as submitted by the user.
    ///
    /// Legal only from `pending` or `eligible`. Emits both the generic
    /// status-changed event and the submission-specific event.
    pub fn mark_as_submitted(
        &self,
        claim_id: &ClaimId,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Claim, ClaimError> {
        let mut claim = self.claim(claim_id)?;

        if !claim.status.can_submit() {
            return Err(ClaimError::InvalidStatusTransition {
                claim_id: claim_id.clone(),
                from: claim.status,
                to: ClaimStatus::Submitted,
            });
        }

        let previous = claim.status;
        self.store
            .update_claim_status(claim_id, ClaimStatus::Submitted, Some(now))?;
        claim.status = ClaimStatus::Submitted;
        claim.submitted_at = Some(now);

        info!(claim_id = %claim_id, %previous, "claim submitted");

        self.events
            .publish(Event::ClaimStatusChanged(ClaimStatusChanged {
                claim_id: claim_id.clone(),
                previous_status: previous,
                new_status: ClaimStatus::Submitted,
                user_id: user_id.clone(),
            }));
        self.events.publish(Event::ClaimSubmitted(ClaimSubmitted {
            claim_id: claim_id.clone(),
            user_id: user_id.clone(),
            booking_id: claim.booking_id.clone(),
            submitted_at: now,
        }));

        Ok(claim)
    }

    /// Administrative status update: `approved`, `rejected`, or `expired`,
    /// from any prior status, without transition validation.
    ///
    /// Emits only the status-changed event.
    pub fn update_status(
        &self,
        claim_id: &ClaimId,
        new_status: ClaimStatus,
        user_id: &UserId,
    ) -> Result<Claim, ClaimError> {
        let mut claim = self.claim(claim_id)?;

        // The administrative path only sets outcomes; walking a claim
        // back to a lifecycle status goes through the normal path.
        if !new_status.is_terminal() {
            return Err(ClaimError::InvalidStatusTransition {
                claim_id: claim_id.clone(),
                from: claim.status,
                to: new_status,
            });
        }

        let previous = claim.status;
        self.store.update_claim_status(claim_id, new_status, None)?;
        claim.status = new_status;

        info!(claim_id = %claim_id, %previous, status = %new_status, "claim status updated");

        self.events
            .publish(Event::ClaimStatusChanged(ClaimStatusChanged {
                claim_id: claim_id.clone(),
                previous_status: previous,
                new_status,
                user_id: user_id.clone(),
            }));

        Ok(claim)
    }

    fn booking(&self, id: &BookingId) -> Result<Booking, ClaimError> {
        self.store
            .booking(id)?
            .ok_or_else(|| ClaimError::BookingNotFound {
                booking_id: id.clone(),
            })
    }

    fn claim(&self, id: &ClaimId) -> Result<Claim, ClaimError> {
        self.store.claim(id)?.ok_or_else(|| ClaimError::NotFound {
            claim_id: id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use crate::domain::{Currency, StationCode};
    use crate::events::RecordingSink;
    use crate::store::InMemoryStore;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    /// Journey 5 Jan 2026, 90 minutes late, 100 EUR ticket.
    fn resolved_booking(id: &str) -> Booking {
        Booking {
            id: BookingId::new(id),
            user_id: UserId::new("u-1"),
            train_number: "9O07".to_owned(),
            journey_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            origin: StationCode::parse("SPX").unwrap(),
            destination: StationCode::parse("FRPNO").unwrap(),
            ticket_price: dec("100.00"),
            currency: Currency::Eur,
            train_id: None,
            final_delay_minutes: Some(90),
        }
    }

    fn service() -> (ClaimService<InMemoryStore, RecordingSink>, Arc<InMemoryStore>, Arc<RecordingSink>)
    {
        let store = Arc::new(InMemoryStore::new());
        let sink = Arc::new(RecordingSink::new());
        (
            ClaimService::new(store.clone(), sink.clone()),
            store,
            sink,
        )
    }

    const NOW: &str = "2026-01-07T10:00:00Z";

    #[test]
    fn create_claim_freezes_amounts_and_emits_created() {
        let (svc, store, sink) = service();
        store.put_booking(resolved_booking("bk-1")).unwrap();

        let claim = svc
            .create_claim(&BookingId::new("bk-1"), &UserId::new("u-1"), "A. Passenger", at(NOW))
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.delay_minutes, 90);
        assert_eq!(claim.eligible_cash_amount, dec("25.00"));
        assert_eq!(claim.eligible_voucher_amount, dec("60.00"));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::ClaimCreated(e) => {
                assert_eq!(e.booking_id.as_str(), "bk-1");
                assert_eq!(e.form_data.train_number, "9O07");
                assert_eq!(e.form_data.passenger_name, "A. Passenger");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn second_create_is_rejected_without_side_effects() {
        let (svc, store, sink) = service();
        store.put_booking(resolved_booking("bk-1")).unwrap();
        let booking_id = BookingId::new("bk-1");
        let user = UserId::new("u-1");

        let first = svc
            .create_claim(&booking_id, &user, "A. Passenger", at(NOW))
            .unwrap();

        let err = svc
            .create_claim(&booking_id, &user, "A. Passenger", at(NOW))
            .unwrap_err();
        assert!(matches!(err, ClaimError::AlreadyExists { .. }));

        // No second row, no second event.
        let stored = store.claim_for_booking(&booking_id).unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn ineligible_booking_is_rejected_with_reason() {
        let (svc, store, sink) = service();
        let mut booking = resolved_booking("bk-1");
        booking.final_delay_minutes = Some(45);
        store.put_booking(booking).unwrap();

        let err = svc
            .create_claim(&BookingId::new("bk-1"), &UserId::new("u-1"), "A", at(NOW))
            .unwrap_err();
        assert!(matches!(
            err,
            ClaimError::NotEligible {
                reason: EligibilityReason::InsufficientDelay,
                ..
            }
        ));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn unresolved_booking_cannot_be_claimed() {
        let (svc, store, _) = service();
        let mut booking = resolved_booking("bk-1");
        booking.final_delay_minutes = None;
        store.put_booking(booking).unwrap();

        let err = svc
            .create_claim(&BookingId::new("bk-1"), &UserId::new("u-1"), "A", at(NOW))
            .unwrap_err();
        assert!(matches!(err, ClaimError::JourneyNotResolved { .. }));
    }

    #[test]
    fn unknown_booking() {
        let (svc, _, _) = service();
        let err = svc
            .create_claim(&BookingId::new("nope"), &UserId::new("u-1"), "A", at(NOW))
            .unwrap_err();
        assert!(matches!(err, ClaimError::BookingNotFound { .. }));
    }

    #[test]
    fn submit_sets_time_and_emits_both_events() {
        let (svc, store, sink) = service();
        store.put_booking(resolved_booking("bk-1")).unwrap();
        let user = UserId::new("u-1");
        let claim = svc
            .create_claim(&BookingId::new("bk-1"), &user, "A", at(NOW))
            .unwrap();

        let submitted_at = at("2026-01-08T09:30:00Z");
        let updated = svc
            .mark_as_submitted(&claim.id, &user, submitted_at)
            .unwrap();
        assert_eq!(updated.status, ClaimStatus::Submitted);
        assert_eq!(updated.submitted_at, Some(submitted_at));

        let events = sink.events();
        assert_eq!(events.len(), 3); // created, status changed, submitted
        assert!(matches!(
            &events[1],
            Event::ClaimStatusChanged(e)
                if e.previous_status == ClaimStatus::Pending
                    && e.new_status == ClaimStatus::Submitted
        ));
        assert!(matches!(
            &events[2],
            Event::ClaimSubmitted(e) if e.submitted_at == submitted_at
        ));
    }

    #[test]
    fn submit_from_approved_is_invalid() {
        let (svc, store, _) = service();
        store.put_booking(resolved_booking("bk-1")).unwrap();
        let user = UserId::new("u-1");
        let claim = svc
            .create_claim(&BookingId::new("bk-1"), &user, "A", at(NOW))
            .unwrap();
        svc.update_status(&claim.id, ClaimStatus::Approved, &user)
            .unwrap();

        let err = svc
            .mark_as_submitted(&claim.id, &user, at(NOW))
            .unwrap_err();
        assert!(matches!(
            err,
            ClaimError::InvalidStatusTransition {
                from: ClaimStatus::Approved,
                to: ClaimStatus::Submitted,
                ..
            }
        ));
    }

    #[test]
    fn submit_unknown_claim() {
        let (svc, _, _) = service();
        let err = svc
            .mark_as_submitted(&ClaimId::new("nope"), &UserId::new("u-1"), at(NOW))
            .unwrap_err();
        assert!(matches!(err, ClaimError::NotFound { .. }));
    }

    #[test]
    fn administrative_update_skips_transition_validation() {
        let (svc, store, sink) = service();
        store.put_booking(resolved_booking("bk-1")).unwrap();
        let user = UserId::new("u-1");
        let claim = svc
            .create_claim(&BookingId::new("bk-1"), &user, "A", at(NOW))
            .unwrap();

        // Straight from pending to rejected is fine administratively.
        let updated = svc
            .update_status(&claim.id, ClaimStatus::Rejected, &user)
            .unwrap();
        assert_eq!(updated.status, ClaimStatus::Rejected);

        // Only the status-changed event, no submission event.
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], Event::ClaimStatusChanged(_)));
    }

    #[test]
    fn administrative_update_rejects_lifecycle_targets() {
        let (svc, store, _) = service();
        store.put_booking(resolved_booking("bk-1")).unwrap();
        let user = UserId::new("u-1");
        let claim = svc
            .create_claim(&BookingId::new("bk-1"), &user, "A", at(NOW))
            .unwrap();

        let err = svc
            .update_status(&claim.id, ClaimStatus::Submitted, &user)
            .unwrap_err();
        assert!(matches!(err, ClaimError::InvalidStatusTransition { .. }));
    }

    #[test]
    fn expire_from_submitted() {
        let (svc, store, _) = service();
        store.put_booking(resolved_booking("bk-1")).unwrap();
        let user = UserId::new("u-1");
        let claim = svc
            .create_claim(&BookingId::new("bk-1"), &user, "A", at(NOW))
            .unwrap();
        svc.mark_as_submitted(&claim.id, &user, at("2026-01-08T09:00:00Z"))
            .unwrap();

        let updated = svc
            .update_status(&claim.id, ClaimStatus::Expired, &user)
            .unwrap();
        assert_eq!(updated.status, ClaimStatus::Expired);
        // Submission time is retained on expiry.
        let stored = store.claim(&claim.id).unwrap().unwrap();
        assert!(stored.submitted_at.is_some());
    }
}
