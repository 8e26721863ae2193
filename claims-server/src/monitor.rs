//! Periodic delay monitoring.
//!
//! Scans unresolved bookings in a rolling 2-day window, matches each one
//! against the realtime train records, classifies the journey, and records
//! the final delay once the journey completes. The loop runs the batch on
//! one task, so at most one run is ever in flight; a new tick waits for
//! the prior run.
//!
//! A booking whose train never surfaces inside the window stays unknown
//! indefinitely; there is no reconciliation job here.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::BookingId;
use crate::eligibility;
use crate::events::{BookingCompleted, Event, EventSink};
use crate::journey::{self, JourneyStatus};
use crate::matcher::{self, MatchResult};
use crate::store::{BookingStore, StoreError, TrainStore};

/// Configuration for the delay monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// How often the batch runs.
    pub interval: Duration,

    /// How many days back the scan reaches. 1 means [yesterday, today],
    /// the deliberate bound that keeps the scan from growing without
    /// limit.
    pub lookback_days: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5 * 60),
            lookback_days: 1,
        }
    }
}

/// One booking the batch could not process. Collected, never fatal.
#[derive(Debug, Clone)]
pub struct BookingError {
    pub booking_id: BookingId,
    pub message: String,
}

/// Outcome of one monitor run.
#[derive(Debug, Clone, Default)]
pub struct MonitorSummary {
    /// Bookings examined.
    pub processed: usize,

    /// Journeys completed and resolved this run.
    pub completed: usize,

    /// Bookings skipped because no train record exists yet.
    pub skipped: usize,

    /// Bookings whose matched train has not finished.
    pub in_progress: usize,

    /// Per-booking failures.
    pub errors: Vec<BookingError>,
}

/// The periodic batch orchestrator.
pub struct DelayMonitor<S, E> {
    store: Arc<S>,
    events: Arc<E>,
    config: MonitorConfig,
}

impl<S, E> DelayMonitor<S, E>
where
    S: BookingStore + TrainStore,
    E: EventSink,
{
    pub fn new(store: Arc<S>, events: Arc<E>, config: MonitorConfig) -> Self {
        Self {
            store,
            events,
            config,
        }
    }

    /// Run one batch as of `now`.
    ///
    /// Per-booking failures are collected into the summary; only a failed
    /// window scan aborts the run. Re-running is harmless: the journey
    /// outcome write is conditional on the booking still being unresolved,
    /// and resolved bookings drop out of the scan.
    pub fn run_once(&self, now: DateTime<Utc>) -> Result<MonitorSummary, StoreError> {
        let today = now.date_naive();
        let from = today - chrono::Duration::days(self.config.lookback_days);
        let candidates = self.store.unresolved_in_window(from, today)?;

        let mut summary = MonitorSummary::default();

        for booking in candidates {
            summary.processed += 1;

            let matched = match matcher::match_booking(self.store.as_ref(), &booking) {
                Ok(result) => result,
                Err(e) => {
                    warn!(booking_id = %booking.id, error = %e, "booking not processable");
                    summary.errors.push(BookingError {
                        booking_id: booking.id.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let check = journey::classify(&booking, matched.train(), now);
            match (check.status, &matched) {
                (JourneyStatus::Completed, MatchResult::Matched(train)) => {
                    let delay_minutes = check.delay_minutes.unwrap_or(0);
                    match self
                        .store
                        .record_journey_outcome(&booking.id, &train.id, delay_minutes)
                    {
                        Ok(true) => {
                            summary.completed += 1;
                            self.events.publish(Event::BookingCompleted(BookingCompleted {
                                booking_id: booking.id.clone(),
                                train_id: train.id.clone(),
                                delay_minutes,
                                is_eligible_for_claim: eligibility::delay_qualifies(
                                    delay_minutes,
                                ),
                                completed_at: now,
                            }));
                        }
                        Ok(false) => {
                            // A racing run got there first with the same
                            // deterministic value.
                            debug!(booking_id = %booking.id, "already resolved");
                            summary.skipped += 1;
                        }
                        Err(e) => {
                            summary.errors.push(BookingError {
                                booking_id: booking.id.clone(),
                                message: e.to_string(),
                            });
                        }
                    }
                }
                (JourneyStatus::Pending, MatchResult::NotFound)
                | (JourneyStatus::Unknown, _) => {
                    debug!(booking_id = %booking.id, status = %check.status, "no train yet");
                    summary.skipped += 1;
                }
                _ => {
                    summary.in_progress += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            completed = summary.completed,
            skipped = summary.skipped,
            in_progress = summary.in_progress,
            errors = summary.errors.len(),
            "delay monitor run finished"
        );

        Ok(summary)
    }

    /// Drive [`Self::run_once`] on the configured interval, forever.
    ///
    /// Runs on the calling task, which is what guarantees single-flight:
    /// a tick that arrives while a run is still going is delayed, not
    /// stacked.
    pub async fn run_forever(&self) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(e) = self.run_once(Utc::now()) {
                warn!(error = %e, "delay monitor run failed");
            }
        }
    }
}
