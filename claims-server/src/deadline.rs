//! Claim window and deadline arithmetic.
//!
//! A claim may not be raised in the first 24 hours after the journey date
//! (the operator's own records need that long to settle), and not after
//! 3 calendar months. All functions take `now` explicitly.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};

/// Hours after the journey date before the claim window opens.
pub const CLAIM_WINDOW_HOURS: i64 = 24;

/// Calendar months after the journey date until the deadline.
pub const DEADLINE_MONTHS: u32 = 3;

/// The instant the claim window opens: journey date (midnight UTC) + 24h.
pub fn claim_window_opens_at(journey_date: NaiveDate) -> DateTime<Utc> {
    journey_date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
        + Duration::hours(CLAIM_WINDOW_HOURS)
}

/// Whether the claim window is open as of `now`.
pub fn is_claim_window_open(journey_date: NaiveDate, now: DateTime<Utc>) -> bool {
    now >= claim_window_opens_at(journey_date)
}

/// The claim deadline: journey date + 3 calendar months, at the lenient
/// end of that day (23:59:59.999).
///
/// Month arithmetic clamps to the month end, so a 30 November journey
/// deadlines on the last day of February.
pub fn deadline(journey_date: NaiveDate) -> DateTime<Utc> {
    let day = journey_date
        .checked_add_months(Months::new(DEADLINE_MONTHS))
        .unwrap_or(NaiveDate::MAX);
    day.and_hms_milli_opt(23, 59, 59, 999)
        .expect("valid end-of-day time")
        .and_utc()
}

/// Whole days until the deadline, floored on both sides of zero.
///
/// Just past the deadline therefore reports −1, never 0: a caller seeing 0
/// can still claim today. The floor-based asymmetry is deliberate.
pub fn days_until_deadline(journey_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    (deadline(journey_date) - now)
        .num_milliseconds()
        .div_euclid(24 * 60 * 60 * 1000)
}

/// Whether `now` is on or before the deadline.
pub fn is_within_deadline(journey_date: NaiveDate, now: DateTime<Utc>) -> bool {
    now <= deadline(journey_date)
}

/// Human-readable countdown. Presentation only; nothing decides on it.
pub fn countdown_text(journey_date: NaiveDate, now: DateTime<Utc>) -> String {
    match days_until_deadline(journey_date, now) {
        d if d < 0 => "deadline passed".to_owned(),
        0 => "deadline is today".to_owned(),
        1 => "1 day left to claim".to_owned(),
        d => format!("{d} days left to claim"),
    }
}
