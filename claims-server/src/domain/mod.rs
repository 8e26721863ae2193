//! Domain types for the delay-compensation pipeline.
//!
//! This module contains the core domain model types that represent
//! validated booking, train, and claim data. Types enforce their invariants
//! at construction time, so code that receives them can trust their
//! validity.

mod booking;
mod claim;
mod ids;
pub mod money;
mod station;
mod train;
pub mod trip;

pub use booking::Booking;
pub use claim::{Claim, ClaimStatus};
pub use ids::{BookingId, ClaimId, TrainId, UserId};
pub use money::{Currency, DEFAULT_EUR_TO_GBP, convert, round2};
pub use station::{InvalidStationCode, StationCode};
pub use train::Train;
pub use trip::{InvalidTrainNumber, TrainNumber, TripKey};
