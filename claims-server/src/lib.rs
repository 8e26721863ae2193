//! Rail delay-compensation pipeline.
//!
//! Tracks bookings against realtime train records, detects journeys that
//! completed with a compensable delay, computes the tiered compensation
//! owed, and manages the resulting claim through its submission lifecycle.

pub mod claims;
pub mod compensation;
pub mod deadline;
pub mod domain;
pub mod eligibility;
pub mod events;
pub mod form;
pub mod journey;
pub mod matcher;
pub mod monitor;
pub mod store;
