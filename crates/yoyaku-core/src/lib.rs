//! Shared types for the yoyaku scheduling engine.
//!
//! ## Summary
//! Appointment and recurrence data model, configuration loading, and the
//! core error type. Everything here is plain data with no I/O.

pub mod config;
pub mod error;
pub mod recurrence;
pub mod timefmt;
pub mod types;
