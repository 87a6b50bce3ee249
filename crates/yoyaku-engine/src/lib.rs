//! Pure scheduling algorithms: slot generation, recurrence expansion, and
//! day-level availability resolution.
//!
//! ## Summary
//! Nothing in this crate performs I/O or reads ambient state. Every function
//! is deterministic in its inputs, which is what makes the booking workflow
//! built on top of it testable without a live store.

pub mod availability;
pub mod recurrence;
pub mod slots;

pub use availability::{AvailabilityResolver, DayAvailability};
pub use recurrence::{DateWindow, MAX_EXPANSION_STEPS, expand};
pub use slots::generate_slots;
