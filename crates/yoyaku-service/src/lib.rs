//! Booking workflow and store access for the yoyaku scheduling engine.
//!
//! ## Summary
//! The state machine that walks an end user through date, time, and client
//! info to a confirmed appointment, plus the `AppointmentStore` collaborator
//! interface and its HTTP client. Availability math lives in
//! `yoyaku-engine`; this crate sequences it and talks to the store.

pub mod error;
pub mod store;
pub mod validation;
pub mod workflow;

pub use error::{ServiceError, ServiceResult};
pub use store::{AppointmentStore, HttpStore, Session};
pub use workflow::{BookingStep, BookingWorkflow, CancelRequest};
