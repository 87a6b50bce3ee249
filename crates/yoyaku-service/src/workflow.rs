//! The guided booking workflow.
//!
//! ## Summary
//! A four-step state machine: SelectDate, SelectTime, EnterInfo,
//! Confirmation. Forward transitions validate their inputs and may call the
//! store; backward transitions discard state accumulated after the target
//! step while preserving everything before it. Reschedule enters at
//! SelectDate carrying the original appointment id, and a successful
//! submission then updates instead of creating. Cancellation is a separate
//! confirmed single-step action, not part of the four-step flow.
//!
//! Transitions return plain `Result`s and the current step is exposed as
//! data; the host UI interprets both. No callbacks cross this boundary.

use crate::error::{ServiceError, ServiceResult};
use crate::store::{AppointmentPatch, AppointmentStore};
use crate::validation::validate_client_info;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeSet;
use uuid::Uuid;
use yoyaku_core::config::ServiceConfig;
use yoyaku_core::types::{Appointment, AppointmentStatus, ClientInfo, TimeSlot};
use yoyaku_engine::recurrence::DateWindow;
use yoyaku_engine::slots::generate_slots;
use yoyaku_engine::AvailabilityResolver;

/// Current position in the booking flow, with the state each step has
/// accumulated so far.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingStep {
    /// Step 1: browsing the calendar for a bookable day.
    SelectDate,
    /// Step 2: choosing among the day's slots.
    SelectTime {
        day: NaiveDate,
        slots: Vec<TimeSlot>,
    },
    /// Step 3: entering client identification. Carries the slot list so
    /// stepping back to SelectTime loses nothing.
    EnterInfo {
        day: NaiveDate,
        slots: Vec<TimeSlot>,
        time: NaiveTime,
    },
    /// Step 4: done. Holds the store-returned appointment for display only.
    Confirmation { appointment: Appointment },
}

impl BookingStep {
    /// 1-based step number shown in the step indicator.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::SelectDate => 1,
            Self::SelectTime { .. } => 2,
            Self::EnterInfo { .. } => 3,
            Self::Confirmation { .. } => 4,
        }
    }
}

/// The appointment being rescheduled, when the workflow was entered through
/// the reschedule path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RescheduleContext {
    id: Uuid,
    original_day: NaiveDate,
    original_time: NaiveTime,
}

/// Drives one booking (or reschedule) end to end against a store.
#[derive(Debug)]
pub struct BookingWorkflow<S> {
    store: S,
    service: ServiceConfig,
    resolver: AvailabilityResolver,
    step: BookingStep,
    editing: Option<RescheduleContext>,
    /// Snapshot of the caller's appointments backing the month view.
    appointments: Vec<Appointment>,
    /// Sequence guard: a slot fetch settling after a newer selection was
    /// issued is stale and must not be applied.
    fetch_seq: u64,
}

impl<S: AppointmentStore> BookingWorkflow<S> {
    /// Starts a fresh booking flow at SelectDate.
    #[must_use]
    pub fn new(store: S, service: ServiceConfig, today: NaiveDate) -> Self {
        Self {
            store,
            service,
            resolver: AvailabilityResolver::new(today),
            step: BookingStep::SelectDate,
            editing: None,
            appointments: Vec::new(),
            fetch_seq: 0,
        }
    }

    #[must_use]
    pub fn step(&self) -> &BookingStep {
        &self.step
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn is_rescheduling(&self) -> bool {
        self.editing.is_some()
    }

    /// ## Summary
    /// Refreshes the appointment snapshot backing the month view from the
    /// store.
    ///
    /// ## Errors
    /// Returns `ServiceError::Network` if the listing fails; the previous
    /// snapshot is kept in that case.
    pub async fn refresh_appointments(&mut self) -> ServiceResult<()> {
        let listed = self.store.list_appointments().await?;
        tracing::debug!(count = listed.len(), "Refreshed appointment snapshot");
        self.appointments = listed;
        Ok(())
    }

    /// Month-view bookable days within `window`, computed from the last
    /// refreshed snapshot.
    #[must_use]
    pub fn bookable_days(&self, window: DateWindow) -> Vec<NaiveDate> {
        window
            .start
            .iter_days()
            .take_while(|day| *day <= window.end)
            .filter(|day| self.resolver.is_day_bookable(*day, &self.appointments))
            .collect()
    }

    /// ## Summary
    /// Step 1 → 2: the user picked a calendar day. Queries the store for
    /// the day's open times and transitions to SelectTime carrying the day
    /// and the slot grid.
    ///
    /// A failed fetch is logged and degrades to an empty slot list; the
    /// transition still happens. A fetch that settles after a newer
    /// selection superseded it is discarded.
    ///
    /// ## Errors
    /// Returns `ServiceError::State` if the workflow is not at SelectDate
    /// or the day is not bookable in the month view.
    pub async fn select_day(&mut self, day: NaiveDate) -> ServiceResult<()> {
        if !matches!(self.step, BookingStep::SelectDate) {
            return Err(ServiceError::State("a day can only be chosen at SelectDate"));
        }
        if !self.resolver.is_day_bookable(day, &self.appointments) {
            return Err(ServiceError::State("day is not bookable"));
        }

        self.fetch_seq += 1;
        let seq = self.fetch_seq;

        let slots = match self
            .store
            .available_time_slots(&self.service.name, day)
            .await
        {
            Ok(open_times) => self.slot_grid(&open_times),
            Err(error) => {
                tracing::warn!(%day, %error, "Slot fetch failed, degrading to empty list");
                Vec::new()
            }
        };

        if seq != self.fetch_seq {
            tracing::warn!(%day, "Discarding stale slot response");
            return Ok(());
        }

        self.step = BookingStep::SelectTime { day, slots };
        Ok(())
    }

    /// Marks every slot of the service's daily grid booked unless the store
    /// reported its time open.
    fn slot_grid(&self, open_times: &[NaiveTime]) -> Vec<TimeSlot> {
        let open: BTreeSet<NaiveTime> = open_times.iter().copied().collect();
        generate_slots(
            &BTreeSet::new(),
            self.service.shift(),
            self.service.granularity_minutes,
        )
        .into_iter()
        .map(|slot| TimeSlot {
            booked: !open.contains(&slot.time),
            ..slot
        })
        .collect()
    }

    /// ## Summary
    /// Step 2 → 3: the user picked one of the open slots. No network call.
    ///
    /// ## Errors
    /// Returns `ServiceError::State` if the workflow is not at SelectTime or
    /// the time is not one of the day's open slots.
    pub fn select_time(&mut self, time: NaiveTime) -> ServiceResult<()> {
        let (day, slots) = match &self.step {
            BookingStep::SelectTime { day, slots } => (*day, slots.clone()),
            _ => return Err(ServiceError::State("a time can only be chosen at SelectTime")),
        };

        let open = slots.iter().any(|slot| slot.time == time && !slot.booked);
        if !open {
            return Err(ServiceError::State("time is not an open slot"));
        }

        self.step = BookingStep::EnterInfo { day, slots, time };
        Ok(())
    }

    /// ## Summary
    /// Step 3 → 4: the user submitted client info. Validates the fields,
    /// then persists a create (new booking) or update (reschedule) against
    /// the store. On success the workflow reaches Confirmation holding the
    /// store-returned appointment.
    ///
    /// ## Errors
    /// - `ServiceError::Validation`: a field failed its format rules; the
    ///   workflow stays at EnterInfo and no store call is made.
    /// - `ServiceError::Conflict`: the slot was taken meanwhile; the
    ///   workflow re-enters SelectTime (with the chosen slot marked booked)
    ///   so the user reselects.
    /// - `ServiceError::Network`: persistence failed; the workflow stays at
    ///   EnterInfo.
    pub async fn submit_info(&mut self, info: ClientInfo) -> ServiceResult<()> {
        let (day, slots, time) = match &self.step {
            BookingStep::EnterInfo { day, slots, time } => (*day, slots.clone(), *time),
            _ => return Err(ServiceError::State("info can only be submitted at EnterInfo")),
        };

        validate_client_info(&info)?;

        let saved = match self.editing {
            Some(context) => {
                let patch = AppointmentPatch {
                    start_date: Some(day),
                    start_time: Some(time),
                    duration_minutes: Some(self.service.duration_minutes),
                    client_name: Some(info.name.clone()),
                    client_email: Some(info.email.clone()),
                    client_phone: info.phone.clone(),
                    service_type: Some(self.service.name.clone()),
                    notes: info.notes.clone(),
                    ..AppointmentPatch::default()
                };
                self.store.update_appointment(context.id, &patch).await
            }
            None => {
                let appointment = self.draft_appointment(day, time, &info);
                self.store.create_appointment(&appointment).await
            }
        };

        match saved {
            Ok(appointment) => {
                tracing::info!(
                    id = ?appointment.id,
                    %day,
                    %time,
                    rescheduled = self.editing.is_some(),
                    "Appointment persisted"
                );
                // Write settled; invalidate the read snapshot. A failed
                // refresh only leaves the month view stale, so it is not a
                // submission failure.
                if let Err(error) = self.refresh_appointments().await {
                    tracing::warn!(%error, "Snapshot refresh after submission failed");
                }
                self.step = BookingStep::Confirmation { appointment };
                Ok(())
            }
            Err(ServiceError::Conflict) => {
                let slots = slots
                    .iter()
                    .map(|slot| TimeSlot {
                        booked: slot.booked || slot.time == time,
                        ..*slot
                    })
                    .collect();
                self.step = BookingStep::SelectTime { day, slots };
                Err(ServiceError::Conflict)
            }
            Err(error) => Err(error),
        }
    }

    fn draft_appointment(&self, day: NaiveDate, time: NaiveTime, info: &ClientInfo) -> Appointment {
        Appointment {
            id: None,
            title: format!("{} with {}", self.service.name, info.name),
            description: None,
            start_date: day,
            start_time: time,
            end_time: None,
            duration_minutes: self.service.duration_minutes,
            status: AppointmentStatus::Pending,
            client_name: info.name.clone(),
            client_email: info.email.clone(),
            client_phone: info.phone.clone(),
            service_type: Some(self.service.name.clone()),
            location: None,
            notes: info.notes.clone(),
            recurrence: None,
            created_at: None,
            updated_at: None,
            created_by: None,
            assigned_to: None,
        }
    }

    /// ## Summary
    /// Backward transition: EnterInfo → SelectTime or SelectTime →
    /// SelectDate. State accumulated after the target step is discarded,
    /// state from before it is preserved.
    ///
    /// ## Errors
    /// Returns `ServiceError::State` at SelectDate or Confirmation, which
    /// have no step to go back to.
    pub fn back(&mut self) -> ServiceResult<()> {
        match std::mem::replace(&mut self.step, BookingStep::SelectDate) {
            BookingStep::SelectTime { .. } => Ok(()),
            BookingStep::EnterInfo { day, slots, .. } => {
                self.step = BookingStep::SelectTime { day, slots };
                Ok(())
            }
            other => {
                self.step = other;
                Err(ServiceError::State("no earlier step to return to"))
            }
        }
    }

    /// ## Summary
    /// Enters the flow at SelectDate to move an existing appointment,
    /// retaining its id so submission performs an update instead of a
    /// create.
    ///
    /// ## Errors
    /// Returns `ServiceError::State` if the appointment has never been
    /// stored (no id).
    pub fn start_reschedule(&mut self, appointment: &Appointment) -> ServiceResult<()> {
        let Some(id) = appointment.id else {
            return Err(ServiceError::State("cannot reschedule an unsaved appointment"));
        };

        self.editing = Some(RescheduleContext {
            id,
            original_day: appointment.start_date,
            original_time: appointment.start_time,
        });
        self.step = BookingStep::SelectDate;
        Ok(())
    }

    /// Day and time the appointment under reschedule currently occupies.
    #[must_use]
    pub fn reschedule_origin(&self) -> Option<(NaiveDate, NaiveTime)> {
        self.editing
            .map(|context| (context.original_day, context.original_time))
    }

    /// Resets to SelectDate with all accumulated selection state cleared,
    /// ready to book another appointment.
    pub fn book_another(&mut self) {
        self.step = BookingStep::SelectDate;
        self.editing = None;
    }
}

/// A cancellation that has been requested but not yet confirmed.
///
/// Cancel is a single-step action outside the four-step flow, and it must
/// not fire without explicit confirmation; holding the request as a value
/// until [`CancelRequest::confirm`] makes an unconfirmed cancel
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelRequest {
    id: Uuid,
}

impl CancelRequest {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self { id }
    }

    #[must_use]
    pub const fn appointment_id(&self) -> Uuid {
        self.id
    }

    /// ## Summary
    /// The user confirmed: marks the appointment CANCELED via the store.
    /// The record is kept; only its status changes.
    ///
    /// ## Errors
    /// Returns `ServiceError::Network` if the store call fails.
    pub async fn confirm<S: AppointmentStore>(self, store: &S) -> ServiceResult<Appointment> {
        tracing::info!(id = %self.id, "Canceling appointment");
        store
            .update_appointment(self.id, &AppointmentPatch::canceled())
            .await
    }
}
