//! Day-level availability: which days are bookable and which slots are free.

use crate::recurrence::{DateWindow, expand};
use crate::slots::generate_slots;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;
use yoyaku_core::config::ServiceConfig;
use yoyaku_core::types::{Appointment, TimeSlot};

/// Availability of a single day for a given service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    /// Whether the month view offers this day for new bookings at all.
    pub bookable: bool,
    /// Per-slot freedom within the day, for the week/time view.
    pub slots: Vec<TimeSlot>,
}

/// Resolves availability against a snapshot of existing appointments.
///
/// "Today" is an explicit input rather than an ambient clock read, so a
/// resolver pinned to a fixed date behaves identically in tests and in
/// production.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityResolver {
    today: NaiveDate,
}

impl AvailabilityResolver {
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// ## Summary
    /// Collects the effective occurrence set for `day`: direct appointments
    /// starting that day plus recurring appointments whose expansion lands
    /// on it. Canceled appointments no longer occupy calendar time and are
    /// skipped.
    #[must_use]
    pub fn effective_occurrences<'a>(
        &self,
        day: NaiveDate,
        appointments: &'a [Appointment],
    ) -> Vec<&'a Appointment> {
        appointments
            .iter()
            .filter(|appointment| !appointment.is_canceled())
            .filter(|appointment| {
                // With no rule, expand yields the start date iff it is `day`,
                // which is exactly the direct-appointment membership test.
                !expand(
                    appointment.start_date,
                    appointment.recurrence.as_ref(),
                    DateWindow::single(day),
                )
                .is_empty()
            })
            .collect()
    }

    /// ## Summary
    /// Whether the month view offers `day` for new bookings.
    ///
    /// A day is not bookable when it lies strictly before today, falls on a
    /// weekend, or already carries any appointment occurrence. Blocking the
    /// whole day on any occurrence is deliberately coarser than the
    /// per-slot week view; the asymmetry is product policy.
    #[must_use]
    pub fn is_day_bookable(&self, day: NaiveDate, appointments: &[Appointment]) -> bool {
        if day < self.today {
            return false;
        }
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        self.effective_occurrences(day, appointments).is_empty()
    }

    /// ## Summary
    /// Resolves `day` for calendar display: the coarse month-view bookable
    /// flag plus the fine-grained slot list for the week/time view, with
    /// slots booked by the effective occurrence set's start times.
    #[must_use]
    pub fn day_availability(
        &self,
        day: NaiveDate,
        service: &ServiceConfig,
        appointments: &[Appointment],
    ) -> DayAvailability {
        let occurrences = self.effective_occurrences(day, appointments);
        let booked_times: BTreeSet<_> = occurrences
            .iter()
            .map(|appointment| appointment.start_time)
            .collect();

        let bookable = day >= self.today
            && !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
            && occurrences.is_empty();

        tracing::debug!(
            day = %day,
            service = %service.name,
            bookable,
            occupied = occurrences.len(),
            "Resolved day availability"
        );

        DayAvailability {
            bookable,
            slots: generate_slots(&booked_times, service.shift(), service.granularity_minutes),
        }
    }
}
