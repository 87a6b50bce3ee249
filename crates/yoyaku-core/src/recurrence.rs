//! Recurrence rule data model.
//!
//! ## Summary
//! A closed representation of the repeat schedule embedded in an
//! appointment. The wire carries a `type` discriminator (`DAILY`, `WEEKLY`,
//! `MONTHLY`, `YEARLY`); a non-repeating appointment simply carries no rule,
//! so "NONE" never appears as a variant here. Frequency-specific knobs live
//! on their variant, which keeps an unset `daysOfWeek` on a monthly rule
//! unrepresentable.

use crate::error::{CoreError, CoreResult};
use chrono::{Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::num::NonZeroU32;

/// How a recurring appointment advances from one occurrence to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE", rename_all_fields = "camelCase")]
pub enum Frequency {
    /// Every `interval` days.
    Daily,
    /// Every `interval` weeks, optionally pinned to a set of weekdays.
    Weekly {
        #[serde(
            default,
            with = "crate::timefmt::weekday_set",
            skip_serializing_if = "HashSet::is_empty"
        )]
        days_of_week: HashSet<Weekday>,
    },
    /// Every `interval` months, optionally pinned to a day of the month.
    ///
    /// A pinned day past the end of a target month is clamped to that
    /// month's last day (Jan 31 repeating monthly lands on Feb 28/29).
    Monthly {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        day_of_month: Option<u8>,
    },
    /// Every `interval` years, optionally pinned to a month and day.
    Yearly {
        #[serde(
            default,
            with = "crate::timefmt::month0_opt",
            skip_serializing_if = "Option::is_none"
        )]
        month_of_year: Option<Month>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        day_of_month: Option<u8>,
    },
}

/// Recurrence rule owned by its appointment.
///
/// `interval` is a `NonZeroU32`, so a zero interval is rejected during
/// deserialization rather than looping forever during expansion. The
/// remaining field-range invariants are checked by [`Self::validate`],
/// which deserialization runs before handing the rule out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RecurrenceRuleWire")]
pub struct RecurrenceRule {
    #[serde(flatten)]
    pub frequency: Frequency,
    pub interval: NonZeroU32,
    /// Last date on which an occurrence may fall (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Strict upper bound on the number of occurrences in the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_after_occurrences: Option<u32>,
    /// Calendar dates excluded from the series.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exceptions: BTreeSet<NaiveDate>,
}

/// Raw wire shape of a rule, before the field-range invariants are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecurrenceRuleWire {
    #[serde(flatten)]
    frequency: Frequency,
    interval: NonZeroU32,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    end_after_occurrences: Option<u32>,
    #[serde(default)]
    exceptions: BTreeSet<NaiveDate>,
}

impl TryFrom<RecurrenceRuleWire> for RecurrenceRule {
    type Error = CoreError;

    fn try_from(wire: RecurrenceRuleWire) -> CoreResult<Self> {
        let rule = Self {
            frequency: wire.frequency,
            interval: wire.interval,
            end_date: wire.end_date,
            end_after_occurrences: wire.end_after_occurrences,
            exceptions: wire.exceptions,
        };
        rule.validate()?;
        Ok(rule)
    }
}

impl RecurrenceRule {
    /// Creates a rule repeating at `frequency` every `interval` steps, with
    /// no end condition and no exceptions.
    #[must_use]
    pub fn new(frequency: Frequency, interval: NonZeroU32) -> Self {
        Self {
            frequency,
            interval,
            end_date: None,
            end_after_occurrences: None,
            exceptions: BTreeSet::new(),
        }
    }

    /// Sets the inclusive end date of the series.
    #[must_use]
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Bounds the series to at most `count` occurrences.
    #[must_use]
    pub fn with_end_after_occurrences(mut self, count: u32) -> Self {
        self.end_after_occurrences = Some(count);
        self
    }

    /// Excludes a calendar date from the series.
    #[must_use]
    pub fn with_exception(mut self, date: NaiveDate) -> Self {
        self.exceptions.insert(date);
        self
    }

    /// Checks the rule's field-range invariants.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` if a pinned day-of-month falls
    /// outside 1–31.
    pub fn validate(&self) -> CoreResult<()> {
        let day_of_month = match self.frequency {
            Frequency::Monthly { day_of_month } | Frequency::Yearly { day_of_month, .. } => {
                day_of_month
            }
            Frequency::Daily | Frequency::Weekly { .. } => None,
        };

        if let Some(day) = day_of_month
            && !(1..=31).contains(&day)
        {
            return Err(CoreError::ValidationError(format!(
                "dayOfMonth out of range: {day}"
            )));
        }

        Ok(())
    }
}
