//! Recurrence rule expansion into concrete calendar occurrences.

use chrono::{Datelike, Days, Months, NaiveDate};
use std::cmp::min;
use yoyaku_core::recurrence::{Frequency, RecurrenceRule};

/// Hard cap on series positions examined per expansion. Guarantees
/// termination even for a rule whose end date lies far beyond any window.
pub const MAX_EXPANSION_STEPS: u32 = 100;

/// Inclusive calendar-date window bounding an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window covering exactly one day.
    #[must_use]
    pub const fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// ## Summary
/// Expands an appointment's recurrence into the concrete occurrence dates
/// falling inside `window`, in chronological order.
///
/// A missing rule means the appointment does not repeat: its start date is
/// the only candidate and is returned iff it lies inside the window.
///
/// With a rule present, candidates are walked forward from `first` by the
/// rule's frequency. Every series position is computed and counted whether
/// or not it lands inside the window, so `end_after_occurrences` and
/// exception bookkeeping stay correct across window boundaries; only
/// candidates inside the window and absent from `exceptions` are returned.
/// The walk stops at the rule's end date (defaulting to the window end when
/// the rule has none), after `end_after_occurrences` positions, or at the
/// [`MAX_EXPANSION_STEPS`] safety cap, whichever comes first.
///
/// ## Side Effects
/// None - this is a pure function that never panics; unrepresentable dates
/// (calendar overflow) simply terminate the walk.
#[must_use]
pub fn expand(first: NaiveDate, rule: Option<&RecurrenceRule>, window: DateWindow) -> Vec<NaiveDate> {
    let Some(rule) = rule else {
        return if window.contains(first) {
            vec![first]
        } else {
            Vec::new()
        };
    };

    let until = rule.end_date.unwrap_or(window.end);
    let mut occurrences = Vec::new();
    let mut current = first;
    let mut position: u32 = 0;

    while current <= until {
        if rule.end_after_occurrences.is_some_and(|max| position >= max) {
            break;
        }
        if position >= MAX_EXPANSION_STEPS {
            tracing::warn!(
                start = %first,
                cap = MAX_EXPANSION_STEPS,
                "recurrence expansion hit the safety cap"
            );
            break;
        }
        position += 1;

        if !rule.exceptions.contains(&current) && window.contains(current) {
            occurrences.push(current);
        }

        let Some(next) = advance(current, rule) else {
            break;
        };
        current = next;
    }

    occurrences
}

/// Computes the series date following `current` under `rule`. Returns `None`
/// on calendar overflow.
fn advance(current: NaiveDate, rule: &RecurrenceRule) -> Option<NaiveDate> {
    let interval = rule.interval.get();

    match &rule.frequency {
        Frequency::Daily => current.checked_add_days(Days::new(u64::from(interval))),
        Frequency::Weekly { days_of_week } => {
            if days_of_week.is_empty() {
                return current.checked_add_days(Days::new(7 * u64::from(interval)));
            }
            // Scan the next seven days for a pinned weekday; any non-empty
            // set is guaranteed a hit, so the interval-week fallback below
            // only fires defensively.
            for offset in 1..=7 {
                let candidate = current.checked_add_days(Days::new(offset))?;
                if days_of_week.contains(&candidate.weekday()) {
                    return Some(candidate);
                }
            }
            current.checked_add_days(Days::new(7 * u64::from(interval)))
        }
        Frequency::Monthly { day_of_month } => {
            let advanced = current.checked_add_months(Months::new(interval))?;
            match day_of_month {
                Some(day) => clamp_day_of_month(advanced, *day),
                None => Some(advanced),
            }
        }
        Frequency::Yearly {
            month_of_year,
            day_of_month,
        } => {
            let advanced = current.checked_add_months(Months::new(12 * interval))?;
            match (month_of_year, day_of_month) {
                (Some(month), Some(day)) => {
                    let target_month = month.number_from_month();
                    let last = days_in_month(advanced.year(), target_month)?;
                    NaiveDate::from_ymd_opt(
                        advanced.year(),
                        target_month,
                        min(u32::from(*day), last),
                    )
                }
                _ => Some(advanced),
            }
        }
    }
}

/// Pins `date` to `day` within its month, clamped to the month's length.
fn clamp_day_of_month(date: NaiveDate, day: u8) -> Option<NaiveDate> {
    let last = days_in_month(date.year(), date.month())?;
    date.with_day(min(u32::from(day), last))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    Some(NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::collections::HashSet;
    use std::num::NonZeroU32;
    use yoyaku_core::recurrence::{Frequency, RecurrenceRule};

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn every(n: u32, frequency: Frequency) -> RecurrenceRule {
        RecurrenceRule::new(frequency, NonZeroU32::new(n).expect("nonzero interval"))
    }

    #[test]
    fn test_no_rule_inside_window() {
        let window = DateWindow::new(d(2026, 6, 1), d(2026, 6, 30));
        assert_eq!(expand(d(2026, 6, 15), None, window), vec![d(2026, 6, 15)]);
    }

    #[test]
    fn test_no_rule_outside_window() {
        let window = DateWindow::new(d(2026, 6, 1), d(2026, 6, 30));
        assert!(expand(d(2026, 7, 1), None, window).is_empty());
    }

    #[test]
    fn test_daily_interval() {
        let rule = every(3, Frequency::Daily);
        let window = DateWindow::new(d(2026, 6, 1), d(2026, 6, 10));

        assert_eq!(
            expand(d(2026, 6, 1), Some(&rule), window),
            vec![d(2026, 6, 1), d(2026, 6, 4), d(2026, 6, 7), d(2026, 6, 10)]
        );
    }

    #[test]
    fn test_end_after_occurrences_bounds_the_series() {
        let rule = every(1, Frequency::Daily).with_end_after_occurrences(4);
        let window = DateWindow::new(d(2026, 6, 1), d(2026, 12, 31));

        let dates = expand(d(2026, 6, 1), Some(&rule), window);
        assert_eq!(dates.len(), 4);
        assert_eq!(dates.last(), Some(&d(2026, 6, 4)));
    }

    #[test]
    fn test_occurrences_before_window_still_count() {
        // The series is daily from June 1 with 4 total occurrences; a window
        // starting June 3 sees only the tail of the series, not 4 more days.
        let rule = every(1, Frequency::Daily).with_end_after_occurrences(4);
        let window = DateWindow::new(d(2026, 6, 3), d(2026, 12, 31));

        assert_eq!(
            expand(d(2026, 6, 1), Some(&rule), window),
            vec![d(2026, 6, 3), d(2026, 6, 4)]
        );
    }

    #[test]
    fn test_weekly_pinned_weekdays() {
        // 2026-06-01 is a Monday.
        let rule = every(
            1,
            Frequency::Weekly {
                days_of_week: HashSet::from([Weekday::Mon, Weekday::Wed]),
            },
        );
        let window = DateWindow::new(d(2026, 6, 1), d(2026, 6, 14));

        let dates = expand(d(2026, 6, 1), Some(&rule), window);
        assert_eq!(
            dates,
            vec![d(2026, 6, 1), d(2026, 6, 3), d(2026, 6, 8), d(2026, 6, 10)]
        );
        assert!(
            dates
                .iter()
                .all(|date| matches!(date.weekday(), Weekday::Mon | Weekday::Wed))
        );
    }

    #[test]
    fn test_weekly_without_pinned_days_advances_whole_weeks() {
        let rule = every(2, Frequency::Weekly {
            days_of_week: HashSet::new(),
        });
        let window = DateWindow::new(d(2026, 6, 1), d(2026, 6, 30));

        assert_eq!(
            expand(d(2026, 6, 1), Some(&rule), window),
            vec![d(2026, 6, 1), d(2026, 6, 15), d(2026, 6, 29)]
        );
    }

    #[test]
    fn test_monthly_day_31_clamps_to_february() {
        let rule = every(1, Frequency::Monthly {
            day_of_month: Some(31),
        });
        let window = DateWindow::new(d(2026, 1, 1), d(2026, 4, 30));

        assert_eq!(
            expand(d(2026, 1, 31), Some(&rule), window),
            vec![d(2026, 1, 31), d(2026, 2, 28), d(2026, 3, 31), d(2026, 4, 30)]
        );
    }

    #[test]
    fn test_monthly_day_31_clamps_to_leap_february() {
        let rule = every(1, Frequency::Monthly {
            day_of_month: Some(31),
        });
        let window = DateWindow::new(d(2028, 1, 1), d(2028, 3, 31));

        assert_eq!(
            expand(d(2028, 1, 31), Some(&rule), window),
            vec![d(2028, 1, 31), d(2028, 2, 29), d(2028, 3, 31)]
        );
    }

    #[test]
    fn test_monthly_without_pin_keeps_previous_day() {
        let rule = every(1, Frequency::Monthly { day_of_month: None });
        let window = DateWindow::new(d(2026, 1, 1), d(2026, 4, 30));

        // Once clamped into February, the series stays on the 28th.
        assert_eq!(
            expand(d(2026, 1, 31), Some(&rule), window),
            vec![d(2026, 1, 31), d(2026, 2, 28), d(2026, 3, 28), d(2026, 4, 28)]
        );
    }

    #[test]
    fn test_yearly_pinned_month_and_day() {
        let rule = every(
            1,
            Frequency::Yearly {
                month_of_year: Some(chrono::Month::February),
                day_of_month: Some(29),
            },
        );
        let window = DateWindow::new(d(2027, 1, 1), d(2028, 12, 31));

        assert_eq!(
            expand(d(2026, 2, 28), Some(&rule), window),
            vec![d(2027, 2, 28), d(2028, 2, 29)]
        );
    }

    #[test]
    fn test_exceptions_are_filtered() {
        let rule = every(1, Frequency::Daily).with_exception(d(2026, 6, 2));
        let window = DateWindow::new(d(2026, 6, 1), d(2026, 6, 3));

        assert_eq!(
            expand(d(2026, 6, 1), Some(&rule), window),
            vec![d(2026, 6, 1), d(2026, 6, 3)]
        );
    }

    #[test]
    fn test_rule_end_date_beats_window_end() {
        let rule = every(1, Frequency::Daily).with_end_date(d(2026, 6, 3));
        let window = DateWindow::new(d(2026, 6, 1), d(2026, 6, 30));

        assert_eq!(
            expand(d(2026, 6, 1), Some(&rule), window),
            vec![d(2026, 6, 1), d(2026, 6, 2), d(2026, 6, 3)]
        );
    }

    #[test_log::test]
    fn test_safety_cap_terminates_long_series() {
        let rule = every(1, Frequency::Daily).with_end_date(d(2036, 1, 1));
        let window = DateWindow::new(d(2026, 1, 1), d(2035, 12, 31));

        let dates = expand(d(2026, 1, 1), Some(&rule), window);
        let expected = usize::try_from(MAX_EXPANSION_STEPS).expect("fits in usize");
        assert_eq!(dates.len(), expected);
    }

    #[test]
    fn test_single_day_window() {
        let rule = every(1, Frequency::Weekly {
            days_of_week: HashSet::from([Weekday::Fri]),
        });
        // 2026-06-05 is a Friday three weeks after the series start.
        let window = DateWindow::single(d(2026, 6, 5));

        assert_eq!(
            expand(d(2026, 5, 15), Some(&rule), window),
            vec![d(2026, 6, 5)]
        );
    }
}
