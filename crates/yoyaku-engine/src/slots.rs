//! Slot generation over a daily shift window.

use chrono::{NaiveTime, Timelike};
use std::collections::BTreeSet;
use yoyaku_core::types::TimeSlot;

/// ## Summary
/// Generates the ordered list of fixed-granularity slots inside a shift
/// window, flagging each slot booked when its time is in `booked_times`.
///
/// The shift bounds are normalized first: a reversed pair is swapped rather
/// than rejected. Slots start at the normalized shift start and step by
/// `granularity_minutes`, stopping strictly before the shift end. A
/// zero-length shift (or a zero granularity) yields an empty list, never an
/// error.
///
/// ## Side Effects
/// None - this is a pure function.
#[must_use]
pub fn generate_slots(
    booked_times: &BTreeSet<NaiveTime>,
    shift: (NaiveTime, NaiveTime),
    granularity_minutes: u32,
) -> Vec<TimeSlot> {
    if granularity_minutes == 0 {
        return Vec::new();
    }

    let (mut start, mut end) = shift;
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    let start_minute = minute_of_day(start);
    let end_minute = minute_of_day(end);

    let mut slots = Vec::new();
    let mut at = start_minute;
    while at < end_minute {
        let Some(time) = NaiveTime::from_hms_opt(at / 60, at % 60, 0) else {
            break;
        };
        slots.push(TimeSlot {
            time,
            booked: booked_times.contains(&time),
            granularity_minutes,
        });
        at += granularity_minutes;
    }

    slots
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use yoyaku_core::timefmt::parse_hhmm;

    fn t(value: &str) -> NaiveTime {
        parse_hhmm(value).expect("valid time")
    }

    fn booked(values: &[&str]) -> BTreeSet<NaiveTime> {
        values.iter().map(|v| t(v)).collect()
    }

    #[test]
    fn test_slots_are_evenly_spaced_from_shift_start() {
        let slots = generate_slots(&BTreeSet::new(), (t("09:00"), t("11:00")), 30);

        let times: Vec<NaiveTime> = slots.iter().map(|s| s.time).collect();
        assert_eq!(
            times,
            vec![t("09:00"), t("09:30"), t("10:00"), t("10:30")]
        );
        assert!(slots.iter().all(|s| s.granularity_minutes == 30));
    }

    #[test]
    fn test_end_bound_is_exclusive() {
        let slots = generate_slots(&BTreeSet::new(), (t("09:00"), t("17:00")), 30);
        assert!(slots.iter().all(|s| s.time < t("17:00")));
        assert_eq!(slots.len(), 16);
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let booked = booked(&["09:00"]);
        assert_eq!(
            generate_slots(&booked, (t("17:00"), t("09:00")), 30),
            generate_slots(&booked, (t("09:00"), t("17:00")), 30)
        );
    }

    #[test]
    fn test_booked_flag_is_exact_membership() {
        let booked = booked(&["09:30"]);
        let slots = generate_slots(&booked, (t("09:00"), t("10:30")), 30);

        let flags: Vec<bool> = slots.iter().map(|s| s.booked).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_first_unbooked_slot_scenario() {
        let booked = booked(&["09:00", "09:30"]);
        let slots = generate_slots(&booked, (t("09:00"), t("17:00")), 30);

        let first_free = slots.iter().find(|s| !s.booked).expect("has a free slot");
        assert_eq!(first_free.time, t("10:00"));
    }

    #[test]
    fn test_zero_length_shift_yields_empty() {
        assert!(generate_slots(&BTreeSet::new(), (t("09:00"), t("09:00")), 30).is_empty());
    }

    #[test]
    fn test_zero_granularity_yields_empty() {
        assert!(generate_slots(&BTreeSet::new(), (t("09:00"), t("17:00")), 0).is_empty());
    }

    #[test]
    fn test_uneven_granularity() {
        let slots = generate_slots(&BTreeSet::new(), (t("09:00"), t("11:00")), 45);
        let times: Vec<NaiveTime> = slots.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![t("09:00"), t("09:45"), t("10:30")]);
    }
}
