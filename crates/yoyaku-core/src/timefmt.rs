//! Wire formats for times, weekdays, and months.
//!
//! ## Summary
//! The store speaks zero-padded "HH:MM" time-of-day strings, weekday sets as
//! integers 0 (Sunday) through 6 (Saturday), and months as 0-based indices.
//! These serde helper modules keep the in-memory types (`NaiveTime`,
//! `Weekday`, `Month`) while matching that wire shape exactly.

use crate::error::{CoreError, CoreResult};
use chrono::NaiveTime;

/// Format string for time-of-day values on the wire.
pub const HHMM: &str = "%H:%M";

/// Parses a zero-padded "HH:MM" string into a `NaiveTime`.
///
/// ## Errors
/// Returns `CoreError::ParseError` if the string is not a valid "HH:MM" time.
pub fn parse_hhmm(value: &str) -> CoreResult<NaiveTime> {
    NaiveTime::parse_from_str(value, HHMM)
        .map_err(|e| CoreError::ParseError(format!("invalid HH:MM time {value:?}: {e}")))
}

/// Formats a `NaiveTime` as a zero-padded "HH:MM" string.
#[must_use]
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format(HHMM).to_string()
}

/// Serde adapter for `NaiveTime` fields carried as "HH:MM" strings.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(D::Error::custom)
    }
}

/// Serde adapter for optional `NaiveTime` fields carried as "HH:MM" strings.
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_some(&super::format_hhmm(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| super::parse_hhmm(&s).map_err(D::Error::custom))
            .transpose()
    }
}

/// Serde adapter for weekday sets carried as sorted integers 0 (Sunday) –
/// 6 (Saturday).
pub mod weekday_set {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use std::collections::HashSet;

    pub fn serialize<S: Serializer>(
        days: &HashSet<Weekday>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut numbers: Vec<u32> = days.iter().map(Weekday::num_days_from_sunday).collect();
        numbers.sort_unstable();
        serializer.collect_seq(numbers)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashSet<Weekday>, D::Error> {
        let numbers = Vec::<u8>::deserialize(deserializer)?;
        numbers
            .into_iter()
            .map(|n| super::weekday_from_sunday_index(n).map_err(D::Error::custom))
            .collect()
    }
}

/// Serde adapter for optional months carried as 0-based indices (0 = January).
pub mod month0_opt {
    use chrono::Month;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(
        month: &Option<Month>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match month {
            Some(m) => serializer.serialize_some(&(m.number_from_month() - 1)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Month>, D::Error> {
        let raw = Option::<u8>::deserialize(deserializer)?;
        raw.map(|n| {
            n.checked_add(1)
                .and_then(|m| Month::try_from(m).ok())
                .ok_or_else(|| D::Error::custom(format!("month index out of range: {n}")))
        })
        .transpose()
    }
}

/// Maps a 0 (Sunday) – 6 (Saturday) index to a `Weekday`.
///
/// ## Errors
/// Returns `CoreError::InvalidInput` for indices outside 0–6.
pub fn weekday_from_sunday_index(index: u8) -> CoreResult<chrono::Weekday> {
    use chrono::Weekday;

    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(CoreError::InvalidInput(format!(
            "weekday index out of range: {index}"
        ))),
    }
}
