//! Appointment data model shared across crates.

use crate::recurrence::RecurrenceRule;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Appointment lifecycle state. Cancellation is a status change, never a
/// record deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Canceled,
    Completed,
}

impl AppointmentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Canceled => "CANCELED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bookable time-of-day candidate. Exists only for the duration of a
/// single availability query and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(with = "crate::timefmt::hhmm")]
    pub time: NaiveTime,
    pub booked: bool,
    pub granularity_minutes: u32,
}

/// A booked (or requested) appointment as the store exchanges it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(with = "crate::timefmt::hhmm")]
    pub start_time: NaiveTime,
    #[serde(default, with = "crate::timefmt::hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    pub client_name: String,
    pub client_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Appointment {
    /// True once the appointment has been soft-canceled; canceled
    /// appointments no longer occupy calendar time.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.status == AppointmentStatus::Canceled
    }
}

/// Client-identification fields collected in the EnterInfo step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Weekly working schedule attached to a provider profile. Display-only;
/// the scheduling algorithms never consult it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingSchedule {
    pub days: Vec<String>,
    pub hours: String,
}

/// Provider profile shown to the booker for context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_schedule: Option<WorkingSchedule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(AppointmentStatus::Pending).expect("serializes"),
            serde_json::json!("PENDING")
        );
        assert_eq!(AppointmentStatus::Canceled.to_string(), "CANCELED");
    }

    #[test]
    fn test_appointment_times_use_hhmm() {
        let appointment = Appointment {
            id: None,
            title: "Consultation".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 14).expect("valid date"),
            start_time: NaiveTime::from_hms_opt(9, 30, 0).expect("valid time"),
            end_time: None,
            duration_minutes: 30,
            status: AppointmentStatus::Pending,
            client_name: "Alex Doe".to_string(),
            client_email: "alex@example.com".to_string(),
            client_phone: None,
            service_type: Some("consultation".to_string()),
            location: None,
            notes: None,
            recurrence: None,
            created_at: None,
            updated_at: None,
            created_by: None,
            assigned_to: None,
        };

        let json = serde_json::to_value(&appointment).expect("serializes");
        assert_eq!(json["startTime"], "09:30");
        assert_eq!(json["startDate"], "2026-09-14");
        assert!(json.get("id").is_none());
    }
}
