//! The AppointmentStore collaborator interface and its HTTP client.
//!
//! ## Summary
//! The store is the single authoritative source of appointment records; the
//! engine only ever sees it through this request/response interface. The
//! session is an explicit value handed to the client at construction, never
//! read from ambient state, so the scheduling core stays independently
//! testable.

use crate::error::{ServiceError, ServiceResult};
use chrono::{NaiveDate, NaiveTime};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use yoyaku_core::timefmt::parse_hhmm;
use yoyaku_core::types::{Appointment, AppointmentStatus, Provider};

/// Partial appointment update for `PUT appointments/{id}`. Absent fields are
/// left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(
        with = "yoyaku_core::timefmt::hhmm_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentPatch {
    /// Patch that soft-cancels an appointment. The record survives; only
    /// its status changes.
    #[must_use]
    pub fn canceled() -> Self {
        Self {
            status: Some(AppointmentStatus::Canceled),
            ..Self::default()
        }
    }
}

/// Caller identity threaded explicitly into the store client.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// Session with no credential attached.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    /// Session authenticated with a bearer token.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Request/response interface expected of the appointment store.
///
/// Listing is filtered server-side by the caller's identity; conflict
/// detection on create/update is the store's responsibility and surfaces
/// here as [`ServiceError::Conflict`].
pub trait AppointmentStore {
    /// Lists the caller's appointment records.
    async fn list_appointments(&self) -> ServiceResult<Vec<Appointment>>;

    /// Creates an appointment (payload carries no id) and returns the
    /// stored record, id assigned.
    async fn create_appointment(&self, appointment: &Appointment) -> ServiceResult<Appointment>;

    /// Applies a partial update and returns the updated record.
    async fn update_appointment(
        &self,
        id: Uuid,
        patch: &AppointmentPatch,
    ) -> ServiceResult<Appointment>;

    /// Deletes an appointment. Acknowledgement only.
    async fn delete_appointment(&self, id: Uuid) -> ServiceResult<()>;

    /// Server-computed open slot times for a service on a day. The
    /// authoritative counterpart to the locally computed availability view.
    async fn available_time_slots(
        &self,
        service_type: &str,
        day: NaiveDate,
    ) -> ServiceResult<Vec<NaiveTime>>;

    /// Provider profile, for display context only.
    async fn provider_profile(&self, id: Uuid) -> ServiceResult<Provider>;
}

#[derive(Debug, Serialize)]
struct SlotQuery<'a> {
    service_type: &'a str,
    day: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct SlotQueryResponse {
    available_time_slots: Vec<String>,
}

/// `AppointmentStore` over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl HttpStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Maps the store's HTTP status taxonomy onto `ServiceError`. 409 means
    /// the slot was taken between selection and submission.
    async fn check(response: reqwest::Response) -> ServiceResult<reqwest::Response> {
        if response.status() == StatusCode::CONFLICT {
            return Err(ServiceError::Conflict);
        }
        Ok(response.error_for_status()?)
    }
}

impl AppointmentStore for HttpStore {
    async fn list_appointments(&self) -> ServiceResult<Vec<Appointment>> {
        let response = self
            .request(reqwest::Method::GET, "appointments")
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_appointment(&self, appointment: &Appointment) -> ServiceResult<Appointment> {
        tracing::debug!(
            start_date = %appointment.start_date,
            start_time = %appointment.start_time,
            "Creating appointment"
        );
        let response = self
            .request(reqwest::Method::POST, "appointments")
            .json(appointment)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        patch: &AppointmentPatch,
    ) -> ServiceResult<Appointment> {
        tracing::debug!(%id, "Updating appointment");
        let response = self
            .request(reqwest::Method::PUT, &format!("appointments/{id}"))
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_appointment(&self, id: Uuid) -> ServiceResult<()> {
        tracing::debug!(%id, "Deleting appointment");
        let response = self
            .request(reqwest::Method::DELETE, &format!("appointments/{id}"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn available_time_slots(
        &self,
        service_type: &str,
        day: NaiveDate,
    ) -> ServiceResult<Vec<NaiveTime>> {
        let response = self
            .request(reqwest::Method::POST, "available-time-slots")
            .json(&SlotQuery { service_type, day })
            .send()
            .await?;
        let body: SlotQueryResponse = Self::check(response).await?.json().await?;

        body.available_time_slots
            .iter()
            .map(|raw| parse_hhmm(raw).map_err(ServiceError::from))
            .collect()
    }

    async fn provider_profile(&self, id: Uuid) -> ServiceResult<Provider> {
        let response = self
            .request(reqwest::Method::GET, &format!("users/{id}"))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
