use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Method, Url};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::CliError;
use crate::notify::Notifier;
use crate::session::SessionStore;

use super::interface::HttpClient;
use super::types::{
    Analysis, AnalysisRequest, Appointment, AppointmentPayload, ApiEnvelope, AuthData, Doctor,
    GeneratedReport, HealthMetric, HealthStatus, LoginPayload, Medication, MedicationPayload,
    MetricPayload, Patient, PatientPayload, Report, ReportDetail, SerializableLoginPayload,
    SerializableSignupPayload, SignupPayload, TokenRefresh,
};
use super::util::{build_url, read_envelope, read_typed, record, record_list};

/// Wrapper around ReqwestClient implementing the HttpClient trait.
///
/// Holds the session store so it can attach the bearer token to outgoing
/// requests and tear the session down when the backend answers 401, and
/// the notifier so every failed resource call surfaces exactly one
/// user-facing message.
pub struct ReqwestClientWrapper {
    client: ReqwestClient,
    base_url: Url,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl ReqwestClientWrapper {
    pub fn new(
        client: ReqwestClient,
        base_url: Url,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            base_url,
            session,
            notifier,
        }
    }

    async fn raw_send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, CliError> {
        let url = build_url(&self.base_url, path)?;
        tracing::debug!(target: "medthing_cli::client::implementation", %method, %url, "Sending API request");
        let mut request = self
            .client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }
        request.send().await.map_err(CliError::Reqwest)
    }

    /// Session side effects for a failed authenticated call: 401 tears the
    /// session down (storage, cookie, redirect), any other API failure
    /// emits the one-shot notification. Transport and parse errors pass
    /// through untouched.
    fn hook_failure(&self, err: CliError) -> CliError {
        match err {
            CliError::AuthFailed(message) => {
                self.session.expire(&message);
                CliError::AuthFailed(message)
            }
            CliError::Api { status, message } => {
                self.notifier.error(&message);
                CliError::Api { status, message }
            }
            other => other,
        }
    }

    /// Sends an authenticated request and normalizes the response.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiEnvelope, CliError> {
        let response = self.raw_send(method, path, body).await?;
        read_envelope(response).await.map_err(|err| self.hook_failure(err))
    }

    /// Variant for login/signup: these run before a session exists, so a
    /// 401 here means bad credentials, not an expired session, and must
    /// not trigger teardown or the wrapper's notification.
    async fn execute_public(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiEnvelope, CliError> {
        let response = self.raw_send(method, path, body).await?;
        read_envelope(response).await
    }

    fn auth_data_from(envelope: ApiEnvelope) -> Result<AuthData, CliError> {
        let Some(data) = envelope.data else {
            return Err(CliError::AuthFailed(
                "Unexpected response from server".to_string(),
            ));
        };
        if data.get("token").map_or(true, Value::is_null) {
            return Err(CliError::AuthFailed(
                "No token received from server".to_string(),
            ));
        }
        serde_json::from_value(data)
            .map_err(|_| CliError::AuthFailed("No user data received from server".to_string()))
    }
}

#[async_trait]
impl HttpClient for ReqwestClientWrapper {
    async fn login(&self, credentials: &LoginPayload) -> Result<AuthData, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", email = %credentials.email, "Attempting login via HttpClient");
        let body = serde_json::to_value(SerializableLoginPayload::from(credentials))?;
        let envelope = self
            .execute_public(Method::POST, "/api/auth/login", Some(body))
            .await
            .map_err(|err| match err {
                CliError::Api { message, .. } => CliError::AuthFailed(message),
                other => other,
            })?;
        Self::auth_data_from(envelope)
    }

    async fn signup(&self, details: &SignupPayload) -> Result<AuthData, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", email = %details.email, "Attempting signup via HttpClient");
        let body = serde_json::to_value(SerializableSignupPayload::from(details))?;
        let envelope = self
            .execute_public(Method::POST, "/api/auth/signup", Some(body))
            .await
            .map_err(|err| match err {
                CliError::Api { message, .. } => CliError::AuthFailed(message),
                other => other,
            })?;
        Self::auth_data_from(envelope)
    }

    async fn me(&self) -> Result<Doctor, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", "Fetching current user via HttpClient");
        let envelope = self.execute(Method::GET, "/api/auth/me", None).await?;
        record(envelope)
    }

    async fn refresh_token(&self) -> Result<String, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", "Refreshing auth token via HttpClient");
        let envelope = self.execute(Method::POST, "/api/auth/refresh", None).await?;
        let refresh: TokenRefresh = record(envelope)?;
        Ok(refresh.token)
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", "Listing patients via HttpClient");
        let envelope = self.execute(Method::GET, "/api/patients", None).await?;
        record_list(envelope)
    }

    async fn get_patient(&self, id: Uuid) -> Result<Patient, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", %id, "Fetching patient via HttpClient");
        let envelope = self
            .execute(Method::GET, &format!("/api/patients/{id}"), None)
            .await?;
        record(envelope)
    }

    async fn create_patient(&self, patient: &PatientPayload) -> Result<Patient, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", name = %patient.name, "Creating patient via HttpClient");
        let body = serde_json::to_value(patient)?;
        let envelope = self
            .execute(Method::POST, "/api/patients", Some(body))
            .await?;
        record(envelope)
    }

    async fn update_patient(
        &self,
        id: Uuid,
        patient: &PatientPayload,
    ) -> Result<Patient, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", %id, "Updating patient via HttpClient");
        let body = serde_json::to_value(patient)?;
        let envelope = self
            .execute(Method::PUT, &format!("/api/patients/{id}"), Some(body))
            .await?;
        record(envelope)
    }

    async fn delete_patient(&self, id: Uuid) -> Result<(), CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", %id, "Deleting patient via HttpClient");
        self.execute(Method::DELETE, &format!("/api/patients/{id}"), None)
            .await?;
        Ok(())
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", "Listing appointments via HttpClient");
        let envelope = self.execute(Method::GET, "/api/appointments", None).await?;
        record_list(envelope)
    }

    async fn get_appointment(&self, id: Uuid) -> Result<Appointment, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", %id, "Fetching appointment via HttpClient");
        let envelope = self
            .execute(Method::GET, &format!("/api/appointments/{id}"), None)
            .await?;
        record(envelope)
    }

    async fn create_appointment(
        &self,
        appointment: &AppointmentPayload,
    ) -> Result<Appointment, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", patient_id = %appointment.patient_id, "Creating appointment via HttpClient");
        let body = serde_json::to_value(appointment)?;
        let envelope = self
            .execute(Method::POST, "/api/appointments", Some(body))
            .await?;
        record(envelope)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        appointment: &AppointmentPayload,
    ) -> Result<Appointment, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", %id, "Updating appointment via HttpClient");
        let body = serde_json::to_value(appointment)?;
        let envelope = self
            .execute(Method::PUT, &format!("/api/appointments/{id}"), Some(body))
            .await?;
        record(envelope)
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<(), CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", %id, "Deleting appointment via HttpClient");
        self.execute(Method::DELETE, &format!("/api/appointments/{id}"), None)
            .await?;
        Ok(())
    }

    async fn list_patient_medications(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Medication>, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", %patient_id, "Listing medications via HttpClient");
        let envelope = self
            .execute(
                Method::GET,
                &format!("/api/medications/patient/{patient_id}"),
                None,
            )
            .await?;
        record_list(envelope)
    }

    async fn create_medication(
        &self,
        medication: &MedicationPayload,
    ) -> Result<Medication, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", patient_id = %medication.patient_id, name = %medication.name, "Creating medication via HttpClient");
        let body = serde_json::to_value(medication)?;
        let envelope = self
            .execute(Method::POST, "/api/medications", Some(body))
            .await?;
        record(envelope)
    }

    async fn update_medication(
        &self,
        id: Uuid,
        medication: &MedicationPayload,
    ) -> Result<Medication, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", %id, "Updating medication via HttpClient");
        let body = serde_json::to_value(medication)?;
        let envelope = self
            .execute(Method::PUT, &format!("/api/medications/{id}"), Some(body))
            .await?;
        record(envelope)
    }

    async fn delete_medication(&self, id: Uuid) -> Result<(), CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", %id, "Deleting medication via HttpClient");
        self.execute(Method::DELETE, &format!("/api/medications/{id}"), None)
            .await?;
        Ok(())
    }

    async fn list_patient_metrics(&self, patient_id: Uuid) -> Result<Vec<HealthMetric>, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", %patient_id, "Listing health metrics via HttpClient");
        let envelope = self
            .execute(
                Method::GET,
                &format!("/api/metrics/patient/{patient_id}"),
                None,
            )
            .await?;
        record_list(envelope)
    }

    async fn create_metric(&self, metric: &MetricPayload) -> Result<HealthMetric, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", patient_id = %metric.patient_id, metric_type = %metric.metric_type, "Recording health metric via HttpClient");
        let body = serde_json::to_value(metric)?;
        let envelope = self.execute(Method::POST, "/api/metrics", Some(body)).await?;
        record(envelope)
    }

    async fn get_health_trends(
        &self,
        patient_id: Uuid,
    ) -> Result<HashMap<String, Vec<HealthMetric>>, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", %patient_id, "Fetching health trends via HttpClient");
        // The trends endpoint answers with a bare map of metric type to
        // readings; normalization carries it through as the whole body.
        let envelope = self
            .execute(
                Method::GET,
                &format!("/api/metrics/trends/{patient_id}"),
                None,
            )
            .await?;
        record(envelope)
    }

    async fn list_reports(&self) -> Result<Vec<Report>, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", "Listing reports via HttpClient");
        let envelope = self.execute(Method::GET, "/api/reports", None).await?;
        record_list(envelope)
    }

    async fn get_report(&self, id: Uuid) -> Result<ReportDetail, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", %id, "Fetching report via HttpClient");
        let envelope = self
            .execute(Method::GET, &format!("/api/reports/{id}"), None)
            .await?;
        record(envelope)
    }

    async fn generate_report(&self, patient_id: Uuid) -> Result<Uuid, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", %patient_id, "Requesting report generation via HttpClient");
        let body = serde_json::json!({ "patientId": patient_id });
        let envelope = self
            .execute(Method::POST, "/api/reports/generate", Some(body))
            .await?;
        let generated: GeneratedReport = record(envelope)?;
        Ok(generated.id)
    }

    async fn analyze_patient_data(&self, request: &AnalysisRequest) -> Result<Analysis, CliError> {
        tracing::info!(target: "medthing_cli::client::implementation", patient_id = %request.patient_id, data_type = %request.data_type, "Requesting AI analysis via HttpClient");
        let body = serde_json::to_value(request)?;
        let response = self
            .raw_send(Method::POST, "/api/ai/analyze", Some(body))
            .await?;
        read_typed(response).await.map_err(|err| self.hook_failure(err))
    }

    async fn health_check(&self) -> Result<HealthStatus, CliError> {
        tracing::debug!(target: "medthing_cli::client::implementation", "Performing health check via HttpClient");
        let response = self.raw_send(Method::GET, "/", None).await?;
        read_typed(response).await
    }
}
