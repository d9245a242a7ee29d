//! Shared test doubles for the session and client layers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::client::types::{
    Analysis, AnalysisRequest, Appointment, AppointmentPayload, AuthData, Doctor, HealthMetric,
    HealthStatus, LoginPayload, Medication, MedicationPayload, MetricPayload, Patient,
    PatientPayload, Report, ReportDetail, SignupPayload,
};
use crate::client::HttpClient;
use crate::error::CliError;
use crate::notify::Notifier;
use crate::session::Navigator;

/// Records every navigation so tests can assert on redirect behavior.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

/// Records notifications so tests can assert "one message per failure".
#[derive(Default)]
pub struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// An `HttpClient` that panics on any call. Used to prove that a code
/// path (e.g. the empty-credential guard) never reaches the network.
pub struct UnreachableClient;

#[async_trait]
impl HttpClient for UnreachableClient {
    async fn login(&self, _credentials: &LoginPayload) -> Result<AuthData, CliError> {
        unreachable!("login must not be called")
    }

    async fn signup(&self, _details: &SignupPayload) -> Result<AuthData, CliError> {
        unreachable!("signup must not be called")
    }

    async fn me(&self) -> Result<Doctor, CliError> {
        unreachable!("me must not be called")
    }

    async fn refresh_token(&self) -> Result<String, CliError> {
        unreachable!("refresh_token must not be called")
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, CliError> {
        unreachable!("list_patients must not be called")
    }

    async fn get_patient(&self, _id: Uuid) -> Result<Patient, CliError> {
        unreachable!("get_patient must not be called")
    }

    async fn create_patient(&self, _patient: &PatientPayload) -> Result<Patient, CliError> {
        unreachable!("create_patient must not be called")
    }

    async fn update_patient(
        &self,
        _id: Uuid,
        _patient: &PatientPayload,
    ) -> Result<Patient, CliError> {
        unreachable!("update_patient must not be called")
    }

    async fn delete_patient(&self, _id: Uuid) -> Result<(), CliError> {
        unreachable!("delete_patient must not be called")
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, CliError> {
        unreachable!("list_appointments must not be called")
    }

    async fn get_appointment(&self, _id: Uuid) -> Result<Appointment, CliError> {
        unreachable!("get_appointment must not be called")
    }

    async fn create_appointment(
        &self,
        _appointment: &AppointmentPayload,
    ) -> Result<Appointment, CliError> {
        unreachable!("create_appointment must not be called")
    }

    async fn update_appointment(
        &self,
        _id: Uuid,
        _appointment: &AppointmentPayload,
    ) -> Result<Appointment, CliError> {
        unreachable!("update_appointment must not be called")
    }

    async fn delete_appointment(&self, _id: Uuid) -> Result<(), CliError> {
        unreachable!("delete_appointment must not be called")
    }

    async fn list_patient_medications(
        &self,
        _patient_id: Uuid,
    ) -> Result<Vec<Medication>, CliError> {
        unreachable!("list_patient_medications must not be called")
    }

    async fn create_medication(
        &self,
        _medication: &MedicationPayload,
    ) -> Result<Medication, CliError> {
        unreachable!("create_medication must not be called")
    }

    async fn update_medication(
        &self,
        _id: Uuid,
        _medication: &MedicationPayload,
    ) -> Result<Medication, CliError> {
        unreachable!("update_medication must not be called")
    }

    async fn delete_medication(&self, _id: Uuid) -> Result<(), CliError> {
        unreachable!("delete_medication must not be called")
    }

    async fn list_patient_metrics(
        &self,
        _patient_id: Uuid,
    ) -> Result<Vec<HealthMetric>, CliError> {
        unreachable!("list_patient_metrics must not be called")
    }

    async fn create_metric(&self, _metric: &MetricPayload) -> Result<HealthMetric, CliError> {
        unreachable!("create_metric must not be called")
    }

    async fn get_health_trends(
        &self,
        _patient_id: Uuid,
    ) -> Result<HashMap<String, Vec<HealthMetric>>, CliError> {
        unreachable!("get_health_trends must not be called")
    }

    async fn list_reports(&self) -> Result<Vec<Report>, CliError> {
        unreachable!("list_reports must not be called")
    }

    async fn get_report(&self, _id: Uuid) -> Result<ReportDetail, CliError> {
        unreachable!("get_report must not be called")
    }

    async fn generate_report(&self, _patient_id: Uuid) -> Result<Uuid, CliError> {
        unreachable!("generate_report must not be called")
    }

    async fn analyze_patient_data(
        &self,
        _request: &AnalysisRequest,
    ) -> Result<Analysis, CliError> {
        unreachable!("analyze_patient_data must not be called")
    }

    async fn health_check(&self) -> Result<HealthStatus, CliError> {
        unreachable!("health_check must not be called")
    }
}
