use crate::error::CliError;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use super::types::{
    Analysis, AnalysisRequest, Appointment, AppointmentPayload, AuthData, Doctor, HealthMetric,
    HealthStatus, LoginPayload, Medication, MedicationPayload, MetricPayload, Patient,
    PatientPayload, Report, ReportDetail, SignupPayload,
};

/// Trait for abstracting HTTP client interactions to allow mocking in tests.
///
/// One network call per invocation; no caching, dedup, or batching. List
/// operations coerce a missing or non-array `data` field to an empty `Vec`
/// rather than failing.
#[async_trait]
pub trait HttpClient: Send + Sync {
    // Authentication
    async fn login(&self, credentials: &LoginPayload) -> Result<AuthData, CliError>;
    async fn signup(&self, details: &SignupPayload) -> Result<AuthData, CliError>;
    async fn me(&self) -> Result<Doctor, CliError>;
    async fn refresh_token(&self) -> Result<String, CliError>;

    // Patients
    async fn list_patients(&self) -> Result<Vec<Patient>, CliError>;
    async fn get_patient(&self, id: Uuid) -> Result<Patient, CliError>;
    async fn create_patient(&self, patient: &PatientPayload) -> Result<Patient, CliError>;
    async fn update_patient(&self, id: Uuid, patient: &PatientPayload)
        -> Result<Patient, CliError>;
    async fn delete_patient(&self, id: Uuid) -> Result<(), CliError>;

    // Appointments
    async fn list_appointments(&self) -> Result<Vec<Appointment>, CliError>;
    async fn get_appointment(&self, id: Uuid) -> Result<Appointment, CliError>;
    async fn create_appointment(
        &self,
        appointment: &AppointmentPayload,
    ) -> Result<Appointment, CliError>;
    async fn update_appointment(
        &self,
        id: Uuid,
        appointment: &AppointmentPayload,
    ) -> Result<Appointment, CliError>;
    async fn delete_appointment(&self, id: Uuid) -> Result<(), CliError>;

    // Medications
    async fn list_patient_medications(&self, patient_id: Uuid)
        -> Result<Vec<Medication>, CliError>;
    async fn create_medication(&self, medication: &MedicationPayload)
        -> Result<Medication, CliError>;
    async fn update_medication(
        &self,
        id: Uuid,
        medication: &MedicationPayload,
    ) -> Result<Medication, CliError>;
    async fn delete_medication(&self, id: Uuid) -> Result<(), CliError>;

    // Health metrics
    async fn list_patient_metrics(&self, patient_id: Uuid) -> Result<Vec<HealthMetric>, CliError>;
    async fn create_metric(&self, metric: &MetricPayload) -> Result<HealthMetric, CliError>;
    async fn get_health_trends(
        &self,
        patient_id: Uuid,
    ) -> Result<HashMap<String, Vec<HealthMetric>>, CliError>;

    // Reports
    async fn list_reports(&self) -> Result<Vec<Report>, CliError>;
    async fn get_report(&self, id: Uuid) -> Result<ReportDetail, CliError>;
    async fn generate_report(&self, patient_id: Uuid) -> Result<Uuid, CliError>;

    // AI analysis
    async fn analyze_patient_data(&self, request: &AnalysisRequest) -> Result<Analysis, CliError>;

    // Server health
    async fn health_check(&self) -> Result<HealthStatus, CliError>;
}
