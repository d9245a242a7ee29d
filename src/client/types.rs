// Client-owned wire types for the MedThing API.
//
// The backend is tolerated in three response shapes (a full
// `{success, message, data}` envelope, a bare array, or a bare object);
// `RawBody` is the tagged classification of a parsed body and
// `ApiEnvelope` is the single normalized shape every call resolves to.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The normalized response shape every API call resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Classification of a parsed response body, decided once at the
/// deserialization boundary instead of shape-sniffing at call sites.
#[derive(Debug)]
pub(crate) enum RawBody {
    /// Already carries `success` and `message`.
    Enveloped(ApiEnvelope),
    /// A bare JSON array (the list endpoints).
    Array(Vec<Value>),
    /// An arbitrary object without envelope markers.
    Object(serde_json::Map<String, Value>),
    /// A scalar or null body.
    Other(Value),
}

/// An authenticated doctor profile, as returned by the auth endpoints and
/// persisted in durable storage under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    pub date: String,
    pub time: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetric {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub measured_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Report list entry. `status` is `processing` until the backend's
/// asynchronous generation pipeline finishes (then `completed` or
/// `failed`); unknown values are carried through rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub report_type: String,
    pub generated_at: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub age: i32,
    pub gender: String,
    pub date_of_birth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub content: String,
}

/// Full report, including the AI-generated content. `sections` and
/// `recommendations` are `null` until generation completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    #[serde(default)]
    pub patient_info: Option<PatientInfo>,
    pub report_type: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub sections: Option<Vec<ReportSection>>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    pub generated_at: DateTime<Utc>,
    pub status: String,
}

/// Payload and result of the ad-hoc AI analysis endpoint. The response is
/// a fixed `{data, summary}` shape, not an envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub patient_id: Uuid,
    pub data_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    pub data: Value,
    pub summary: String,
}

/// Root health endpoint response; also a fixed shape, outside the
/// enveloped `/api` surface.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Token + profile pair returned by login and signup. Both fields are
/// required: a token without a user record cannot satisfy the session
/// invariant and is rejected upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    pub token: String,
    pub user: Doctor,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenRefresh {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeneratedReport {
    pub id: Uuid,
}

/// Login credentials. The password stays wrapped in a `SecretString`
/// until the wire boundary.
#[derive(Debug, Clone)]
pub struct LoginPayload {
    pub email: String,
    pub password: SecretString,
}

/// Serializable form of `LoginPayload`; the only place the password is
/// exposed.
#[derive(Debug, Serialize)]
pub(crate) struct SerializableLoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a LoginPayload> for SerializableLoginPayload<'a> {
    fn from(payload: &'a LoginPayload) -> Self {
        Self {
            email: &payload.email,
            password: payload.password.expose_secret(),
        }
    }
}

/// Signup details: credentials plus the doctor profile fields.
#[derive(Debug, Clone)]
pub struct SignupPayload {
    pub email: String,
    pub password: SecretString,
    pub name: String,
    pub specialization: String,
    pub license_number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SerializableSignupPayload<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
    specialization: &'a str,
    license_number: &'a str,
}

impl<'a> From<&'a SignupPayload> for SerializableSignupPayload<'a> {
    fn from(payload: &'a SignupPayload) -> Self {
        Self {
            email: &payload.email,
            password: payload.password.expose_secret(),
            name: &payload.name,
            specialization: &payload.specialization,
            license_number: &payload.license_number,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub patient_id: Uuid,
    pub date: String,
    pub time: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationPayload {
    pub patient_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPayload {
    pub patient_id: Uuid,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub measured_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
