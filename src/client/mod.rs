// Declare modules
pub mod interface;
pub mod types;

mod implementation;
mod util;


// Re-export public API
pub use self::implementation::ReqwestClientWrapper;
pub use self::interface::HttpClient;

// Types consumers of the client module (handlers, session store, main)
// need by name.
pub use self::types::{
    Analysis, AnalysisRequest, ApiEnvelope, Appointment, AppointmentPayload, AuthData, Doctor,
    HealthMetric, HealthStatus, LoginPayload, Medication, MedicationPayload, MetricPayload,
    Patient, PatientPayload, Report, ReportDetail, ReportSection, SignupPayload,
};
