// Declare modules
pub mod appointments;
pub mod auth;
pub mod health;
pub mod medications;
pub mod metrics;
pub mod patients;
pub mod reports;

// Re-export public API
pub use self::appointments::{
    handle_delete_appointment_action, handle_list_appointments_action,
    handle_schedule_appointment_action, handle_update_appointment_action,
};
pub use self::auth::{handle_login_action, handle_profile_action, handle_signup_action};
pub use self::health::handle_health_check_action;
pub use self::medications::handle_medication_management_menu;
pub use self::metrics::handle_metrics_menu;
pub use self::patients::{
    handle_add_patient_action, handle_delete_patient_action, handle_edit_patient_action,
    handle_list_patients_action, handle_view_patient_details_action,
};
pub use self::reports::handle_reports_menu;
