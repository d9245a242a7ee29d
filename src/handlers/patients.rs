use chrono::NaiveDate;
use uuid::Uuid;

use crate::client::{HttpClient, Patient, PatientPayload};
use crate::error::CliError;
use crate::io::IoHandler;

fn optional(input: String) -> Option<String> {
    if input.trim().is_empty() {
        None
    } else {
        Some(input)
    }
}

fn validate_date(input: &str, field: &str) -> Result<(), CliError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CliError::InputError(format!("{} must be a date in YYYY-MM-DD format.", field))
    })?;
    Ok(())
}

/// Handler function for listing all patients
pub async fn handle_list_patients_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    io_handler.write_line("\nFetching patients...")?;
    let patients = client.list_patients().await?;
    if patients.is_empty() {
        io_handler.write_line("No patients on file.")?;
        return Ok(());
    }
    io_handler.write_line("Patients:")?;
    for patient in patients {
        io_handler.write_line(&format!(
            "  - {} ({}, born {}) [ID: {}]",
            patient.name, patient.gender, patient.date_of_birth, patient.id
        ))?;
    }
    Ok(())
}

/// Handler function for registering a new patient
pub async fn handle_add_patient_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<Patient, CliError> {
    io_handler.write_line("\nRegister a new patient.")?;
    let name = io_handler.read_line("Name:")?;
    if name.trim().is_empty() {
        return Err(CliError::InputError("Patient name cannot be empty.".into()));
    }
    let date_of_birth = io_handler.read_line("Date of Birth (YYYY-MM-DD):")?;
    validate_date(&date_of_birth, "Date of birth")?;
    let gender = io_handler.read_line("Gender:")?;
    let contact = io_handler.read_line("Contact:")?;
    if contact.trim().is_empty() {
        return Err(CliError::InputError(
            "Contact information cannot be empty.".into(),
        ));
    }
    let address = optional(io_handler.read_line("Address (optional):")?);
    let blood_group = optional(io_handler.read_line("Blood Group (optional):")?);
    let allergies = optional(io_handler.read_line("Allergies (optional):")?);

    io_handler.write_line("Saving...")?;
    let payload = PatientPayload {
        name,
        date_of_birth,
        gender,
        contact,
        address,
        blood_group,
        allergies,
    };
    client.create_patient(&payload).await
}

/// Handler function for viewing a patient's full record
pub async fn handle_view_patient_details_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let patient_id = select_patient(client, io_handler).await?;

    io_handler.write_line("\nFetching patient details...")?;
    let patient = client.get_patient(patient_id).await?;
    io_handler.write_line(&format!("--- Patient Record (ID: {}) ---", patient.id))?;
    io_handler.write_line(&format!("  Name: {}", patient.name))?;
    io_handler.write_line(&format!("  Date of Birth: {}", patient.date_of_birth))?;
    io_handler.write_line(&format!("  Gender: {}", patient.gender))?;
    io_handler.write_line(&format!("  Contact: {}", patient.contact))?;
    io_handler.write_line(&format!(
        "  Address: {}",
        patient.address.as_deref().unwrap_or("N/A")
    ))?;
    io_handler.write_line(&format!(
        "  Blood Group: {}",
        patient.blood_group.as_deref().unwrap_or("N/A")
    ))?;
    io_handler.write_line(&format!(
        "  Allergies: {}",
        patient.allergies.as_deref().unwrap_or("None recorded")
    ))?;
    io_handler.write_line("-------------------------------")?;
    Ok(())
}

/// Handler function for editing an existing patient. Blank answers keep
/// the current value.
pub async fn handle_edit_patient_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<Patient, CliError> {
    let patient_id = select_patient(client, io_handler).await?;
    let current = client.get_patient(patient_id).await?;

    io_handler.write_line("\nEdit patient (leave a field blank to keep the current value).")?;
    let name = io_handler.read_line(&format!("Name [{}]:", current.name))?;
    let date_of_birth =
        io_handler.read_line(&format!("Date of Birth [{}]:", current.date_of_birth))?;
    if !date_of_birth.trim().is_empty() {
        validate_date(&date_of_birth, "Date of birth")?;
    }
    let gender = io_handler.read_line(&format!("Gender [{}]:", current.gender))?;
    let contact = io_handler.read_line(&format!("Contact [{}]:", current.contact))?;
    let address = io_handler.read_line(&format!(
        "Address [{}]:",
        current.address.as_deref().unwrap_or("N/A")
    ))?;
    let blood_group = io_handler.read_line(&format!(
        "Blood Group [{}]:",
        current.blood_group.as_deref().unwrap_or("N/A")
    ))?;
    let allergies = io_handler.read_line(&format!(
        "Allergies [{}]:",
        current.allergies.as_deref().unwrap_or("None recorded")
    ))?;

    let keep = |input: String, current: String| {
        if input.trim().is_empty() {
            current
        } else {
            input
        }
    };
    let keep_optional = |input: String, current: Option<String>| {
        if input.trim().is_empty() {
            current
        } else {
            Some(input)
        }
    };

    let payload = PatientPayload {
        name: keep(name, current.name),
        date_of_birth: keep(date_of_birth, current.date_of_birth),
        gender: keep(gender, current.gender),
        contact: keep(contact, current.contact),
        address: keep_optional(address, current.address),
        blood_group: keep_optional(blood_group, current.blood_group),
        allergies: keep_optional(allergies, current.allergies),
    };

    io_handler.write_line("Saving...")?;
    client.update_patient(patient_id, &payload).await
}

/// Handler function for deleting a patient after confirmation
pub async fn handle_delete_patient_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let patient_id = select_patient(client, io_handler).await?;
    let confirm = io_handler.read_line("Delete this patient and their records? (y/N):")?;
    if !confirm.eq_ignore_ascii_case("y") {
        io_handler.write_line("Deletion cancelled.")?;
        return Ok(());
    }
    client.delete_patient(patient_id).await?;
    io_handler.write_line("Patient deleted.")?;
    Ok(())
}

/// Helper function for selecting a patient from the list
pub async fn select_patient<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<Uuid, CliError> {
    io_handler.write_line("\nFetching patients...")?;
    let patients = client.list_patients().await?;

    if patients.is_empty() {
        return Err(CliError::InputError(
            "No patients found. Please register a patient first.".to_string(),
        ));
    }

    io_handler.write_line("Available patients:")?;
    for (index, patient) in patients.iter().enumerate() {
        io_handler.write_line(&format!(
            "  [{}] {} (ID: {})",
            index + 1,
            patient.name,
            patient.id
        ))?;
    }

    loop {
        let choice_str = io_handler.read_line("Select patient by number:")?;
        match choice_str.parse::<usize>() {
            Ok(choice) if choice > 0 && choice <= patients.len() => {
                let selected = &patients[choice - 1];
                io_handler.write_line(&format!("Selected: {}", selected.name))?;
                return Ok(selected.id);
            }
            _ => {
                io_handler.write_line(&format!(
                    "Invalid selection. Please enter a number between 1 and {}.",
                    patients.len()
                ))?;
            }
        }
    }
}
