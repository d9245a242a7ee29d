use chrono::NaiveDate;
use uuid::Uuid;

use crate::client::{HttpClient, Medication, MedicationPayload};
use crate::error::CliError;
use crate::io::IoHandler;

use super::patients::select_patient;

fn validate_date(input: &str, field: &str) -> Result<(), CliError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CliError::InputError(format!("{} must be a date in YYYY-MM-DD format.", field))
    })?;
    Ok(())
}

/// Submenu loop for medication management
pub async fn handle_medication_management_menu<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    loop {
        io_handler.write_line("\n--- Medications ---")?;
        io_handler.write_line("[1] List Patient Medications")?;
        io_handler.write_line("[2] Add Medication")?;
        io_handler.write_line("[3] Update Medication")?;
        io_handler.write_line("[4] Delete Medication")?;
        io_handler.write_line("[b] Back")?;

        let choice = io_handler.read_line("Enter choice:")?;
        let result = match choice.as_str() {
            "1" => handle_list_medications_action(client, io_handler).await,
            "2" => match handle_add_medication_action(client, io_handler).await {
                Ok(medication) => {
                    tracing::info!(target: "medthing_cli::handlers::medications", medication_id = %medication.id, "Medication recorded");
                    io_handler
                        .write_line(&format!("Recorded medication '{}'.", medication.name))
                }
                Err(e) => Err(e),
            },
            "3" => match handle_update_medication_action(client, io_handler).await {
                Ok(medication) => {
                    io_handler.write_line(&format!("Updated medication '{}'.", medication.name))
                }
                Err(e) => Err(e),
            },
            "4" => handle_delete_medication_action(client, io_handler).await,
            "b" | "B" => return Ok(()),
            _ => {
                io_handler.write_line("Invalid choice, please try again.")?;
                Ok(())
            }
        };
        if let Err(e) = result {
            io_handler.write_line(&format!("Error: {}", e))?;
        }
    }
}

/// Handler function for listing a patient's medications
pub async fn handle_list_medications_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let patient_id = select_patient(client, io_handler).await?;

    io_handler.write_line("\nFetching medications...")?;
    let medications = client.list_patient_medications(patient_id).await?;
    if medications.is_empty() {
        io_handler.write_line("No medications recorded for this patient.")?;
        return Ok(());
    }
    io_handler.write_line("Medications:")?;
    for medication in medications {
        io_handler.write_line(&format!(
            "  - {} {} ({}) from {}{} [ID: {}]",
            medication.name,
            medication.dosage,
            medication.frequency,
            medication.start_date,
            medication
                .end_date
                .as_deref()
                .map(|end| format!(" to {}", end))
                .unwrap_or_default(),
            medication.id
        ))?;
    }
    Ok(())
}

/// Handler function for prescribing a medication
pub async fn handle_add_medication_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<Medication, CliError> {
    let patient_id = select_patient(client, io_handler).await?;

    io_handler.write_line("\nRecord a medication.")?;
    let name = io_handler.read_line("Medication Name:")?;
    if name.trim().is_empty() {
        return Err(CliError::InputError(
            "Medication name cannot be empty.".into(),
        ));
    }
    let dosage = io_handler.read_line("Dosage (e.g. 10mg):")?;
    let frequency = io_handler.read_line("Frequency (e.g. twice daily):")?;
    let start_date = io_handler.read_line("Start Date (YYYY-MM-DD):")?;
    validate_date(&start_date, "Start date")?;
    let end_date = io_handler.read_line("End Date (YYYY-MM-DD, optional):")?;
    if !end_date.trim().is_empty() {
        validate_date(&end_date, "End date")?;
    }
    let notes = io_handler.read_line("Notes (optional):")?;

    io_handler.write_line("Saving...")?;
    let payload = MedicationPayload {
        patient_id,
        name,
        dosage,
        frequency,
        start_date,
        end_date: if end_date.trim().is_empty() {
            None
        } else {
            Some(end_date)
        },
        notes: if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        },
    };
    client.create_medication(&payload).await
}

/// Handler function for updating a medication. Blank answers keep the
/// current value.
pub async fn handle_update_medication_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<Medication, CliError> {
    let patient_id = select_patient(client, io_handler).await?;
    let medication = select_medication(client, io_handler, patient_id).await?;

    io_handler.write_line("\nUpdate medication (leave a field blank to keep the current value).")?;
    let dosage = io_handler.read_line(&format!("Dosage [{}]:", medication.dosage))?;
    let frequency = io_handler.read_line(&format!("Frequency [{}]:", medication.frequency))?;
    let end_date = io_handler.read_line(&format!(
        "End Date [{}]:",
        medication.end_date.as_deref().unwrap_or("N/A")
    ))?;
    if !end_date.trim().is_empty() {
        validate_date(&end_date, "End date")?;
    }
    let notes = io_handler.read_line(&format!(
        "Notes [{}]:",
        medication.notes.as_deref().unwrap_or("N/A")
    ))?;

    let keep = |input: String, current: String| {
        if input.trim().is_empty() {
            current
        } else {
            input
        }
    };

    let payload = MedicationPayload {
        patient_id: medication.patient_id,
        name: medication.name,
        dosage: keep(dosage, medication.dosage),
        frequency: keep(frequency, medication.frequency),
        start_date: medication.start_date,
        end_date: if end_date.trim().is_empty() {
            medication.end_date
        } else {
            Some(end_date)
        },
        notes: if notes.trim().is_empty() {
            medication.notes
        } else {
            Some(notes)
        },
    };

    io_handler.write_line("Saving...")?;
    client.update_medication(medication.id, &payload).await
}

/// Handler function for removing a medication after confirmation
pub async fn handle_delete_medication_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let patient_id = select_patient(client, io_handler).await?;
    let medication = select_medication(client, io_handler, patient_id).await?;

    let confirm = io_handler.read_line("Delete this medication? (y/N):")?;
    if !confirm.eq_ignore_ascii_case("y") {
        io_handler.write_line("Deletion cancelled.")?;
        return Ok(());
    }
    client.delete_medication(medication.id).await?;
    io_handler.write_line("Medication deleted.")?;
    Ok(())
}

/// Helper function for selecting one of a patient's medications
async fn select_medication<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
    patient_id: Uuid,
) -> Result<Medication, CliError> {
    let medications = client.list_patient_medications(patient_id).await?;
    if medications.is_empty() {
        return Err(CliError::InputError(
            "No medications found for this patient.".to_string(),
        ));
    }

    io_handler.write_line("Medications:")?;
    for (index, medication) in medications.iter().enumerate() {
        io_handler.write_line(&format!(
            "  [{}] {} {} ({})",
            index + 1,
            medication.name,
            medication.dosage,
            medication.frequency
        ))?;
    }

    loop {
        let choice_str = io_handler.read_line("Select medication by number:")?;
        match choice_str.parse::<usize>() {
            Ok(choice) if choice > 0 && choice <= medications.len() => {
                return Ok(medications[choice - 1].clone());
            }
            _ => {
                io_handler.write_line(&format!(
                    "Invalid selection. Please enter a number between 1 and {}.",
                    medications.len()
                ))?;
            }
        }
    }
}
