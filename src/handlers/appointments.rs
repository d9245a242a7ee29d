use chrono::{NaiveDate, NaiveTime};

use crate::client::{Appointment, AppointmentPayload, HttpClient};
use crate::error::CliError;
use crate::io::IoHandler;

use super::patients::select_patient;

const STATUSES: &[&str] = &["scheduled", "completed", "cancelled"];

fn validate_date(input: &str) -> Result<(), CliError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| CliError::InputError("Date must be in YYYY-MM-DD format.".into()))?;
    Ok(())
}

fn validate_time(input: &str) -> Result<(), CliError> {
    NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| CliError::InputError("Time must be in HH:MM format.".into()))?;
    Ok(())
}

/// Handler function for listing all appointments
pub async fn handle_list_appointments_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    io_handler.write_line("\nFetching appointments...")?;
    let appointments = client.list_appointments().await?;
    if appointments.is_empty() {
        io_handler.write_line("No appointments scheduled.")?;
        return Ok(());
    }
    io_handler.write_line("Appointments:")?;
    for appointment in appointments {
        let patient = appointment
            .patient_name
            .as_deref()
            .map(str::to_string)
            .unwrap_or_else(|| appointment.patient_id.to_string());
        io_handler.write_line(&format!(
            "  - {} {} | {} | {} ({}) [ID: {}]",
            appointment.date,
            appointment.time,
            patient,
            appointment.reason,
            appointment.status,
            appointment.id
        ))?;
    }
    Ok(())
}

/// Handler function for scheduling a new appointment
pub async fn handle_schedule_appointment_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<Appointment, CliError> {
    let patient_id = select_patient(client, io_handler).await?;

    io_handler.write_line("\nSchedule an appointment.")?;
    let date = io_handler.read_line("Date (YYYY-MM-DD):")?;
    validate_date(&date)?;
    let time = io_handler.read_line("Time (HH:MM):")?;
    validate_time(&time)?;
    let reason = io_handler.read_line("Reason:")?;
    if reason.trim().is_empty() {
        return Err(CliError::InputError("Reason cannot be empty.".into()));
    }
    let notes = io_handler.read_line("Notes (optional):")?;

    io_handler.write_line("Scheduling...")?;
    let payload = AppointmentPayload {
        patient_id,
        date,
        time,
        reason,
        notes: if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        },
        status: "scheduled".to_string(),
    };
    client.create_appointment(&payload).await
}

/// Handler function for updating an appointment's status or details.
/// Blank answers keep the current value.
pub async fn handle_update_appointment_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<Appointment, CliError> {
    let appointment = select_appointment(client, io_handler).await?;

    io_handler.write_line("\nUpdate appointment (leave a field blank to keep the current value).")?;
    let date = io_handler.read_line(&format!("Date [{}]:", appointment.date))?;
    if !date.trim().is_empty() {
        validate_date(&date)?;
    }
    let time = io_handler.read_line(&format!("Time [{}]:", appointment.time))?;
    if !time.trim().is_empty() {
        validate_time(&time)?;
    }
    let reason = io_handler.read_line(&format!("Reason [{}]:", appointment.reason))?;
    let status = io_handler.read_line(&format!(
        "Status ({}) [{}]:",
        STATUSES.join("/"),
        appointment.status
    ))?;
    if !status.trim().is_empty() && !STATUSES.contains(&status.trim()) {
        return Err(CliError::InputError(format!(
            "Status must be one of: {}.",
            STATUSES.join(", ")
        )));
    }
    let notes = io_handler.read_line(&format!(
        "Notes [{}]:",
        appointment.notes.as_deref().unwrap_or("N/A")
    ))?;

    let keep = |input: String, current: String| {
        if input.trim().is_empty() {
            current
        } else {
            input
        }
    };

    let payload = AppointmentPayload {
        patient_id: appointment.patient_id,
        date: keep(date, appointment.date),
        time: keep(time, appointment.time),
        reason: keep(reason, appointment.reason),
        notes: if notes.trim().is_empty() {
            appointment.notes
        } else {
            Some(notes)
        },
        status: keep(status, appointment.status),
    };

    io_handler.write_line("Saving...")?;
    client.update_appointment(appointment.id, &payload).await
}

/// Handler function for deleting an appointment after confirmation
pub async fn handle_delete_appointment_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let appointment = select_appointment(client, io_handler).await?;
    let confirm = io_handler.read_line("Delete this appointment? (y/N):")?;
    if !confirm.eq_ignore_ascii_case("y") {
        io_handler.write_line("Deletion cancelled.")?;
        return Ok(());
    }
    client.delete_appointment(appointment.id).await?;
    io_handler.write_line("Appointment deleted.")?;
    Ok(())
}

/// Helper function for selecting an appointment from the list
async fn select_appointment<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<Appointment, CliError> {
    io_handler.write_line("\nFetching appointments...")?;
    let appointments = client.list_appointments().await?;

    if appointments.is_empty() {
        return Err(CliError::InputError(
            "No appointments found. Please schedule one first.".to_string(),
        ));
    }

    io_handler.write_line("Available appointments:")?;
    for (index, appointment) in appointments.iter().enumerate() {
        let patient = appointment
            .patient_name
            .as_deref()
            .map(str::to_string)
            .unwrap_or_else(|| appointment.patient_id.to_string());
        io_handler.write_line(&format!(
            "  [{}] {} {} | {} ({})",
            index + 1,
            appointment.date,
            appointment.time,
            patient,
            appointment.status
        ))?;
    }

    loop {
        let choice_str = io_handler.read_line("Select appointment by number:")?;
        match choice_str.parse::<usize>() {
            Ok(choice) if choice > 0 && choice <= appointments.len() => {
                return Ok(appointments[choice - 1].clone());
            }
            _ => {
                io_handler.write_line(&format!(
                    "Invalid selection. Please enter a number between 1 and {}.",
                    appointments.len()
                ))?;
            }
        }
    }
}
