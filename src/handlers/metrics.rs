use chrono::NaiveDate;

use crate::client::{HealthMetric, HttpClient, MetricPayload};
use crate::error::CliError;
use crate::io::IoHandler;

use super::patients::select_patient;

// Common metric types; free-form values are accepted too.
const KNOWN_TYPES: &[&str] = &["blood_pressure", "blood_sugar", "weight", "heart_rate"];

/// Submenu loop for health metrics
pub async fn handle_metrics_menu<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    loop {
        io_handler.write_line("\n--- Health Metrics ---")?;
        io_handler.write_line("[1] List Patient Metrics")?;
        io_handler.write_line("[2] Record Health Metric")?;
        io_handler.write_line("[3] Health Trends")?;
        io_handler.write_line("[b] Back")?;

        let choice = io_handler.read_line("Enter choice:")?;
        let result = match choice.as_str() {
            "1" => handle_list_metrics_action(client, io_handler).await,
            "2" => match handle_record_metric_action(client, io_handler).await {
                Ok(metric) => io_handler.write_line(&format!(
                    "Recorded {} reading: {} {}.",
                    metric.metric_type, metric.value, metric.unit
                )),
                Err(e) => Err(e),
            },
            "3" => handle_health_trends_action(client, io_handler).await,
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

/// Handler function for listing a patient's health metrics
pub async fn handle_list_metrics_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let patient_id = select_patient(client, io_handler).await?;

    io_handler.write_line("\nFetching health metrics...")?;
    let metrics = client.list_patient_metrics(patient_id).await?;
    if metrics.is_empty() {
        io_handler.write_line("No health metrics recorded for this patient.")?;
        return Ok(());
    }
    io_handler.write_line("Health metrics:")?;
    for metric in metrics {
        io_handler.write_line(&format!(
            "  - {} {}: {} {} ({})",
            metric.measured_at, metric.metric_type, metric.value, metric.unit, metric.id
        ))?;
    }
    Ok(())
}

/// Handler function for recording a new health metric reading
pub async fn handle_record_metric_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<HealthMetric, CliError> {
    let patient_id = select_patient(client, io_handler).await?;

    io_handler.write_line("\nRecord a health metric.")?;
    io_handler.write_line(&format!("Common types: {}", KNOWN_TYPES.join(", ")))?;
    let metric_type = io_handler.read_line("Metric Type:")?;
    if metric_type.trim().is_empty() {
        return Err(CliError::InputError("Metric type cannot be empty.".into()));
    }
    let value_str = io_handler.read_line("Value:")?;
    let value: f64 = value_str
        .trim()
        .parse()
        .map_err(|_| CliError::InputError("Value must be a number.".into()))?;
    let unit = io_handler.read_line("Unit (e.g. mmHg, kg):")?;
    let measured_at = io_handler.read_line("Measured At (YYYY-MM-DD):")?;
    NaiveDate::parse_from_str(&measured_at, "%Y-%m-%d")
        .map_err(|_| CliError::InputError("Measured-at must be a date in YYYY-MM-DD format.".into()))?;
    let notes = io_handler.read_line("Notes (optional):")?;

    io_handler.write_line("Saving...")?;
    let payload = MetricPayload {
        patient_id,
        metric_type,
        value,
        unit,
        measured_at,
        notes: if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        },
    };
    client.create_metric(&payload).await
}

/// Handler function for showing a patient's metric trends, grouped by
/// metric type the way the backend reports them.
pub async fn handle_health_trends_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let patient_id = select_patient(client, io_handler).await?;

    io_handler.write_line("\nFetching health trends...")?;
    let trends = client.get_health_trends(patient_id).await?;
    if trends.is_empty() {
        io_handler.write_line("No trend data for this patient.")?;
        return Ok(());
    }

    for (metric_type, mut readings) in trends {
        readings.sort_by(|a, b| a.measured_at.cmp(&b.measured_at));
        io_handler.write_line(&format!("--- {} ({} readings) ---", metric_type, readings.len()))?;
        for reading in &readings {
            io_handler.write_line(&format!(
                "  {} : {} {}",
                reading.measured_at, reading.value, reading.unit
            ))?;
        }
        if readings.len() > 1 {
            if let (Some(first), Some(last)) = (readings.first(), readings.last()) {
                let delta = last.value - first.value;
                io_handler.write_line(&format!(
                    "  Change over period: {}{:.2} {}",
                    if delta >= 0.0 { "+" } else { "" },
                    delta,
                    last.unit
                ))?;
            }
        }
    }
    Ok(())
}
