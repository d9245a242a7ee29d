use crate::client::{AnalysisRequest, HttpClient, Report};
use crate::error::CliError;
use crate::io::IoHandler;

use super::patients::select_patient;

const ANALYSIS_TYPES: &[&str] = &["metrics", "medications", "appointments"];

/// Submenu loop for AI reports and analysis
pub async fn handle_reports_menu<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    loop {
        io_handler.write_line("\n--- Reports ---")?;
        io_handler.write_line("[1] List Reports")?;
        io_handler.write_line("[2] View Report")?;
        io_handler.write_line("[3] Generate Report")?;
        io_handler.write_line("[4] AI Analysis")?;
        io_handler.write_line("[b] Back")?;

        let choice = io_handler.read_line("Enter choice:")?;
        let result = match choice.as_str() {
            "1" => handle_list_reports_action(client, io_handler).await,
            "2" => handle_view_report_action(client, io_handler).await,
            "3" => handle_generate_report_action(client, io_handler).await,
            "4" => handle_analysis_action(client, io_handler).await,
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

/// Handler function for listing generated reports
pub async fn handle_list_reports_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    io_handler.write_line("\nFetching reports...")?;
    let reports = client.list_reports().await?;
    if reports.is_empty() {
        io_handler.write_line("No reports found.")?;
        return Ok(());
    }
    io_handler.write_line("Reports:")?;
    for report in reports {
        io_handler.write_line(&format!(
            "  - {} | {} | {} ({}) [ID: {}]",
            report.generated_at.format("%Y-%m-%d %H:%M"),
            report.patient_name,
            report.report_type,
            report.status,
            report.id
        ))?;
    }
    Ok(())
}

/// Handler function for viewing a report's content
pub async fn handle_view_report_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let report = select_report(client, io_handler).await?;

    io_handler.write_line("\nFetching report...")?;
    let detail = client.get_report(report.id).await?;

    io_handler.write_line(&format!("--- {} ---", detail.report_type))?;
    io_handler.write_line(&format!("Patient: {}", detail.patient_name))?;
    if let Some(info) = &detail.patient_info {
        io_handler.write_line(&format!(
            "  Age {}, {}, born {}",
            info.age, info.gender, info.date_of_birth
        ))?;
    }
    io_handler.write_line(&format!(
        "Generated: {}",
        detail.generated_at.format("%Y-%m-%d %H:%M")
    ))?;

    match detail.status.as_str() {
        "processing" => {
            io_handler.write_line("This report is still being generated. Check back shortly.")?;
            return Ok(());
        }
        "failed" => {
            io_handler.write_line(&format!("Report generation failed: {}", detail.summary))?;
            return Ok(());
        }
        _ => {}
    }

    if !detail.summary.is_empty() {
        io_handler.write_line("\nSummary:")?;
        io_handler.write_line(&detail.summary)?;
    }
    for section in detail.sections.unwrap_or_default() {
        io_handler.write_line(&format!("\n## {}", section.title))?;
        io_handler.write_line(&section.content)?;
    }
    let recommendations = detail.recommendations.unwrap_or_default();
    if !recommendations.is_empty() {
        io_handler.write_line("\nRecommendations:")?;
        for recommendation in recommendations {
            io_handler.write_line(&format!("  - {}", recommendation))?;
        }
    }
    Ok(())
}

/// Handler function for kicking off report generation. The backend
/// answers immediately with the report id and fills in the content
/// asynchronously.
pub async fn handle_generate_report_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let patient_id = select_patient(client, io_handler).await?;

    io_handler.write_line("\nRequesting report generation...")?;
    let report_id = client.generate_report(patient_id).await?;
    io_handler.write_line(&format!("Report generation started (ID: {}).", report_id))?;
    io_handler.write_line("The report will appear in the report list once processing finishes.")?;
    Ok(())
}

/// Handler function for running an ad-hoc AI analysis over one category
/// of a patient's data
pub async fn handle_analysis_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    let patient_id = select_patient(client, io_handler).await?;

    let data_type = io_handler.read_line(&format!(
        "Data to analyze ({}):",
        ANALYSIS_TYPES.join("/")
    ))?;
    if !ANALYSIS_TYPES.contains(&data_type.trim()) {
        return Err(CliError::InputError(format!(
            "Data type must be one of: {}.",
            ANALYSIS_TYPES.join(", ")
        )));
    }

    io_handler.write_line("Analyzing...")?;
    let request = AnalysisRequest {
        patient_id,
        data_type: data_type.trim().to_string(),
    };
    let analysis = client.analyze_patient_data(&request).await?;
    io_handler.write_line("\nAnalysis summary:")?;
    io_handler.write_line(&analysis.summary)?;
    Ok(())
}

/// Helper function for selecting a report from the list
async fn select_report<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<Report, CliError> {
    io_handler.write_line("\nFetching reports...")?;
    let reports = client.list_reports().await?;

    if reports.is_empty() {
        return Err(CliError::InputError(
            "No reports found. Please generate one first.".to_string(),
        ));
    }

    io_handler.write_line("Available reports:")?;
    for (index, report) in reports.iter().enumerate() {
        io_handler.write_line(&format!(
            "  [{}] {} | {} ({})",
            index + 1,
            report.patient_name,
            report.report_type,
            report.status
        ))?;
    }

    loop {
        let choice_str = io_handler.read_line("Select report by number:")?;
        match choice_str.parse::<usize>() {
            Ok(choice) if choice > 0 && choice <= reports.len() => {
                return Ok(reports[choice - 1].clone());
            }
            _ => {
                io_handler.write_line(&format!(
                    "Invalid selection. Please enter a number between 1 and {}.",
                    reports.len()
                ))?;
            }
        }
    }
}
