use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client as ReqwestClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use medthing_cli::client::ReqwestClientWrapper;
use medthing_cli::handlers::*;
use medthing_cli::io::{IoHandler, StdIoHandler};
use medthing_cli::notify::{Notifier, TerminalNotifier};
use medthing_cli::session::{CliNavigator, Navigator, SessionStore};
use medthing_cli::storage::{CookieSink, FileCookieSink, FileStorage, SessionStorage};
use medthing_cli::CliError;

/// A CLI client for the MedThing practice-management backend.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the MedThing backend server
    #[arg(
        short,
        long,
        env = "MEDTHING_BASE_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    base_url: Url,

    /// Directory holding the persisted session (storage and cookie files)
    #[arg(long, env = "MEDTHING_SESSION_DIR", default_value = ".medthing")]
    session_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "medthing_cli=info".into());
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();
    let mut io_handler = StdIoHandler::default();

    tracing::info!(base_url = %args.base_url, "Starting MedThing CLI client");

    let storage: Arc<dyn SessionStorage> =
        Arc::new(FileStorage::open(args.session_dir.join("session.json")));
    let cookies: Arc<dyn CookieSink> =
        Arc::new(FileCookieSink::new(args.session_dir.join("cookies.txt")));
    let navigator: Arc<dyn Navigator> = Arc::new(CliNavigator::new());
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);

    // Hydrates from durable storage; a malformed stored session is
    // discarded and we start logged out.
    let session = Arc::new(SessionStore::restore(
        storage,
        cookies,
        navigator,
        notifier.clone(),
    ));

    let reqwest_client = ReqwestClient::builder()
        .build()
        .context("Failed to build reqwest client")?;
    let http_client = ReqwestClientWrapper::new(
        reqwest_client,
        args.base_url.clone(),
        session.clone(),
        notifier,
    );

    io_handler.write_line("Welcome to MedThing CLI!")?;
    io_handler.write_line(&format!("Connecting to: {}", args.base_url))?;
    if let Some(user) = session.current_user() {
        io_handler.write_line(&format!("Restored session for '{}'.", user.name))?;
    }

    loop {
        if !session.is_authenticated() {
            // --- Unauthenticated Menu ---
            io_handler.write_line("\n--- Main Menu ---")?;
            io_handler.write_line("[1] Login")?;
            io_handler.write_line("[2] Sign Up")?;
            io_handler.write_line("[3] Health Check")?;
            io_handler.write_line("[q] Quit")?;

            let choice = io_handler.read_line("Enter choice:")?;

            match choice.as_str() {
                "1" => {
                    match handle_login_action(&session, &http_client, &mut io_handler).await {
                        Ok(user) => {
                            tracing::info!(email = %user.email, "Login successful");
                            io_handler
                                .write_line(&format!("Logged in as Dr. {}.", user.name))?;
                        }
                        Err(e) => {
                            tracing::error!(error = ?e, "Login failed");
                            io_handler.write_line(&format!("Login failed: {}", e))?;
                        }
                    }
                }
                "2" => {
                    match handle_signup_action(&session, &http_client, &mut io_handler).await {
                        Ok(user) => {
                            tracing::info!(email = %user.email, "Signup successful");
                            io_handler.write_line(&format!(
                                "Account created. Welcome, Dr. {}.",
                                user.name
                            ))?;
                        }
                        Err(e) => {
                            tracing::error!(error = ?e, "Signup failed");
                            io_handler.write_line(&format!("Signup failed: {}", e))?;
                        }
                    }
                }
                "3" => {
                    if let Err(e) = handle_health_check_action(&http_client, &mut io_handler).await
                    {
                        tracing::error!(error = ?e, "Health check failed");
                        io_handler.write_line(&format!("Health check failed: {}", e))?;
                    }
                }
                "q" | "Q" => {
                    io_handler.write_line("Exiting MedThing CLI.")?;
                    return Ok(());
                }
                _ => {
                    io_handler.write_line("Invalid choice, please try again.")?;
                }
            }
        } else {
            // --- Authenticated Menu ---
            let doctor_name = session
                .current_user()
                .map(|user| user.name)
                .unwrap_or_else(|| "Unknown".to_string());
            io_handler.write_line(&format!("\n--- MedThing Menu (Dr. {}) ---", doctor_name))?;
            io_handler.write_line("--- Patients ---")?;
            io_handler.write_line("[1] List Patients")?;
            io_handler.write_line("[2] Add Patient")?;
            io_handler.write_line("[3] View Patient Details")?;
            io_handler.write_line("[4] Edit Patient")?;
            io_handler.write_line("[5] Delete Patient")?;
            io_handler.write_line("--- Appointments ---")?;
            io_handler.write_line("[6] List Appointments")?;
            io_handler.write_line("[7] Schedule Appointment")?;
            io_handler.write_line("[8] Update Appointment")?;
            io_handler.write_line("[9] Delete Appointment")?;
            io_handler.write_line("--- Records ---")?;
            io_handler.write_line("[10] Medications")?;
            io_handler.write_line("[11] Health Metrics")?;
            io_handler.write_line("[12] Reports & Analysis")?;
            io_handler.write_line("--- Account ---")?;
            io_handler.write_line("[13] My Profile")?;
            io_handler.write_line("[14] Logout")?;
            io_handler.write_line("[q] Quit Application")?;

            let choice = io_handler.read_line("Enter choice:")?;

            match choice.as_str() {
                "1" => {
                    if let Err(e) = handle_list_patients_action(&http_client, &mut io_handler).await
                    {
                        report_error(&mut io_handler, "Error listing patients", e)?;
                    }
                }
                "2" => match handle_add_patient_action(&http_client, &mut io_handler).await {
                    Ok(patient) => {
                        tracing::info!(patient_id = %patient.id, "Patient registered");
                        io_handler.write_line(&format!(
                            "Registered patient '{}' (ID: {}).",
                            patient.name, patient.id
                        ))?;
                    }
                    Err(e) => report_error(&mut io_handler, "Error registering patient", e)?,
                },
                "3" => {
                    match handle_view_patient_details_action(&http_client, &mut io_handler).await {
                        Ok(()) => {}
                        Err(CliError::InputError(msg)) if msg.contains("No patients found") => {
                            io_handler.write_line(&msg)?;
                        }
                        Err(e) => report_error(&mut io_handler, "Error viewing patient", e)?,
                    }
                }
                "4" => match handle_edit_patient_action(&http_client, &mut io_handler).await {
                    Ok(patient) => {
                        io_handler
                            .write_line(&format!("Updated patient '{}'.", patient.name))?;
                    }
                    Err(CliError::InputError(msg)) if msg.contains("No patients found") => {
                        io_handler.write_line(&msg)?;
                    }
                    Err(e) => report_error(&mut io_handler, "Error updating patient", e)?,
                },
                "5" => match handle_delete_patient_action(&http_client, &mut io_handler).await {
                    Ok(()) => {}
                    Err(CliError::InputError(msg)) if msg.contains("No patients found") => {
                        io_handler.write_line(&msg)?;
                    }
                    Err(e) => report_error(&mut io_handler, "Error deleting patient", e)?,
                },
                "6" => {
                    if let Err(e) =
                        handle_list_appointments_action(&http_client, &mut io_handler).await
                    {
                        report_error(&mut io_handler, "Error listing appointments", e)?;
                    }
                }
                "7" => {
                    match handle_schedule_appointment_action(&http_client, &mut io_handler).await {
                        Ok(appointment) => {
                            tracing::info!(appointment_id = %appointment.id, "Appointment scheduled");
                            io_handler.write_line(&format!(
                                "Scheduled appointment on {} at {} (ID: {}).",
                                appointment.date, appointment.time, appointment.id
                            ))?;
                        }
                        Err(CliError::InputError(msg)) if msg.contains("No patients found") => {
                            io_handler.write_line(&msg)?;
                        }
                        Err(e) => {
                            report_error(&mut io_handler, "Error scheduling appointment", e)?
                        }
                    }
                }
                "8" => {
                    match handle_update_appointment_action(&http_client, &mut io_handler).await {
                        Ok(appointment) => {
                            io_handler.write_line(&format!(
                                "Updated appointment (status: {}).",
                                appointment.status
                            ))?;
                        }
                        Err(CliError::InputError(msg)) if msg.contains("No appointments found") => {
                            io_handler.write_line(&msg)?;
                        }
                        Err(e) => report_error(&mut io_handler, "Error updating appointment", e)?,
                    }
                }
                "9" => {
                    match handle_delete_appointment_action(&http_client, &mut io_handler).await {
                        Ok(()) => {}
                        Err(CliError::InputError(msg)) if msg.contains("No appointments found") => {
                            io_handler.write_line(&msg)?;
                        }
                        Err(e) => report_error(&mut io_handler, "Error deleting appointment", e)?,
                    }
                }
                "10" => {
                    if let Err(e) =
                        handle_medication_management_menu(&http_client, &mut io_handler).await
                    {
                        report_error(&mut io_handler, "Error in medications menu", e)?;
                    }
                }
                "11" => {
                    if let Err(e) = handle_metrics_menu(&http_client, &mut io_handler).await {
                        report_error(&mut io_handler, "Error in metrics menu", e)?;
                    }
                }
                "12" => {
                    if let Err(e) = handle_reports_menu(&http_client, &mut io_handler).await {
                        report_error(&mut io_handler, "Error in reports menu", e)?;
                    }
                }
                "13" => {
                    if let Err(e) = handle_profile_action(&http_client, &mut io_handler).await {
                        report_error(&mut io_handler, "Error fetching profile", e)?;
                    }
                }
                "14" => {
                    session.logout();
                    io_handler.write_line("You have been logged out.")?;
                }
                "q" | "Q" => {
                    io_handler.write_line("Exiting MedThing CLI.")?;
                    return Ok(());
                }
                _ => {
                    io_handler.write_line("Invalid choice, please try again.")?;
                }
            }
        }
    }
}

fn report_error<H: IoHandler>(
    io_handler: &mut H,
    context: &str,
    error: CliError,
) -> Result<(), CliError> {
    tracing::error!(error = ?error, "{}", context);
    io_handler.write_line(&format!("{}: {}", context, error))
}
