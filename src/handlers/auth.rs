use crate::client::{Doctor, HttpClient, SignupPayload};
use crate::error::CliError;
use crate::io::IoHandler;
use crate::session::SessionStore;
use secrecy::ExposeSecret;

/// Handler function for the login action
pub async fn handle_login_action<H: IoHandler, C: HttpClient>(
    session: &SessionStore,
    client: &C,
    io_handler: &mut H,
) -> Result<Doctor, CliError> {
    io_handler.write_line("\nPlease log in.")?;
    let email = io_handler.read_line("Email:")?;
    let password = io_handler.read_secret("Password:")?;
    session.login(client, &email, password).await
}

/// Handler function for the signup action
pub async fn handle_signup_action<H: IoHandler, C: HttpClient>(
    session: &SessionStore,
    client: &C,
    io_handler: &mut H,
) -> Result<Doctor, CliError> {
    io_handler.write_line("\nCreate a doctor account.")?;
    let email = io_handler.read_line("Email:")?;
    let password = io_handler.read_secret("Password:")?;
    let name = io_handler.read_line("Full Name:")?;
    let specialization = io_handler.read_line("Specialization:")?;
    let license_number = io_handler.read_line("License Number:")?;

    if password.expose_secret().len() < 8 {
        return Err(CliError::InputError(
            "Password must be at least 8 characters long.".into(),
        ));
    }

    let details = SignupPayload {
        email,
        password,
        name,
        specialization,
        license_number,
    };
    session.signup(client, details).await
}

/// Handler function for showing the logged-in doctor's profile
pub async fn handle_profile_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    io_handler.write_line("\nFetching your profile...")?;
    let doctor = client.me().await?;
    io_handler.write_line(&format!("  Name: {}", doctor.name))?;
    io_handler.write_line(&format!("  Email: {}", doctor.email))?;
    io_handler.write_line(&format!("  Specialization: {}", doctor.specialization))?;
    io_handler.write_line(&format!("  License Number: {}", doctor.license_number))?;
    Ok(())
}
