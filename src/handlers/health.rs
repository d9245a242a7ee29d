use crate::client::HttpClient;
use crate::error::CliError;
use crate::io::IoHandler;

/// Handler function for the server health check
pub async fn handle_health_check_action<H: IoHandler, C: HttpClient>(
    client: &C,
    io_handler: &mut H,
) -> Result<(), CliError> {
    io_handler.write_line("\nChecking backend health...")?;
    let status = client.health_check().await?;
    io_handler.write_line(&format!("  Status: {}", status.message))?;
    if let Some(version) = status.version {
        io_handler.write_line(&format!("  Version: {}", version))?;
    }
    Ok(())
}
