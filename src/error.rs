use reqwest::StatusCode;

/// Error type shared by the client, session store, and handlers.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API returned an error: status={status}, message={message}")]
    Api { status: StatusCode, message: String },
    #[error("Authentication failed: {0}")]
    AuthFailed(String),
    #[error("Invalid input: {0}")]
    InputError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal client error: {0}")]
    Internal(String),
}
