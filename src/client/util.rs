// Response handling for the MedThing API: one choke point that turns the
// backend's three tolerated body shapes into the normalized envelope, and
// maps failure statuses onto the error taxonomy.

use crate::error::CliError;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{ApiEnvelope, RawBody};

pub(super) const DEFAULT_AUTH_MESSAGE: &str = "Authentication failed. Please login again.";
pub(super) const DEFAULT_ERROR_MESSAGE: &str = "API request failed";

// Helper to join path to base URL
pub(super) fn build_url(base: &Url, path: &str) -> Result<Url, CliError> {
    base.join(path).map_err(CliError::UrlParse)
}

fn default_message(http_ok: bool) -> &'static str {
    if http_ok {
        "Success"
    } else {
        "Error"
    }
}

/// Decides once which of the tolerated shapes a parsed body is. An object
/// only counts as enveloped when it carries both a boolean `success` and a
/// string `message`; everything else falls through to the bare-object arm.
pub(super) fn classify(value: Value) -> RawBody {
    match value {
        Value::Array(items) => RawBody::Array(items),
        Value::Object(map) => {
            let enveloped = map.get("success").is_some_and(Value::is_boolean)
                && map.get("message").is_some_and(Value::is_string);
            if enveloped {
                RawBody::Enveloped(ApiEnvelope {
                    success: map.get("success").and_then(Value::as_bool).unwrap_or_default(),
                    message: map
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    data: map.get("data").filter(|value| !value.is_null()).cloned(),
                })
            } else {
                RawBody::Object(map)
            }
        }
        other => RawBody::Other(other),
    }
}

/// Normalizes a classified body into the envelope every caller sees.
/// Enveloped bodies pass through unchanged; for the other shapes `success`
/// reflects the HTTP status, never the payload contents.
pub(super) fn normalize(http_ok: bool, body: RawBody) -> ApiEnvelope {
    match body {
        RawBody::Enveloped(envelope) => envelope,
        RawBody::Array(items) => ApiEnvelope {
            success: http_ok,
            message: default_message(http_ok).to_string(),
            data: Some(Value::Array(items)),
        },
        RawBody::Object(mut map) => {
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| default_message(http_ok).to_string());
            // `data: null` counts as absent; fall back to the whole body.
            let data = if map.get("data").is_some_and(|value| !value.is_null()) {
                map.remove("data").unwrap_or_default()
            } else {
                Value::Object(map)
            };
            ApiEnvelope {
                success: http_ok,
                message,
                data: Some(data),
            }
        }
        RawBody::Other(value) => ApiEnvelope {
            success: http_ok,
            message: default_message(http_ok).to_string(),
            data: Some(value),
        },
    }
}

/// The placeholder messages synthesized by normalization are not worth
/// surfacing; substitute the caller's fallback for them.
fn resolved_message(envelope: &ApiEnvelope, fallback: &str) -> String {
    if envelope.message.is_empty() || envelope.message == default_message(false) {
        fallback.to_string()
    } else {
        envelope.message.clone()
    }
}

fn failure_for(status: StatusCode, envelope: &ApiEnvelope) -> CliError {
    if status == StatusCode::UNAUTHORIZED {
        CliError::AuthFailed(resolved_message(envelope, DEFAULT_AUTH_MESSAGE))
    } else {
        CliError::Api {
            status,
            message: resolved_message(envelope, DEFAULT_ERROR_MESSAGE),
        }
    }
}

/// Parses and normalizes a body. An empty success body (204 deletes)
/// normalizes to an empty envelope; a non-empty body that is not JSON is
/// the one fatal parse case.
fn envelope_from(status: StatusCode, body: &str) -> Result<ApiEnvelope, CliError> {
    if body.trim().is_empty() {
        return Ok(ApiEnvelope {
            success: status.is_success(),
            message: default_message(status.is_success()).to_string(),
            data: None,
        });
    }
    let value: Value = serde_json::from_str(body).map_err(|err| {
        tracing::error!(target: "medthing_cli::client::util", %status, error = %err, "Response body was not valid JSON");
        CliError::Json(err)
    })?;
    Ok(normalize(status.is_success(), classify(value)))
}

/// Reads a response into the normalized envelope, or the typed failure
/// for its status.
pub(super) async fn read_envelope(response: Response) -> Result<ApiEnvelope, CliError> {
    let status = response.status();
    let body = response.text().await.map_err(CliError::Reqwest)?;
    let envelope = envelope_from(status, &body)?;
    if !status.is_success() {
        tracing::debug!(target: "medthing_cli::client::util", %status, message = %envelope.message, "API request failed with non-success status");
        return Err(failure_for(status, &envelope));
    }
    Ok(envelope)
}

/// Reads a fixed-shape response (the health and AI-analysis endpoints,
/// which do not speak the envelope contract). Failure statuses are still
/// resolved through the envelope path so error messages surface the same
/// way everywhere.
pub(super) async fn read_typed<T: DeserializeOwned>(response: Response) -> Result<T, CliError> {
    let status = response.status();
    let body = response.text().await.map_err(CliError::Reqwest)?;
    if !status.is_success() {
        let envelope = envelope_from(status, &body)?;
        return Err(failure_for(status, &envelope));
    }
    let type_name = std::any::type_name::<T>();
    serde_json::from_str(&body).map_err(|err| {
        tracing::error!(target: "medthing_cli::client::util", %type_name, error = %err, "Failed to deserialize response body");
        CliError::Json(err)
    })
}

/// Deserializes envelope data into a single typed record.
pub(super) fn record<T: DeserializeOwned>(envelope: ApiEnvelope) -> Result<T, CliError> {
    let type_name = std::any::type_name::<T>();
    let data = envelope
        .data
        .ok_or_else(|| CliError::Internal(format!("response carried no data for {type_name}")))?;
    serde_json::from_value(data).map_err(|err| {
        tracing::error!(target: "medthing_cli::client::util", %type_name, error = %err, "Failed to deserialize response data");
        CliError::Json(err)
    })
}

/// Deserializes envelope data into an ordered list of records, coercing
/// missing or non-array data to an empty list instead of failing.
pub(super) fn record_list<T: DeserializeOwned>(envelope: ApiEnvelope) -> Result<Vec<T>, CliError> {
    let type_name = std::any::type_name::<T>();
    match envelope.data {
        Some(data @ Value::Array(_)) => serde_json::from_value(data).map_err(|err| {
            tracing::error!(target: "medthing_cli::client::util", %type_name, error = %err, "Failed to deserialize response data");
            CliError::Json(err)
        }),
        _ => {
            tracing::debug!(target: "medthing_cli::client::util", %type_name, "List response carried no array data, coercing to empty list");
            Ok(Vec::new())
        }
    }
}
