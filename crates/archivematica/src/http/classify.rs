//! Response classification.
//!
//! Every JSON endpoint goes through [`decode_json_response`]; the download
//! goes through [`assert_response_code`] alone so its body can be streamed.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::trace;

use crate::error::Error;

/// Check a response against the status code the endpoint returns on success.
///
/// Checks run in this order:
///
/// 1. 403 is an [`Error::Authorization`], whatever was expected.
/// 2. 404 is an [`Error::NotFound`] unless 404 was expected.
/// 3. Any other unexpected status is an [`Error::Request`]. When the body is
///    JSON with an `error_message` key, that message replaces the reason
///    phrase.
/// 4. The expected status returns the response untouched.
pub async fn assert_response_code(
    response: Response,
    expected: StatusCode,
    context: &str,
) -> Result<Response, Error> {
    let status = response.status();
    trace!(status = %status, expected = %expected, "classifying response");

    if let Some(err) = classify_status(status, expected, context) {
        return Err(err);
    }
    if status == expected {
        return Ok(response);
    }

    let mut detail = reason_phrase(status).to_string();
    if is_json(&response)
        && let Ok(body) = response.text().await
        && let Some(message) = server_error_message(&body)
    {
        detail = message;
    }

    Err(Error::request(
        Some(status.as_u16()),
        format!("{}: {}", context, detail),
    ))
}

/// Check the status code and decode the body as JSON.
///
/// Objects and arrays are returned as-is. Any other JSON value, including an
/// empty body, is wrapped in a one-element array.
pub async fn decode_json_response(
    response: Response,
    expected: StatusCode,
    context: &str,
) -> Result<Value, Error> {
    let response = assert_response_code(response, expected, context).await?;
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;

    decode_body(&bytes).map_err(|e| {
        Error::request(
            Some(status),
            format!("{}: response body is not valid JSON ({})", context, e),
        )
    })
}

/// The status-only part of classification: authorization and not-found
/// failures, which never need the body.
pub(crate) fn classify_status(
    status: StatusCode,
    expected: StatusCode,
    context: &str,
) -> Option<Error> {
    let reason = reason_phrase(status);

    if status == StatusCode::FORBIDDEN {
        return Some(Error::Authorization {
            status: status.as_u16(),
            message: format!(
                "Invalid credentials or insufficient permissions: {}, {}",
                context, reason
            ),
        });
    }

    if status == StatusCode::NOT_FOUND && expected != StatusCode::NOT_FOUND {
        return Some(Error::NotFound {
            status: status.as_u16(),
            message: format!("Item was not located: {}, {}", context, reason),
        });
    }

    None
}

pub(crate) fn decode_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Array(vec![Value::Null]));
    }

    let value: Value = serde_json::from_slice(bytes)?;
    Ok(match value {
        Value::Object(_) | Value::Array(_) => value,
        scalar => Value::Array(vec![scalar]),
    })
}

/// Pull `error_message` out of a JSON error body.
pub(crate) fn server_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error_message")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get_all(CONTENT_TYPE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.to_ascii_lowercase().contains("application/json"))
}

fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}
