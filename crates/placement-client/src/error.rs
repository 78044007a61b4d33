//! Classification of HTTP failures into [`ApiError`].

use placement_core::validation::FieldError;
use placement_core::ApiError;
use serde_json::Value;

/// Map a transport-level reqwest error.
pub(crate) fn transport_error(e: reqwest::Error, timeout_secs: u64) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout(timeout_secs)
    } else {
        ApiError::Network(e.to_string())
    }
}

/// Pass successful responses through; turn error statuses into `ApiError`.
///
/// `what` names the requested entity for 404 messages (e.g. "test 4").
pub(crate) async fn check_status(
    response: reqwest::Response,
    what: &str,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5)
            * 1000;
        return Err(ApiError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<Value>(&body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("detail"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.clone());

    Err(match status {
        400 => ApiError::Validation(
            parsed
                .as_ref()
                .map(field_errors_from_body)
                .filter(|errors| !errors.is_empty())
                .unwrap_or_else(|| vec![FieldError::new("request", &message)]),
        ),
        401 => ApiError::Unauthorized(message),
        403 => ApiError::Forbidden(message),
        404 => ApiError::NotFound(what.to_string()),
        _ => ApiError::Api { status, message },
    })
}

/// Decode a `{ "field": ["message", ...] }` error body.
pub fn field_errors_from_body(body: &Value) -> Vec<FieldError> {
    let Some(object) = body.as_object() else {
        return Vec::new();
    };

    let mut errors = Vec::new();
    for (field, value) in object {
        match value {
            Value::String(message) => errors.push(FieldError::new(field, message)),
            Value::Array(items) => {
                for item in items {
                    let message = match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    errors.push(FieldError::new(field, &message));
                }
            }
            Value::Object(_) => {
                for nested in field_errors_from_body(value) {
                    errors.push(FieldError::new(
                        &format!("{field}.{}", nested.field),
                        &nested.message,
                    ));
                }
            }
            other => errors.push(FieldError::new(field, &other.to_string())),
        }
    }
    errors
}
