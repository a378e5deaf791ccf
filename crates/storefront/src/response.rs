//! Uniform JSON response envelope.
//!
//! Every API endpoint answers with the same shape:
//!
//! ```json
//! { "ok": true,  "data": { ... }, "error": null }
//! { "ok": false, "data": null,    "error": "Game not found." }
//! ```
//!
//! so clients can branch on `ok` without inspecting status codes first.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};

/// Envelope for all API payloads.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub ok: bool,
    pub data: Value,
    pub error: Option<String>,
}

/// Successful response with a `200 OK` status.
pub fn json_ok(data: impl Serialize) -> Response {
    envelope(StatusCode::OK, data)
}

/// Successful response with a `201 Created` status.
pub fn json_created(data: impl Serialize) -> Response {
    envelope(StatusCode::CREATED, data)
}

/// Failed response carrying an error message.
pub fn json_error(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(Envelope {
            ok: false,
            data: Value::Null,
            error: Some(error.into()),
        }),
    )
        .into_response()
}

fn envelope(status: StatusCode, data: impl Serialize) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => (
            status,
            Json(Envelope {
                ok: true,
                data: value,
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response payload");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Convenience for empty success payloads.
#[must_use]
pub fn json_ok_empty() -> Response {
    json_ok(json!({}))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let env = Envelope {
            ok: true,
            data: json!({"status": "ok"}),
            error: None,
        };
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["data"]["status"], "ok");
        assert_eq!(value["error"], Value::Null);
    }

    #[test]
    fn test_error_envelope_shape() {
        let env = Envelope {
            ok: false,
            data: Value::Null,
            error: Some("Game not found.".to_string()),
        };
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"], "Game not found.");
    }

    #[test]
    fn test_json_ok_status() {
        let response = json_ok(json!({"x": 1}));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_json_error_status() {
        let response = json_error(StatusCode::NOT_FOUND, "Game not found.");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
