//! Error taxonomy shared by the remote client, the controllers and the pages.
//!
//! Two kinds reach the user: `Validation` (rendered inline next to the
//! offending field) and `Request` (a toast, or the blocking error panel when
//! it happens during the initial load).

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Input rejected by the client-side checks or by the backend.
    #[error("{message}")]
    Validation {
        message: String,
        /// Field name → message, for inline display.
        fields: BTreeMap<String, String>,
    },
    /// Network failure or a non-validation server error.
    #[error("{message}")]
    Request {
        status: Option<u16>,
        message: String,
    },
    /// The controller refused the call because a conflicting request is
    /// still in flight.
    #[error("another request is still in progress")]
    Busy,
}

/// Error envelope produced by the backend's exception handler.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<BTreeMap<String, String>>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Validation failure attached to a single form field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.clone());
        ApiError::Validation { message, fields }
    }

    pub fn request(message: impl Into<String>) -> Self {
        ApiError::Request {
            status: None,
            message: message.into(),
        }
    }

    /// Map a non-2xx HTTP response onto the taxonomy.
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let fallback = format!("API request failed: {} {}", status, status_text)
            .trim_end()
            .to_string();

        let Some(body) = parsed else {
            return ApiError::Request {
                status: Some(status),
                message: fallback,
            };
        };

        let is_validation = status == 400
            && matches!(body.error.as_deref(), Some("VALIDATION_ERROR") | Some("BAD_REQUEST"));
        let message = body.message.filter(|m| !m.is_empty()).unwrap_or(fallback);

        if is_validation {
            ApiError::Validation {
                message,
                fields: body.details.unwrap_or_default(),
            }
        } else {
            ApiError::Request {
                status: Some(status),
                message,
            }
        }
    }

    /// Map a rejected `fetch()` promise or any other JS exception.
    pub fn from_js(value: &JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        ApiError::request(message)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }

    /// Inline message for `field`, if the backend (or the form) flagged it.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        match self {
            ApiError::Validation { fields, .. } => fields.get(field).map(String::as_str),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::request(format!("Failed to parse response: {}", err))
    }
}

impl From<JsValue> for ApiError {
    fn from(value: JsValue) -> Self {
        ApiError::from_js(&value)
    }
}
