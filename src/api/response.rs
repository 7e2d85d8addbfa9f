// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Uniform response envelope.
//!
//! ```text
//! {"status": 200, "statusText": "...", <extra fields...>}
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ServiceError, ServiceResult};

/// Keys owned by the envelope; extra fields must not reuse them.
const ENVELOPE_KEYS: [&str; 2] = ["status", "statusText"];

/// Response body shared by every endpoint, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ApiResponse {
    /// A 200 response with no extra fields.
    pub fn ok(status_text: impl Into<String>) -> Self {
        write_response(200, status_text, std::iter::empty::<(String, Value)>())
    }

    /// An error response carrying `status_text` as the message.
    pub fn error(status: u16, status_text: impl Into<String>) -> Self {
        write_response(status, status_text, std::iter::empty::<(String, Value)>())
    }

    /// Attach a named field.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Other` if `value` cannot be represented as JSON.
    pub fn with_field(mut self, name: &str, value: &impl Serialize) -> ServiceResult<Self> {
        debug_assert!(
            !ENVELOPE_KEYS.contains(&name),
            "field {name:?} collides with the response envelope"
        );
        let value = serde_json::to_value(value)
            .map_err(|e| ServiceError::Other(format!("cannot encode {name}: {e}").into()))?;
        self.fields.insert(name.to_string(), value);
        Ok(self)
    }
}

/// Merge `status`, `statusText` and `fields` into one flat response object.
pub fn write_response<I, K>(status: u16, status_text: impl Into<String>, fields: I) -> ApiResponse
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let fields: Map<String, Value> = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
    debug_assert!(
        ENVELOPE_KEYS.iter().all(|key| !fields.contains_key(*key)),
        "extra fields collide with the response envelope"
    );
    ApiResponse {
        status,
        status_text: status_text.into(),
        fields,
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
