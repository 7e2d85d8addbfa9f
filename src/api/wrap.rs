// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error boundary wrapped around every handler invocation.
//!
//! ```text
//! handle_exceptions(log, body)
//!   debug  "<Handler> is handling: <request>"
//!   body() Ok(response)          --> response
//!          Err(ServiceError::Git) --> 500 "Git error: <message>"
//!          Err(_)                 --> 500 "An unexpected error occurred."
//! ```

use tracing::{debug, error};

use super::response::ApiResponse;
use crate::error::{ServiceError, ServiceResult};
use crate::logging::LogContext;

/// Message sent for any failure not originating in git. Details stay in the log.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Run `body` inside the handler's span and map any failure to a 500 response.
pub fn handle_exceptions<F>(log: &LogContext, body: F) -> ApiResponse
where
    F: FnOnce() -> ServiceResult<ApiResponse>,
{
    let span = log.span();
    let _entered = span.enter();

    debug!("{} is handling: {}", log.handler(), log.request());
    body().unwrap_or_else(|err| error_response(&err))
}

/// Log `err` once and build the client-facing response for it.
#[must_use]
pub fn error_response(err: &ServiceError) -> ApiResponse {
    if let Some(git) = err.as_git() {
        error!(error = %git, "git operation failed");
        ApiResponse::error(500, format!("Git error: {git}"))
    } else {
        error!(error = %err, "request failed");
        ApiResponse::error(500, UNEXPECTED_ERROR)
    }
}
