// nbgit: Notebook Git Extension Server
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP surface.
//!
//! ```text
//! PUT <base_url>/git/<route>
//!        |
//!        v
//!   axum Router (TraceLayer, failures left to handle_exceptions)
//!        |
//!        v
//!   dispatch::<O, H>  --spawn_blocking-->  handle_exceptions
//!                                            RepoOpener::open()
//!                                            H::handle(&repo, &request)
//!        |
//!        v
//!   ApiResponse  {"status", "statusText", ...}
//! ```
//!
//! The state holds no repository handle; each request opens its own.

pub mod handlers;
pub mod response;
pub mod wrap;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::http::Method;
use axum::routing::put;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::git::{PathOpener, RepoOpener};
use crate::logging::LogContext;
use handlers::{
    CommitHandler, GitHandler, HandlerRequest, InfoHandler, OriginInfoHandler, PullHandler,
    PushHandler,
};
use response::ApiResponse;
use wrap::{error_response, handle_exceptions};

/// State shared by every route.
pub struct AppState<O> {
    pub opener: Arc<O>,
    /// Remote used for info, fetch and push.
    pub remote: Arc<str>,
}

impl<O> AppState<O> {
    pub fn new(opener: O, remote: &str) -> Self {
        Self {
            opener: Arc::new(opener),
            remote: Arc::from(remote),
        }
    }
}

impl<O> Clone for AppState<O> {
    fn clone(&self) -> Self {
        Self {
            opener: Arc::clone(&self.opener),
            remote: Arc::clone(&self.remote),
        }
    }
}

async fn dispatch<O, H>(
    State(state): State<AppState<O>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> ApiResponse
where
    O: RepoOpener,
    H: GitHandler,
{
    let request = HandlerRequest::new(method.as_str(), uri.to_string(), &*state.remote)
        .with_body(body);
    let log = LogContext::new(H::NAME, request.to_string());
    let opener = Arc::clone(&state.opener);

    tokio::task::spawn_blocking(move || {
        handle_exceptions(&log, || {
            let repo = opener.open()?;
            H::default().handle(&repo, &request)
        })
    })
    .await
    .unwrap_or_else(|e| error_response(&ServiceError::from(e)))
}

/// Build the router with the five `PUT /git/*` routes below `base_url`.
///
/// `base_url` must already be normalized (`/` or `/prefix` without a
/// trailing slash).
pub fn create_router<O: RepoOpener>(state: AppState<O>, base_url: &str) -> Router {
    let git = Router::new()
        .route(CommitHandler::ROUTE, put(dispatch::<O, CommitHandler>))
        .route(PullHandler::ROUTE, put(dispatch::<O, PullHandler>))
        .route(InfoHandler::ROUTE, put(dispatch::<O, InfoHandler>))
        .route(
            OriginInfoHandler::ROUTE,
            put(dispatch::<O, OriginInfoHandler>),
        )
        .route(PushHandler::ROUTE, put(dispatch::<O, PushHandler>));

    let routes = Router::new().nest("/git", git);
    let app = if base_url == "/" {
        routes
    } else {
        Router::new().nest(base_url, routes)
    };

    // 500s are already logged by `error_response`.
    app.layer(TraceLayer::new_for_http().on_failure(()))
        .with_state(state)
}

/// Bind `server.bind` and serve until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address is invalid, cannot be bound, or the
/// server fails while running.
pub async fn serve(config: &Config) -> Result<()> {
    let addr = config.server.bind_addr()?;
    let state = AppState::new(PathOpener::new(config.repo.path.clone()), &config.repo.remote);
    let app = create_router(state, &config.server.base_url);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;

    info!(
        addr = %local,
        base_url = %config.server.base_url,
        repo = %config.repo.path.display(),
        "Git extension enabled."
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => warn!("Received Ctrl+C, shutting down..."),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
