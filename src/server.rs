// ABOUTME: Server resource wiring and the HTTP serve loop
// ABOUTME: Assembles shared resources, the router, and binds the listener
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server resource container and serve loop

use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::routes;
use crate::scheduling::BookingCoordinator;

/// Shared resources handed to every route handler
pub struct ServerResources {
    pub database: Database,
    pub auth_manager: AuthManager,
    pub coordinator: BookingCoordinator,
    pub config: ServerConfig,
}

impl ServerResources {
    /// Create new server resources
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: ServerConfig) -> Self {
        let coordinator = BookingCoordinator::new(database.clone());
        Self {
            database,
            auth_manager,
            coordinator,
            config,
        }
    }
}

/// Bind the configured port and serve until shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server loop fails
pub async fn run_server(resources: Arc<ServerResources>) -> Result<()> {
    let port = resources.config.http_port;
    let router = routes::router(resources).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;

    info!(port, "agendly server listening");

    axum::serve(listener, router)
        .await
        .context("server loop failed")
}
