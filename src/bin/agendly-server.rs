// ABOUTME: Server binary wiring configuration, storage and HTTP serving
// ABOUTME: Loads environment configuration, runs migrations and starts the agendly API
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Agendly Server Binary
//!
//! Starts the scheduling and commerce API with user authentication and
//! SQLite-backed storage.

use agendly::{
    auth::AuthManager, config::ServerConfig, database::Database, logging::LoggingConfig,
    server::{run_server, ServerResources},
};
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "agendly-server")]
#[command(about = "Agendly - multi-tenant scheduling and sales API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = agendly::config::DatabaseUrl::parse_url(&database_url)?;
    }

    LoggingConfig::from_env().init()?;

    info!(
        environment = %config.environment,
        database_url = %config.database_url.to_connection_string(),
        "starting agendly server"
    );

    let database = Database::new(&config.database_url.to_connection_string()).await?;
    database.migrate().await?;
    info!("database ready");

    let auth_manager = AuthManager::new(&config.jwt_secret, config.token_expiry_hours);

    let resources = Arc::new(ServerResources::new(database, auth_manager, config));

    run_server(resources).await
}
