// ABOUTME: Server binary for the Fitness Hub REST API
// ABOUTME: Loads configuration, opens the database, and serves the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! # Fitness Hub Server Binary
//!
//! Starts the REST API with JWT authentication, SQLite storage, and the
//! configured AI workout suggestion provider.

use anyhow::Result;
use clap::Parser;
use fithub_server::{
    auth::AuthManager,
    config::environment::ServerConfig,
    context::ServerResources,
    database::Database,
    llm::OpenAiCompatibleSuggester,
    logging,
    notifications::{LogMailer, Notifier},
    routes,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Parser)]
#[command(name = "fithub-server")]
#[command(about = "Fitness Hub API - trainer-client marketplace backend")]
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
        config.database.url = database_url;
    }

    logging::init_from_env()?;
    info!("Starting Fitness Hub API on port {}", config.http_port);

    let database = Database::new(&config.database.url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database: {e}"))?;
    info!("Database ready at {}", config.database.url);

    let auth = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_hours,
    );
    let notifier = Notifier::spawn(Box::new(LogMailer));
    let suggester = OpenAiCompatibleSuggester::new(&config.suggestions)
        .map_err(|e| anyhow::anyhow!("Failed to build suggestion provider: {e}"))?;

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        auth,
        config,
        notifier,
        Arc::new(suggester),
    ));

    let app = routes::router(resources)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(format!("0.0.0.0:{http_port}")).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
