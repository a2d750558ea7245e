//! SQLGate server: HTTP gatekeeper for generated SQL
//!
//! Reflects the schema once at startup (failing fast if the store is
//! unreachable), then serves the validation pipeline over
//! `POST /validate`.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use sqlgate_core::{Catalog, Validator};

mod config;
mod logging;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = config::Config::load_or_default("config.yaml")
        .context("failed to load configuration")?;

    logging::init(&config.logging);

    let validator = build_validator(&config).context("failed to construct validator")?;
    info!(tables = validator.catalog().len(), "schema catalog loaded");

    let state = routes::AppState {
        validator: Arc::new(validator),
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("SQLGate server listening on {addr}");

    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}

/// Build the validator from the preferred source: a live database when
/// configured, otherwise a static schema definition.
fn build_validator(config: &config::Config) -> anyhow::Result<Validator> {
    let timeout = Duration::from_millis(config.database.syntax_timeout_ms);

    if let Some(db_path) = &config.database.path {
        let validator = Validator::connect(db_path)
            .with_context(|| format!("failed to reflect schema from {db_path}"))?
            .with_syntax_timeout(timeout);
        info!(path = %db_path, "validating against live database");
        return Ok(validator);
    }

    if let Some(definition_path) = &config.database.schema_definition {
        let catalog = Catalog::from_json_file(definition_path)
            .with_context(|| format!("failed to load schema definition {definition_path}"))?;
        info!(path = %definition_path, "validating against static schema definition");
        return Ok(Validator::from_catalog(catalog));
    }

    anyhow::bail!("no schema source configured: set database.path or database.schema_definition")
}
