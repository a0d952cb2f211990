use anyhow::Result;
use tracing::{debug, error, info, trace};

use super::initdb::apply_migrations;
use super::serve::run_server;
use crate::config::{AppConfig, initialize_app_state};

pub async fn migrate_and_serve(config: &AppConfig) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");
    debug!("Configuration: {:?}", config);

    // Secrets are checked before anything touches the schema
    let state = initialize_app_state(config).await.inspect_err(|e| {
        error!("Failed to initialize application state: {:#}", e);
    })?;

    apply_migrations(&state.db).await.inspect_err(|e| {
        error!("{:#}", e);
    })?;

    run_server(state, &config.bind_address()).await
}
