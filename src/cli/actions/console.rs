use crate::{
    api::ApiClient,
    config::AppConfig,
    console::Console,
    navigation::{Navigator, Route},
    notify::NotificationStore,
    service::SessionService,
    session::{FileSlot, MemorySlot, SessionContext, SessionSlot},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub route: Option<Route>,
}

/// Wires the shared services together.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn build(config: &AppConfig) -> Result<(SessionService, Navigator)> {
    let navigator = Navigator::default();
    let api = ApiClient::new(config, navigator.clone()).context("failed to create API client")?;

    let slot: Arc<dyn SessionSlot> = match &config.session_file {
        Some(path) => Arc::new(FileSlot::new(path.clone())),
        None => Arc::new(MemorySlot::default()),
    };

    let service = SessionService::new(
        api,
        NotificationStore::new(config.toast_duration_ms),
        SessionContext::new(slot),
    );

    Ok((service, navigator))
}

/// Run the interactive console until the user quits.
///
/// # Errors
/// Returns an error if the client cannot be built or the terminal fails.
pub async fn execute(args: Args) -> Result<()> {
    info!(api = %args.config.api_base_url, "starting console");

    let (service, navigator) = build(&args.config)?;

    Console::new(service, navigator)
        .run(args.route)
        .await
        .context("console I/O failed")
}
