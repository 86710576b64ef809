// Entrypoint for the catalog admin tool.
// - Keeps `main` small: load configuration, resolve the admin session,
//   create the catalog client and hand both to the UI loop.
// - Returns `anyhow::Result` so startup failures print with context.

use anyhow::Context;
use catalog_admin::{api::CatalogClient, config::AppConfig, session::AdminSession, ui};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    // An explicit CATALOG_ADMIN_ID wins over the session persisted on disk.
    let session = match config.admin_id {
        Some(id) => AdminSession::new(id),
        None => match AdminSession::load()? {
            Some(session) => session,
            None => ui::identify()?,
        },
    };

    let api = CatalogClient::new(&config).context("Failed to build HTTP client")?;

    ui::main_menu(api, session).await
}
