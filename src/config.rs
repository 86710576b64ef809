use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "https://localhost:44348";

/// Startup configuration. Built once in `main` and injected into the
/// catalog client, so nothing below it reads the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Accept self-signed certificates, e.g. a local development server.
    pub accept_invalid_certs: bool,
    /// Overrides the persisted admin session when set.
    pub admin_id: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_base_url: DEFAULT_API_URL.to_string(),
            accept_invalid_certs: false,
            admin_id: None,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the `CATALOG_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        tracing::debug!(api_base_url = %config.api_base_url, "Configuration loaded");
        Ok(config)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base_url = lookup("CATALOG_API_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let accept_invalid_certs = match lookup("CATALOG_ACCEPT_INVALID_CERTS") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .with_context(|| format!("Invalid CATALOG_ACCEPT_INVALID_CERTS value '{}'", raw))?,
            None => false,
        };

        let admin_id = lookup("CATALOG_ADMIN_ID")
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .with_context(|| format!("Invalid CATALOG_ADMIN_ID value '{}'", raw))
            })
            .transpose()?;

        Ok(AppConfig {
            api_base_url,
            accept_invalid_certs,
            admin_id,
        })
    }
}
