use serde::Deserialize;

/// Which lead store backend to run against.
///
/// Selection is explicit configuration, never a fallback triggered by a
/// failed database connection: if `postgres` is configured and the pool
/// cannot be opened, startup fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `postgres`, ignored otherwise.
    pub database_url: Option<String>,
    /// Scoring service endpoint. Default: `http://127.0.0.1:8000/qualify-lead`.
    pub qualifier_url: String,
    /// Bounded wait for a single qualification attempt, in seconds.
    pub qualifier_timeout_secs: u64,
    /// Follow-up automation webhook. Defaults to the Make.com hook the
    /// product shipped with.
    pub webhook_url: String,
    /// Address stamped into the webhook envelope's `followup.assignedTo`.
    pub followup_assignee: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let store_backend = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => anyhow::bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        if store_backend == StoreBackend::Postgres {
            match &database_url {
                None => anyhow::bail!(
                    "DATABASE_URL environment variable required when STORE_BACKEND=postgres"
                ),
                Some(url) if !url.starts_with("postgresql://") && !url.starts_with("postgres://") => {
                    anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://")
                }
                Some(_) => {}
            }
        }

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            store_backend,
            database_url,
            qualifier_url: std::env::var("QUALIFIER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000/qualify-lead".to_string())
                .trim()
                .to_string(),
            qualifier_timeout_secs: std::env::var("QUALIFIER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("QUALIFIER_TIMEOUT_SECS must be a valid number"))?,
            webhook_url: std::env::var("WEBHOOK_URL")
                .unwrap_or_else(|_| {
                    "https://hook.eu2.make.com/z2t98fek6llh43lihtjknw27iga7sirc".to_string()
                })
                .trim()
                .to_string(),
            followup_assignee: std::env::var("FOLLOWUP_ASSIGNEE")
                .unwrap_or_else(|_| "sales@example.com".to_string()),
        };

        if !config.qualifier_url.starts_with("http://")
            && !config.qualifier_url.starts_with("https://")
        {
            anyhow::bail!("QUALIFIER_URL must start with http:// or https://");
        }
        if !config.webhook_url.starts_with("http://") && !config.webhook_url.starts_with("https://")
        {
            anyhow::bail!("WEBHOOK_URL must start with http:// or https://");
        }
        if config.qualifier_timeout_secs == 0 {
            anyhow::bail!("QUALIFIER_TIMEOUT_SECS must be greater than zero");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Store backend: {:?}", config.store_backend);
        tracing::debug!("Qualifier URL: {}", config.qualifier_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
