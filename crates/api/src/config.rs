//! Layered server configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Compiled defaults ([`AppConfig::default`])
//! 2. JSON config file at `BACKEND_CONFIG_PATH` (default `./config.json`);
//!    skipped when missing or blank
//! 3. `EQITEMS_`-prefixed environment variables, nested with `__`
//!    (e.g. `EQITEMS_API__MAX_PAGE_SIZE=500`)
//! 4. Deployment variables: `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`,
//!    `DB_NAME`, `SERVER_HOST`, `SERVER_PORT`, `CORS_ORIGINS`
//!
//! The result is validated once and then shared read-only through
//! [`AppState`](crate::state::AppState).

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::{HeaderValue, Uri};
use eqitems_core::pagination::PageLimits;
use eqitems_db::PoolSettings;
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_VAR: &str = "BACKEND_CONFIG_PATH";

/// Config file used when [`CONFIG_PATH_VAR`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Deployment variables holding plain string settings.
const STRING_OVERRIDES: [(&str, &str); 5] = [
    ("DB_HOST", "database.host"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.database"),
    ("SERVER_HOST", "server.host"),
];

/// Deployment variables holding ports; unparseable values are ignored.
const PORT_OVERRIDES: [(&str, &str); 2] = [
    ("DB_PORT", "database.port"),
    ("SERVER_PORT", "server.port"),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] figment::Error),

    #[error("Configuration failed validation: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid CORS origin '{origin}': {reason}")]
    InvalidCorsOrigin { origin: String, reason: String },
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerSettings,
    #[validate(nested)]
    pub database: DatabaseSettings,
    #[validate(nested)]
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerSettings {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins. Empty means no cross-origin access.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

impl ServerSettings {
    /// Configured origins as header values, failing on the first bad one.
    pub fn cors_origin_headers(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.cors_origins
            .iter()
            .map(|origin| parse_cors_origin(origin))
            .collect()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Maximum concurrently open connections.
    #[validate(range(min = 1))]
    pub connection_limit: u32,
    /// Seconds a request may wait for a free connection.
    #[validate(range(min = 1))]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: String::new(),
            connection_limit: 10,
            acquire_timeout_secs: 30,
        }
    }
}

// Keeps the password out of startup logs.
impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("connection_limit", &self.connection_limit)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiSettings {
    /// Page size used when the request does not supply one.
    #[validate(range(min = 1))]
    pub page_size: i64,
    /// Hard cap on requested page sizes.
    #[validate(range(min = 1))]
    pub max_page_size: i64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_page_size: 200,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load configuration from the process environment and config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration, resolving the config path and deployment
    /// variables through `env`.
    pub fn load_with<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = env(CONFIG_PATH_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(contents) = read_config_file(&path)? {
            tracing::info!(path = %path.display(), "Loading configuration file");
            figment = figment.merge(Json::string(&contents));
        }

        figment = figment.merge(Env::prefixed("EQITEMS_").split("__"));
        figment = merge_deployment_env(figment, &env);

        let config: AppConfig = figment.extract()?;
        config.validate()?;
        config.server.cors_origin_headers()?;
        Ok(config)
    }

    /// Page-size bounds for listing requests.
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.api.page_size.min(self.api.max_page_size),
            max_page_size: self.api.max_page_size,
        }
    }

    /// Connection pool settings for `eqitems_db::create_pool`.
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            host: self.database.host.clone(),
            port: self.database.port,
            user: self.database.user.clone(),
            password: self.database.password.clone(),
            database: self.database.database.clone(),
            max_connections: self.database.connection_limit,
            acquire_timeout: Duration::from_secs(self.database.acquire_timeout_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

/// Parse one CORS origin. It must be an `http` or `https` scheme plus host,
/// with no path or query, as browsers send it in the `Origin` header.
pub fn parse_cors_origin(origin: &str) -> Result<HeaderValue, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidCorsOrigin {
        origin: origin.to_string(),
        reason,
    };

    let uri: Uri = origin.parse().map_err(|e| invalid(format!("{e}")))?;

    if !matches!(uri.scheme_str(), Some("http" | "https")) {
        return Err(invalid("expected an http or https scheme".to_string()));
    }
    if uri.host().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if !matches!(uri.path(), "" | "/") || uri.query().is_some() {
        return Err(invalid("an origin has no path or query".to_string()));
    }

    HeaderValue::from_str(origin).map_err(|e| invalid(format!("{e}")))
}

/// Read the config file, treating a missing or whitespace-only file as absent.
fn read_config_file(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(contents))
    }
}

/// Apply the deployment variables. Empty values never override.
fn merge_deployment_env<F>(mut figment: Figment, env: &F) -> Figment
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |var: &str| env(var).filter(|value| !value.is_empty());

    for (var, key) in STRING_OVERRIDES {
        if let Some(value) = non_empty(var) {
            figment = figment.merge(Serialized::default(key, value));
        }
    }

    for (var, key) in PORT_OVERRIDES {
        if let Some(port) = non_empty(var).and_then(|v| v.trim().parse::<u16>().ok()) {
            figment = figment.merge(Serialized::default(key, port));
        }
    }

    if let Some(origins) = non_empty("CORS_ORIGINS") {
        let origins: Vec<String> = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        figment = figment.merge(Serialized::default("server.cors_origins", origins));
    }

    figment
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
