use access::RouteTable;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::identity::LocalIdentityProvider;
use crate::schemas::AppState;

/// Application settings, layered from defaults, an optional `posgate.*`
/// file and `POSGATE__*` environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub routes: RouteTable,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://posgate.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Lifetime of an idle session.
    pub session_ttl_secs: u64,
    pub max_sessions: u64,
    pub cookie_name: String,
    /// Deactivated accounts cannot sign in and count as signed out.
    pub enforce_active_flag: bool,
    pub allow_self_registration: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_secs: 8 * 60 * 60,
            max_sessions: 10_000,
            cookie_name: "posgate_session".to_string(),
            enforce_active_flag: true,
            allow_self_registration: true,
        }
    }
}

impl AuthSettings {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub enabled: bool,
}

impl Settings {
    /// Loads settings. Without an explicit path, `posgate.toml`, `posgate.yaml`
    /// or `posgate.json` in the working directory is used when present.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        trace!("Loading settings");
        dotenvy::dotenv().ok();

        let file = match config_path {
            Some(path) => {
                debug!("Reading configuration file {}", path.display());
                File::from(path).required(true)
            }
            None => File::with_name("posgate").required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("POSGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        debug!("Settings loaded: {:?}", settings);
        Ok(settings)
    }
}

/// Connects to the configured database and builds the shared state.
pub async fn initialize_app_state(settings: Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database.url);
    let db = Database::connect(&settings.database.url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", settings.database.url))?;

    Ok(app_state_with_db(db, settings))
}

/// Builds the shared state around an existing connection.
pub fn app_state_with_db(db: DatabaseConnection, settings: Settings) -> AppState {
    let identity = LocalIdentityProvider::new(db.clone(), &settings.auth);
    AppState {
        db,
        identity: Arc::new(identity),
        settings: Arc::new(settings),
    }
}
