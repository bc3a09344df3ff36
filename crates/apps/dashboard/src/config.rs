use std::env;
use std::path::{Path, PathBuf};

use state::{ConfigError, DashboardConfig};
use tracing::{info, warn};

pub const DEFAULT_REPORT_URL: &str = "http://127.0.0.1:8000";

/// Where lookups are answered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Http(String),
    Files(PathBuf),
}

/// Everything the host needs to start a session.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub dashboard: DashboardConfig,
    pub backend: Backend,
    /// Tile access token for the render side. Passed through untouched.
    pub access_token: Option<String>,
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub report_url: Option<String>,
    pub fixtures_dir: Option<PathBuf>,
    pub debounce_ms: Option<u64>,
}

pub async fn load_file(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
    info!("loaded config from {}", path.display());
    DashboardConfig::from_json_str(&raw)
}

/// File config, then environment, then flags.
pub fn resolve(
    mut dashboard: DashboardConfig,
    env_lookup: impl Fn(&str) -> Option<String>,
    flags: Overrides,
) -> Result<HostConfig, ConfigError> {
    dashboard.debounce_ms = flags.debounce_ms.unwrap_or_else(|| {
        env_u64(&env_lookup, "DASHBOARD_DEBOUNCE_MS", dashboard.debounce_ms)
    });
    dashboard.validate()?;

    let backend = match flags.fixtures_dir {
        Some(dir) => Backend::Files(dir),
        None => Backend::Http(
            flags
                .report_url
                .or_else(|| env_lookup("REPORT_API_URL"))
                .unwrap_or_else(|| DEFAULT_REPORT_URL.to_string()),
        ),
    };

    let access_token = env_lookup("MAPBOX_ACCESS_TOKEN").filter(|t| !t.is_empty());
    if access_token.is_none() {
        warn!("MAPBOX_ACCESS_TOKEN not set; base map tiles will not load");
    }

    Ok(HostConfig {
        dashboard,
        backend,
        access_token,
    })
}

/// Process environment as a lookup function for [`resolve`].
pub fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(env_lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    match env_lookup(key) {
        Some(v) => v.parse().unwrap_or_else(|_| {
            warn!("ignoring {key}={v:?}: not an integer");
            default
        }),
        None => default,
    }
}
