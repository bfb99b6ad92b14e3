/// Dashboard configuration
///
/// Only the backend base URL comes from the environment (`API_URL`); every
/// other knob is a fixed operational default that embedders may override
/// through the builder methods.
use std::path::PathBuf;
use std::time::Duration;

/// Backend used by debug builds when `API_URL` is unset
pub const LOCAL_API_URL: &str = "http://localhost:5000";

/// Backend used by release builds when `API_URL` is unset
pub const DEPLOYED_API_URL: &str = "https://housing-price-backend-production.up.railway.app";

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Prediction backend base URL, without trailing slash
    pub api_url: String,
    /// Interval between `/health` probes
    pub health_interval: Duration,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Directory receiving CSV and PDF exports
    pub export_dir: PathBuf,
    /// File receiving tracing output (stdout belongs to the terminal UI)
    pub log_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url().to_string(),
            health_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            export_dir: PathBuf::from("."),
            log_file: PathBuf::from("price-dashboard.log"),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration with a custom backend URL
    pub fn new(api_url: impl AsRef<str>) -> Self {
        Self {
            api_url: normalize_base_url(api_url.as_ref()),
            ..Default::default()
        }
    }

    /// Resolve configuration from `API_URL`, falling back to the build's default backend
    pub fn from_env() -> Self {
        match std::env::var("API_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Set health probe interval
    pub fn with_health_interval(mut self, interval: Duration) -> Self {
        self.health_interval = interval;
        self
    }

    /// Set request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set export directory
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Set log file
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn default_api_url() -> &'static str {
    if cfg!(debug_assertions) {
        LOCAL_API_URL
    } else {
        DEPLOYED_API_URL
    }
}

/// Trim, drop trailing slashes and assume https when no scheme is given
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
