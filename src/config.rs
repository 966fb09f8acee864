//! Runtime configuration.
//!
//! Everything is env-driven; the only externally required value is the
//! backend base URL.

use crate::backend::DEFAULT_BASE_URL;

/// Configuration for the client, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the VeritasTrial backend.
    pub backend_url: String,
    /// Write tracing output to `veritas-tui.log` (the TUI owns stdout).
    pub log_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BASE_URL.to_string(),
            log_to_file: false,
        }
    }
}

impl Config {
    /// Read configuration from `VERITAS_BACKEND_URL` and
    /// `VERITAS_TUI_LOG`.
    pub fn from_env() -> Self {
        let backend_url = std::env::var("VERITAS_BACKEND_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let log_to_file = std::env::var("VERITAS_TUI_LOG").is_ok();
        Self {
            backend_url,
            log_to_file,
        }
    }

    /// Override the backend URL.
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    /// Enable or disable file logging.
    pub fn with_log_to_file(mut self, enabled: bool) -> Self {
        self.log_to_file = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let config = Config::default();
        assert_eq!(config.backend_url, DEFAULT_BASE_URL);
        assert!(!config.log_to_file);
    }

    #[test]
    fn builder_overrides() {
        let config = Config::default()
            .with_backend_url("http://backend:9000")
            .with_log_to_file(true);
        assert_eq!(config.backend_url, "http://backend:9000");
        assert!(config.log_to_file);
    }
}
