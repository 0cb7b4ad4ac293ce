use serde::{Deserialize, Serialize};

/// Base URL used when no configuration file or override is present.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8003";

/// Environment variable that overrides `api_base_url` at startup.
pub const API_BASE_URL_ENV: &str = "EDUASSIST_API_BASE_URL";

/// Client configuration injected at startup.
///
/// The backend base URL is the only recognised option; every REST and
/// WebSocket endpoint is derived from it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
        }
    }

    /// Applies an override value (usually read from [`API_BASE_URL_ENV`]).
    ///
    /// Blank overrides are ignored.
    pub fn with_override(mut self, api_base_url: Option<String>) -> Self {
        if let Some(url) = api_base_url.filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Joins an absolute API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// The WebSocket URL for a path, mapping `http`→`ws` and `https`→`wss`.
    pub fn ws_endpoint(&self, path: &str) -> String {
        let base = self.base_url();
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };
        format!("{}/{}", ws_base, path.trim_start_matches('/'))
    }
}
