//! Client configuration
//!
//! Config is loaded with a layered resolution:
//! 1. Embedded defaults (compiled into binary from `config/client.toml`)
//! 2. Override file in the data dir (`~/.local/share/mymoney/config/client.toml`)
//! 3. Environment variables (`MYMONEY_API_URL`, `MYMONEY_USER_ID`, `MYMONEY_DATA_DIR`)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/client.toml");

/// How to treat a categorization response that arrives after a newer request
/// was already issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Discard responses older than the most recently issued request
    #[default]
    LastRequestWins,
    /// Apply every response as it arrives
    LastResponseWins,
}

impl std::str::FromStr for StalePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "last_request_wins" => Ok(Self::LastRequestWins),
            "last_response_wins" => Ok(Self::LastResponseWins),
            other => Err(format!("Unknown stale policy: {}", other)),
        }
    }
}

/// Settings for the AI category suggestion workflow
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    pub debounce: Duration,
    pub min_description_chars: usize,
    pub autofill_threshold: f64,
    pub badge_fade: Duration,
    pub stale_policy: StalePolicy,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_description_chars: 3,
            autofill_threshold: 0.5,
            badge_fade: Duration::from_secs(5),
            stale_policy: StalePolicy::LastRequestWins,
        }
    }
}

/// Full client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (no trailing slash)
    pub api_base_url: String,
    /// Static user identifier sent with AI requests
    pub user_id: String,
    /// Directory holding the local mirror files
    pub data_dir: PathBuf,
    pub suggestions: SuggestionConfig,
    /// How long a toast stays visible
    pub toast_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            user_id: "demo_user".to_string(),
            data_dir: default_data_dir(),
            suggestions: SuggestionConfig::default(),
            toast_ttl: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Load config from the default locations and the environment
    pub fn load() -> Result<Self> {
        let data_dir = std::env::var("MYMONEY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        Self::load_in(data_dir)
    }

    /// Load config for an explicit data directory (env overrides still apply)
    pub fn load_in(data_dir: PathBuf) -> Result<Self> {
        let mut config = Self::load_from(&data_dir.join("config").join("client.toml"))?;
        config.data_dir = data_dir;
        config.apply_env();
        Ok(config)
    }

    /// Load config using a specific override file (falls back to embedded defaults)
    pub fn load_from(override_path: &Path) -> Result<Self> {
        let content = if override_path.exists() {
            debug!(path = %override_path.display(), "Loading client config override");
            fs::read_to_string(override_path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        } else {
            DEFAULT_CONFIG.to_string()
        };
        parse_config(&content)
    }

    /// Apply environment variable overrides
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("MYMONEY_API_URL") {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(user) = std::env::var("MYMONEY_USER_ID") {
            self.user_id = user;
        }
    }
}

/// Default data directory for the local mirror and config overrides
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mymoney")
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    api: Option<RawApi>,
    suggestions: Option<RawSuggestions>,
    notifications: Option<RawNotifications>,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    base_url: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSuggestions {
    debounce_ms: Option<u64>,
    min_description_chars: Option<usize>,
    autofill_threshold: Option<f64>,
    badge_fade_secs: Option<u64>,
    stale_policy: Option<StalePolicy>,
}

#[derive(Debug, Deserialize)]
struct RawNotifications {
    toast_ttl_secs: Option<u64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<ClientConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut config = ClientConfig::default();

    if let Some(api) = raw.api {
        if let Some(url) = api.base_url {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(user) = api.user_id {
            config.user_id = user;
        }
    }

    if let Some(s) = raw.suggestions {
        if let Some(ms) = s.debounce_ms {
            config.suggestions.debounce = Duration::from_millis(ms);
        }
        if let Some(chars) = s.min_description_chars {
            config.suggestions.min_description_chars = chars;
        }
        if let Some(threshold) = s.autofill_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::Config(format!(
                    "autofill_threshold must be between 0 and 1, got {}",
                    threshold
                )));
            }
            config.suggestions.autofill_threshold = threshold;
        }
        if let Some(secs) = s.badge_fade_secs {
            config.suggestions.badge_fade = Duration::from_secs(secs);
        }
        if let Some(policy) = s.stale_policy {
            config.suggestions.stale_policy = policy;
        }
    }

    if let Some(n) = raw.notifications {
        if let Some(secs) = n.toast_ttl_secs {
            config.toast_ttl = Duration::from_secs(secs);
        }
    }

    Ok(config)
}
