//! Triage service configuration.
//!
//! Loaded once at process start from a TOML file, then overridden by
//! environment variables. Lookup order for the file:
//! `$TRIAGED_CONFIG`, `~/.config/triaged/config.toml`,
//! `/etc/triaged/config.toml`. A missing file just means defaults.
//!
//! The API key is deliberately NOT validated here; the LLM client checks it
//! on the first attempted call so the daemon can start (and serve routing
//! and health endpoints) without a credential.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// LLM provider and call settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider selection: "groq" (OpenAI-compatible) is the only one
    /// implemented; "gemini" is recognized but not implemented.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API credential. Usually supplied via LLM_API_KEY instead.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model override; provider default used when absent.
    #[serde(default)]
    pub model: Option<String>,

    /// Endpoint override; provider default used when absent.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Hard timeout per provider call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            model: None,
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address. Localhost only by default.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:7870".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Top-level configuration for the triage daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

impl TriageConfig {
    /// Load from the first config file found, then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// First existing config file in lookup order, if any.
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TRIAGED_CONFIG") {
            return Some(PathBuf::from(path));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_path = config_dir.join("triaged/config.toml");
            if user_path.exists() {
                return Some(user_path);
            }
        }

        let system_path = PathBuf::from("/etc/triaged/config.toml");
        if system_path.exists() {
            return Some(system_path);
        }

        None
    }

    /// Environment variables win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            if !provider.trim().is_empty() {
                self.llm.provider = provider;
            }
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            if !model.trim().is_empty() {
                self.llm.model = Some(model);
            }
        }
        if let Ok(endpoint) = std::env::var("LLM_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.llm.endpoint = Some(endpoint);
            }
        }
        if let Ok(bind) = std::env::var("TRIAGED_BIND") {
            if !bind.trim().is_empty() {
                self.server.bind = bind;
            }
        }
    }
}
