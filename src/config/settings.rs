//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables consulted for the Gemini API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["MEETING_DIGEST_GEMINI_API_KEY", "GEMINI_API_KEY"];

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// LLM settings
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind the HTTP listener on
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the HTTP listener on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body, uploads included
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Answer CORS preflights for any origin (the chat UI is served elsewhere)
    #[serde(default = "default_true")]
    pub cors_allow_any_origin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (gemini)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key (for cloud providers)
    #[serde(default)]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// Upper bound on a single upstream attempt
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a transient failure (0 = single attempt)
    #[serde(default)]
    pub max_retries: u32,

    /// Base delay between attempts, multiplied by the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Return an empty summary instead of failing when the response has no text
    #[serde(default)]
    pub allow_empty_summary: bool,
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_llm_provider() -> String {
    "gemini".to_string()
}

fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_allow_any_origin: true,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
            allow_empty_summary: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            llm: LlmSettings::default(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Parse settings from TOML text without touching the environment.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.llm.api_key.trim().is_empty() {
            if let Some(key) = API_KEY_ENV_VARS
                .iter()
                .filter_map(|&name| lookup(name))
                .find(|key| !key.trim().is_empty())
            {
                self.llm.api_key = key;
            }
        }

        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value {:?}", port),
            }
        }
    }

    /// Check the values the server cannot start without.
    ///
    /// Called once at startup so a missing credential fails the process
    /// instead of the first request.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.trim().is_empty() {
            anyhow::bail!(
                "Gemini API key is missing. Set llm.api_key in config or {} / {}.",
                API_KEY_ENV_VARS[0],
                API_KEY_ENV_VARS[1]
            );
        }
        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be greater than zero");
        }
        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("server.max_upload_bytes must be greater than zero");
        }
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "meeting-digest", "meeting-digest")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Socket address string the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_gemini_25_flash() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gemini-2.5-flash");
        assert_eq!(settings.llm.timeout_secs, 30);
        assert_eq!(settings.llm.max_retries, 0);
        assert_eq!(settings.server.port, 4000);
    }

    #[test]
    fn missing_api_key_fails_validation() {
        let err = Settings::default().validate().unwrap_err().to_string();
        assert!(err.contains("Gemini API key is missing"));
    }

    #[test]
    fn dedicated_env_var_wins_over_generic_one() {
        let mut settings = Settings::default();
        settings.apply_overrides_from(lookup(&[
            ("MEETING_DIGEST_GEMINI_API_KEY", "dedicated"),
            ("GEMINI_API_KEY", "generic"),
        ]));
        assert_eq!(settings.llm.api_key, "dedicated");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn blank_env_key_is_skipped() {
        let mut settings = Settings::default();
        settings.apply_overrides_from(lookup(&[
            ("MEETING_DIGEST_GEMINI_API_KEY", "   "),
            ("GEMINI_API_KEY", "generic"),
        ]));
        assert_eq!(settings.llm.api_key, "generic");
    }

    #[test]
    fn config_key_is_not_overridden_by_env() {
        let mut settings = Settings::default();
        settings.llm.api_key = "from-file".to_string();
        settings.apply_overrides_from(lookup(&[("GEMINI_API_KEY", "from-env")]));
        assert_eq!(settings.llm.api_key, "from-file");
    }

    #[test]
    fn port_env_overrides_config() {
        let mut settings = Settings::default();
        settings.apply_overrides_from(lookup(&[("PORT", "8080")]));
        assert_eq!(settings.server.port, 8080);

        settings.apply_overrides_from(lookup(&[("PORT", "not-a-port")]));
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings = Settings::from_toml(
            r#"
            [llm]
            api_key = "abc"
            max_retries = 2
            "#,
        )
        .unwrap();

        assert_eq!(settings.llm.api_key, "abc");
        assert_eq!(settings.llm.max_retries, 2);
        assert_eq!(settings.llm.provider, "gemini");
        assert_eq!(settings.server.max_upload_bytes, 10 * 1024 * 1024);
    }
}
