// src/infra/config.rs - Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::intent::DEFAULT_THRESHOLD;
use crate::infra::errors::UnibotError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub sessions: SessionsConfig,

    #[serde(default)]
    pub intents: IntentsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Only origin allowed by CORS.
    pub cors_origin: String,
    pub max_message_chars: usize,
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            cors_origin: "http://localhost:3000".into(),
            max_message_chars: 1000,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Fixed-window limits, counted per client address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub api_max_requests: u32,
    pub api_window_secs: u64,
    pub chat_max_requests: u32,
    pub chat_window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            api_max_requests: 100,
            api_window_secs: 15 * 60,
            chat_max_requests: 10,
            chat_window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_seconds: u64,
    /// Persona template override (minijinja). Uses the built-in persona when unset.
    pub persona: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            timeout_seconds: 10,
            persona: None,
        }
    }
}

/// Longest accepted session retention: one year.
pub const MAX_RETENTION_MINUTES: u64 = 365 * 24 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    pub retention_minutes: u64,
    pub sweep_interval_seconds: u64,
    /// Per-session history cap. Unbounded when unset.
    pub max_messages: Option<usize>,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            retention_minutes: 60,
            sweep_interval_seconds: 300,
            max_messages: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentsConfig {
    pub threshold: f64,
}

impl Default for IntentsConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Result<Self, UnibotError> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, UnibotError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), UnibotError> {
        if !(0.0..=1.0).contains(&self.intents.threshold) {
            return Err(UnibotError::Config(format!(
                "intents.threshold must be within [0, 1], got {}",
                self.intents.threshold
            )));
        }
        if self.gateway.timeout_seconds == 0 {
            return Err(UnibotError::Config(
                "gateway.timeout_seconds must be positive".into(),
            ));
        }
        if self.sessions.retention_minutes > MAX_RETENTION_MINUTES {
            return Err(UnibotError::Config(format!(
                "sessions.retention_minutes must be at most {MAX_RETENTION_MINUTES}, got {}",
                self.sessions.retention_minutes
            )));
        }
        if self.sessions.sweep_interval_seconds == 0 {
            return Err(UnibotError::Config(
                "sessions.sweep_interval_seconds must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Session retention, clamped to [`MAX_RETENTION_MINUTES`] for configs
    /// that skipped `load_from` validation.
    pub fn retention(&self) -> chrono::Duration {
        let minutes = self.sessions.retention_minutes.min(MAX_RETENTION_MINUTES);
        chrono::Duration::minutes(minutes as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.server.port, 5000);
        assert_eq!(c.server.max_message_chars, 1000);
        assert_eq!(c.gateway.timeout_seconds, 10);
        assert_eq!(c.gateway.api_key_env, "GEMINI_API_KEY");
        assert_eq!(c.sessions.retention_minutes, 60);
        assert!(c.sessions.max_messages.is_none());
        assert!((c.intents.threshold - 0.3).abs() < 1e-9);
        assert_eq!(c.retention(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_rate_limit_defaults() {
        let rl = RateLimitConfig::default();
        assert_eq!(rl.api_max_requests, 100);
        assert_eq!(rl.api_window_secs, 900);
        assert_eq!(rl.chat_max_requests, 10);
        assert_eq!(rl.chat_window_secs, 60);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.gateway.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml_str = r#"
[server]
port = 8080

[server.rate_limit]
chat_max_requests = 3

[gateway]
model = "gemini-2.5-flash"
timeout_seconds = 5
persona = "Bot: {{ user_message }}"

[sessions]
retention_minutes = 30
max_messages = 200

[intents]
threshold = 0.5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.rate_limit.chat_max_requests, 3);
        assert_eq!(config.server.rate_limit.api_max_requests, 100);
        assert_eq!(config.gateway.model, "gemini-2.5-flash");
        assert_eq!(config.gateway.timeout_seconds, 5);
        assert_eq!(config.gateway.persona.as_deref(), Some("Bot: {{ user_message }}"));
        assert_eq!(config.sessions.retention_minutes, 30);
        assert_eq!(config.sessions.max_messages, Some(200));
        assert_eq!(config.sessions.sweep_interval_seconds, 300);
        assert!((config.intents.threshold - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_rejects_out_of_range_threshold() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[intents]\nthreshold = 1.5").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, UnibotError::Config(_)));
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\ntimeout_seconds = 0").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_huge_retention() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sessions]\nretention_minutes = {}", i64::MAX).unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, UnibotError::Config(ref m) if m.contains("retention_minutes")));
    }

    #[test]
    fn test_load_accepts_max_retention() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sessions]\nretention_minutes = {MAX_RETENTION_MINUTES}").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.retention(), chrono::Duration::days(365));
    }

    #[test]
    fn test_retention_clamps_unvalidated_values() {
        let mut config = Config::default();
        config.sessions.retention_minutes = u64::MAX;
        assert_eq!(config.retention(), chrono::Duration::days(365));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(UnibotError::Io(_))));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.gateway.model, config.gateway.model);
    }
}
