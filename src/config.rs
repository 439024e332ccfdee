use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub transport: TransportSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Where notifications and relayed messages are delivered
///
/// The service refuses to start without a `callback_url`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransportSettings {
    pub callback_url: Option<String>,
    pub secret: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl TransportSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(10))
    }

    /// The configured callback URL, or an error when it is missing or blank
    pub fn require_callback_url(&self) -> Result<&str, ConfigError> {
        match self.callback_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ConfigError::NotFound("transport.callback_url".to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_eager_rescan")]
    pub eager_rescan: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            eager_rescan: default_eager_rescan(),
        }
    }
}

fn default_eager_rescan() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PAIRLINE_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PAIRLINE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PAIRLINE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_shortcuts(settings)?;

        settings.try_deserialize()
    }
}

/// Apply the short, unprefixed variables common in container deployments
///
/// `CALLBACK_URL`, `CALLBACK_SECRET`, `LOG_LEVEL` and `LOG_FORMAT` win over
/// anything loaded from files.
fn apply_env_shortcuts(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let shortcuts = [
        ("CALLBACK_URL", "transport.callback_url"),
        ("CALLBACK_SECRET", "transport.secret"),
        ("LOG_LEVEL", "logging.level"),
        ("LOG_FORMAT", "logging.format"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in shortcuts {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.server.port, 8080);
        assert!(settings.matching.eager_rescan);
        assert!(settings.transport.callback_url.is_none());
        assert_eq!(settings.transport.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_callback_url_is_an_error() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(matches!(
            settings.transport.require_callback_url(),
            Err(ConfigError::NotFound(key)) if key == "transport.callback_url"
        ));

        let blank: Settings = toml::from_str("[transport]\ncallback_url = \"  \"").unwrap();
        assert!(blank.transport.require_callback_url().is_err());
    }

    #[test]
    fn test_configured_callback_url_is_returned() {
        let settings: Settings =
            toml::from_str("[transport]\ncallback_url = \"http://frontend:3000/deliver\"").unwrap();
        assert_eq!(
            settings.transport.require_callback_url().unwrap(),
            "http://frontend:3000/deliver"
        );
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let settings: Settings = toml::from_str(include_str!("../config/default.toml")).unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.logging.format, "json");
        assert!(settings.matching.eager_rescan);
    }
}
