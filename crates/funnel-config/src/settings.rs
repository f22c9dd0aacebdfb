//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::delays;
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Funnel session management
    #[serde(default)]
    pub sessions: SessionConfig,

    /// Simulated latency configuration
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Directory holding the domain YAML files
    #[serde(default = "default_domain_config_dir")]
    pub domain_config_dir: String,

    /// Path for the JSON-file admin session store; in-memory when unset
    #[serde(default)]
    pub admin_session_path: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS origin checks
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; empty defaults to localhost
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Funnel session management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum concurrent funnel sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle seconds before a funnel session is swept
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

/// Simulated latency configuration (milliseconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulated third-party OTP dispatch duration
    #[serde(default = "default_otp_dispatch_ms")]
    pub otp_dispatch_ms: u64,

    /// Simulated login backend duration
    #[serde(default = "default_login_ms")]
    pub login_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            otp_dispatch_ms: default_otp_dispatch_ms(),
            login_ms: default_login_ms(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_max_sessions() -> usize {
    1000
}

fn default_idle_timeout_secs() -> u64 {
    1800
}

fn default_otp_dispatch_ms() -> u64 {
    delays::OTP_DISPATCH_MS
}

fn default_login_ms() -> u64 {
    delays::LOGIN_MS
}

fn default_domain_config_dir() -> String {
    "config/domain".to_string()
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.max_sessions".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.sessions.idle_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.idle_timeout_secs".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }

        // Delays are pacing only; anything under ten seconds is sane
        if self.simulation.otp_dispatch_ms > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "simulation.otp_dispatch_ms".to_string(),
                message: "simulated delay too long (maximum 10000ms)".to_string(),
            });
        }

        if self.simulation.login_ms > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "simulation.login_ms".to_string(),
                message: "simulated delay too long (maximum 10000ms)".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > `config/{env}.yaml` > `config/default.yaml` >
/// serde defaults. Missing files are skipped silently; a malformed file is
/// an error.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if Path::new("config/default.yaml").exists() {
        builder = builder.add_source(File::with_name("config/default"));
    }

    if let Some(env_name) = env {
        let env_file = format!("config/{}", env_name);
        if Path::new(&format!("{}.yaml", env_file)).exists() {
            builder = builder.add_source(File::with_name(&env_file));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("FUNNEL")
            .separator("__")
            .try_parsing(true),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.simulation.otp_dispatch_ms, 2000);
        assert_eq!(settings.simulation.login_ms, 1200);
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let mut settings = Settings::default();
        settings.sessions.max_sessions = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_excessive_delay() {
        let mut settings = Settings::default();
        settings.simulation.otp_dispatch_ms = 60_000;
        assert!(settings.validate().is_err());
    }
}
