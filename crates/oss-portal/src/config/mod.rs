use chrono::NaiveDate;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub portal: PortalConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = match env::var("APP_LOG_ANSI") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag { key: "APP_LOG_ANSI" })?,
            Err(_) => environment == AppEnvironment::Development,
        };

        let reference_date = match env::var("APP_REFERENCE_DATE") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|_| ConfigError::InvalidReferenceDate { value: raw })?,
            ),
            _ => None,
        };

        let notification_seed = env::var("APP_NOTIFICATION_SEED")
            .unwrap_or_else(|_| DEFAULT_NOTIFICATION_SEED.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidSeed)?;

        let talent_csv = env::var("APP_TALENT_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            portal: PortalConfig {
                reference_date,
                notification_seed,
                talent_csv,
            },
        })
    }
}

const DEFAULT_NOTIFICATION_SEED: u64 = 2024;

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Colored output; on by default only in development.
    pub ansi: bool,
}

/// Inputs that shape the fixture store and its derived metrics.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Pins "today" for elapsed-day metrics; the wall clock is used when unset.
    pub reference_date: Option<NaiveDate>,
    pub notification_seed: u64,
    pub talent_csv: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            reference_date: None,
            notification_seed: DEFAULT_NOTIFICATION_SEED,
            talent_csv: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidReferenceDate { value: String },
    InvalidSeed,
    InvalidFlag { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidReferenceDate { value } => {
                write!(f, "APP_REFERENCE_DATE '{value}' is not a YYYY-MM-DD date")
            }
            ConfigError::InvalidSeed => write!(f, "APP_NOTIFICATION_SEED must be a valid u64"),
            ConfigError::InvalidFlag { key } => write!(f, "{key} must be true or false"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidReferenceDate { .. }
            | ConfigError::InvalidSeed
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_REFERENCE_DATE",
            "APP_NOTIFICATION_SEED",
            "APP_TALENT_CSV",
            "APP_LOG_ANSI",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.telemetry.ansi);
        assert_eq!(config.portal.reference_date, None);
        assert_eq!(config.portal.notification_seed, 2024);
        assert!(config.portal.talent_csv.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn parses_reference_date_and_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("APP_REFERENCE_DATE", "2024-06-30");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert!(!config.telemetry.ansi);
        assert_eq!(
            config.portal.reference_date,
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
        reset_env();
    }

    #[test]
    fn rejects_malformed_reference_date() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_REFERENCE_DATE", "30/06/2024");
        match AppConfig::load() {
            Err(ConfigError::InvalidReferenceDate { value }) => assert_eq!(value, "30/06/2024"),
            other => panic!("expected invalid reference date, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_seed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_NOTIFICATION_SEED", "lucky");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidSeed)));
        reset_env();
    }

    #[test]
    fn log_ansi_flag_overrides_environment_default() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_LOG_ANSI", "off");
        let config = AppConfig::load().expect("config loads");
        assert!(!config.telemetry.ansi);

        env::set_var("APP_LOG_ANSI", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag { key: "APP_LOG_ANSI" })
        ));
        reset_env();
    }
}
