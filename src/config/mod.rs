use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
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
    pub predictor: PredictorConfig,
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

        let base_url = env::var("PREDICTOR_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyPredictorUrl);
        }

        let timeout_secs = env::var("PREDICTOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            predictor: PredictorConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location and patience for the upstream prediction service.
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidTimeout,
    EmptyPredictorUrl,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidTimeout => {
                write!(f, "PREDICTOR_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::EmptyPredictorUrl => {
                write!(f, "PREDICTOR_BASE_URL must not be empty")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::EmptyPredictorUrl => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
