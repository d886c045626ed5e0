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
    pub media: MediaConfig,
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

        let cdn_base = env::var("APP_MEDIA_CDN_BASE")
            .unwrap_or_else(|_| MediaConfig::DEFAULT_CDN_BASE.to_string());
        let insight_delay_ms = env::var("APP_INSIGHT_DELAY_MS")
            .unwrap_or_else(|_| MediaConfig::DEFAULT_INSIGHT_DELAY_MS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidInsightDelay)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            media: MediaConfig {
                cdn_base,
                insight_delay_ms,
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

/// Photo CDN and insight-provider pacing controls.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub cdn_base: String,
    pub insight_delay_ms: u64,
}

impl MediaConfig {
    pub const DEFAULT_CDN_BASE: &'static str = "https://cdn.listingphotos.example.com";
    pub const DEFAULT_INSIGHT_DELAY_MS: u64 = 750;

    pub fn insight_delay(&self) -> Duration {
        Duration::from_millis(self.insight_delay_ms)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cdn_base: Self::DEFAULT_CDN_BASE.to_string(),
            insight_delay_ms: Self::DEFAULT_INSIGHT_DELAY_MS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidInsightDelay,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidInsightDelay => {
                write!(f, "APP_INSIGHT_DELAY_MS must be a valid u64 millisecond count")
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
            ConfigError::InvalidPort | ConfigError::InvalidInsightDelay => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
