use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PREDICTION_URL: &str = "http://localhost:8000";
pub const DEFAULT_STORAGE_DIR: &str = ".student-risk";

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Everything the service and the terminal commands read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub prediction: PredictionConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::parse(&var_or("APP_ENV", "development")),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: var_or("APP_LOG_LEVEL", "info"),
            },
            prediction: PredictionConfig::from_env()?,
            storage: StorageConfig {
                directory: PathBuf::from(var_or("ASSESSMENT_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            },
        })
    }
}

fn var_or(variable: &str, default: &str) -> String {
    env::var(variable).unwrap_or_else(|_| default.to_string())
}

fn read_millis(variable: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let Ok(raw) = env::var(variable) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
        .ok_or(ConfigError::InvalidTimeout { variable })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = var_or("APP_PORT", "3000")
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        Ok(Self {
            host: var_or("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    /// Bind address; `localhost` maps to the IPv4 loopback.
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

/// Tracing controls. `RUST_LOG` takes precedence over `log_level`.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location and time budgets for the remote prediction service.
#[derive(Debug, Clone)]
pub struct PredictionConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub health_timeout: Duration,
}

impl PredictionConfig {
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

    /// Config for `base_url` with the default timeouts.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Self::normalize_base_url(base_url.as_ref())?,
            ..Self::default()
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Self::normalize_base_url(&var_or(
                "PREDICTION_API_URL",
                DEFAULT_PREDICTION_URL,
            ))?,
            request_timeout: read_millis("PREDICTION_TIMEOUT_MS", Self::DEFAULT_REQUEST_TIMEOUT)?,
            health_timeout: read_millis(
                "PREDICTION_HEALTH_TIMEOUT_MS",
                Self::DEFAULT_HEALTH_TIMEOUT,
            )?,
        })
    }

    fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl {
            value: raw.to_string(),
        })?;
        Ok(trimmed.to_string())
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PREDICTION_URL.to_string(),
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            health_timeout: Self::DEFAULT_HEALTH_TIMEOUT,
        }
    }
}

/// Where submitted sessions are written for the results view.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub directory: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBaseUrl { value: String },
    InvalidTimeout { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBaseUrl { value } => {
                write!(f, "PREDICTION_API_URL '{value}' is not a valid URL")
            }
            ConfigError::InvalidTimeout { variable } => {
                write!(f, "{variable} must be a positive number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBaseUrl { .. }
            | ConfigError::InvalidTimeout { .. } => None,
        }
    }
}
