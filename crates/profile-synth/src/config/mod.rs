use crate::generation::postal::{DEFAULT_POSTAL_BASE_URL, DEFAULT_POSTAL_TIMEOUT};
use crate::generation::DEFAULT_BIRTH_YEAR;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
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
    pub generator: GeneratorConfig,
    pub postal: PostalConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let birth_year = match env::var("PROFILES_BIRTH_YEAR") {
            Ok(raw) => parse_birth_year(&raw)?,
            Err(_) => DEFAULT_BIRTH_YEAR,
        };

        let timeout = match env::var("PROFILES_ZIP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout { value: raw })?,
            Err(_) => DEFAULT_POSTAL_TIMEOUT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            generator: GeneratorConfig {
                names_file: PathBuf::from(var_or("PROFILES_NAMES_FILE", "generated_names.txt")),
                area_codes_file: PathBuf::from(var_or(
                    "PROFILES_AREA_CODES_FILE",
                    "data/areacodes.txt",
                )),
                schools_file: PathBuf::from(var_or(
                    "PROFILES_SCHOOLS_FILE",
                    "data/high_schools.txt",
                )),
                output_dir: PathBuf::from(var_or("PROFILES_OUTPUT_DIR", ".")),
                birth_year,
            },
            postal: PostalConfig {
                base_url: var_or("PROFILES_ZIP_BASE_URL", DEFAULT_POSTAL_BASE_URL),
                timeout,
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_birth_year(raw: &str) -> Result<i32, ConfigError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (1900..=2100).contains(year))
        .ok_or_else(|| ConfigError::InvalidBirthYear {
            value: raw.to_string(),
        })
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
}

/// Reference data, name registry and output locations.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub names_file: PathBuf,
    pub area_codes_file: PathBuf,
    pub schools_file: PathBuf,
    pub output_dir: PathBuf,
    pub birth_year: i32,
}

#[derive(Debug, Clone)]
pub struct PostalConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBirthYear { value: String },
    InvalidTimeout { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBirthYear { value } => write!(
                f,
                "PROFILES_BIRTH_YEAR must be a year between 1900 and 2100 (got '{value}')"
            ),
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "PROFILES_ZIP_TIMEOUT_SECS must be a positive number of seconds (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBirthYear { .. }
            | ConfigError::InvalidTimeout { .. } => None,
        }
    }
}
