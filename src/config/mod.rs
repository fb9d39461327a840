//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `PETMATCH_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PETMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Base URL of the pet directory service. Default: `http://localhost:8000`.
    pub pet_service_url: String,

    /// Base URL of the SNS media service. Default: `http://localhost:8000`.
    pub sns_service_url: String,

    /// Directory holding the embedding model (safetensors + tokenizer).
    /// Absent means the embedder runs in stub mode.
    pub model_path: Option<PathBuf>,

    /// Timeout for upstream HTTP calls, in seconds. Default: `60`.
    pub http_timeout_secs: u64,

    /// How many petstars a recommendation returns. Default: `2`.
    pub top_petstars: usize,

    /// Allowed CORS origins; `["*"]` means any. Default: `["*"]`.
    pub cors_origins: Vec<String>,

    /// Whether CORS responses allow credentials. Default: `true`.
    pub cors_allow_credentials: bool,
}

/// Default upstream base URL used when the service URLs are not set.
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8000";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            pet_service_url: DEFAULT_UPSTREAM_URL.to_string(),
            sns_service_url: DEFAULT_UPSTREAM_URL.to_string(),
            model_path: None,
            http_timeout_secs: 60,
            top_petstars: 2,
            cors_origins: vec!["*".to_string()],
            cors_allow_credentials: true,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PETMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "PETMATCH_BIND_ADDR";
    const ENV_PET_SERVICE_URL: &'static str = "PETMATCH_PET_SERVICE_URL";
    const ENV_SNS_SERVICE_URL: &'static str = "PETMATCH_SNS_SERVICE_URL";
    const ENV_MODEL_PATH: &'static str = "PETMATCH_MODEL_PATH";
    const ENV_HTTP_TIMEOUT_SECS: &'static str = "PETMATCH_HTTP_TIMEOUT_SECS";
    const ENV_TOP_PETSTARS: &'static str = "PETMATCH_TOP_PETSTARS";
    const ENV_CORS_ORIGINS: &'static str = "PETMATCH_CORS_ORIGINS";
    const ENV_CORS_ALLOW_CREDENTIALS: &'static str = "PETMATCH_CORS_ALLOW_CREDENTIALS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let pet_service_url =
            Self::parse_string_from_env(Self::ENV_PET_SERVICE_URL, defaults.pet_service_url);
        let sns_service_url =
            Self::parse_string_from_env(Self::ENV_SNS_SERVICE_URL, defaults.sns_service_url);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let http_timeout_secs =
            Self::parse_u64_from_env(Self::ENV_HTTP_TIMEOUT_SECS, defaults.http_timeout_secs);
        let top_petstars = Self::parse_top_k_from_env(defaults.top_petstars)?;
        let cors_origins = Self::parse_list_from_env(Self::ENV_CORS_ORIGINS, defaults.cors_origins);
        let cors_allow_credentials = Self::parse_bool_from_env(
            Self::ENV_CORS_ALLOW_CREDENTIALS,
            defaults.cors_allow_credentials,
        );

        Ok(Self {
            port,
            bind_addr,
            pet_service_url,
            sns_service_url,
            model_path,
            http_timeout_secs,
            top_petstars,
            cors_origins,
            cors_allow_credentials,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Returns `true` when any origin is allowed.
    pub fn cors_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_top_k_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_TOP_PETSTARS) {
            Ok(value) => value.parse().map_err(|e| ConfigError::TopKParseError {
                value: value.clone(),
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(default)
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        match env::var(var_name) {
            Ok(value) => {
                let origins: Vec<String> = value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect();

                if origins.is_empty() { default } else { origins }
            }
            Err(_) => default,
        }
    }
}
