use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://msm-nr1.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// API only; the frontend dev server proxies `/api` here.
    Development,
    /// API plus the built SPA served from `static_dir`.
    Production,
}

impl RunMode {
    pub fn from_env_value(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "production" || v == "prod" => RunMode::Production,
            _ => RunMode::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub mode: RunMode,
    pub static_dir: PathBuf,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with the variable source injected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = match lookup("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidNumber { name: "PORT", value: raw }),
            },
            None => DEFAULT_PORT,
        };
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| format!("0.0.0.0:{}", port));

        let mode_raw = lookup("APP_ENV").or_else(|| lookup("NODE_ENV"));
        let mode = RunMode::from_env_value(mode_raw.as_deref());

        let static_dir = PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| "dist".to_string()));

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "DB_MAX_CONNECTIONS",
                        value: raw,
                    })
                }
            },
            None => 5,
        };

        Ok(Self {
            database_url,
            bind_addr,
            mode,
            static_dir,
            db_max_connections,
        })
    }
}
