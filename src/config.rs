//! Service configuration read from the environment

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_WATER_API_URL: &str =
    "http://apis.data.go.kr/1480523/WaterQualityService/getWaterMeasuringList";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a valid number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Invalid HOST:PORT configuration: {0}")]
    InvalidAddress(String),
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Aggregate ledger file
    pub aggregate_path: PathBuf,
    /// Directory of the per-branch ledger files
    pub branch_dir: PathBuf,
    pub water_api_url: String,
    pub water_api_key: String,
    pub water_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            aggregate_path: PathBuf::from(sales_ledger::store::DEFAULT_AGGREGATE_PATH),
            branch_dir: PathBuf::from(sales_ledger::store::DEFAULT_BRANCH_DIR),
            water_api_url: DEFAULT_WATER_API_URL.to_string(),
            water_api_key: String::new(),
            water_page_size: water_quality::client::DEFAULT_PAGE_SIZE,
        }
    }
}

impl ServiceConfig {
    /// Read settings from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { key: "PORT", value })?,
            None => defaults.port,
        };
        let water_page_size = match lookup("WATER_PAGE_SIZE") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "WATER_PAGE_SIZE",
                    value,
                })?,
            None => defaults.water_page_size,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            aggregate_path: lookup("SALES_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.aggregate_path),
            branch_dir: lookup("BRANCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.branch_dir),
            water_api_url: lookup("WATER_API_URL").unwrap_or(defaults.water_api_url),
            water_api_key: lookup("WATER_API_KEY").unwrap_or(defaults.water_api_key),
            water_page_size,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}
