//! Reader configuration.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest supported rounding precision for adjusted prices.
const MAX_PRICE_PRECISION: u32 = 8;

/// Configuration for a [`LocalData`](crate::LocalData) handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalDataConfig {
    /// Decimal places kept on adjusted prices (default: 2)
    pub price_precision: u32,
    /// Name prefix that marks a sector as an ETF sector (default: "ETF")
    pub etf_sector_prefix: String,
    /// Result cap used by `search_stocks_default` (default: 20)
    pub default_search_limit: usize,
    /// SQLite busy timeout in milliseconds (default: 5000)
    pub busy_timeout_ms: u64,
}

impl Default for LocalDataConfig {
    fn default() -> Self {
        Self {
            price_precision: 2,
            etf_sector_prefix: "ETF".to_string(),
            default_search_limit: 20,
            busy_timeout_ms: 5_000,
        }
    }
}

impl LocalDataConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.price_precision > MAX_PRICE_PRECISION {
            return Err(DataError::Config(format!(
                "price_precision {} exceeds {}",
                self.price_precision, MAX_PRICE_PRECISION
            )));
        }
        if self.etf_sector_prefix.is_empty() {
            return Err(DataError::Config(
                "etf_sector_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
