#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/cjdata/cjdata-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adjust;
pub mod bar;
pub mod code;
pub mod config;
pub mod date;
pub mod error;
pub mod local;
pub mod resample;

pub use adjust::AdjustMode;
pub use bar::{DailyBar, WeeklyBar};
pub use code::{CodeFormat, Market, StockCode};
pub use config::LocalDataConfig;
pub use date::TradeDate;
pub use error::{DataError, Result};
pub use local::LocalData;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
