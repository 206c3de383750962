//! Stock code normalization.
//!
//! Codes are stored as a six digit number plus an exchange suffix
//! (`000001.SZ`). Callers may pass several looser spellings; every query
//! normalizes its input through [`StockCode::parse`] first.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mainland exchanges that appear in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Market {
    /// Shanghai Stock Exchange
    Sh,
    /// Shenzhen Stock Exchange
    Sz,
    /// Beijing Stock Exchange
    Bj,
}

impl Market {
    /// Returns all markets.
    pub fn all() -> Vec<Self> {
        vec![Self::Sh, Self::Sz, Self::Bj]
    }

    /// Exchange suffix as stored (`SH`, `SZ`, `BJ`).
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Sh => "SH",
            Self::Sz => "SZ",
            Self::Bj => "BJ",
        }
    }

    /// Parse an exchange suffix, ignoring case.
    pub fn from_suffix(s: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|market| market.suffix().eq_ignore_ascii_case(s))
    }

    /// Infer the listing exchange from the first digit of a bare code.
    pub const fn infer(number: &str) -> Option<Self> {
        match number.as_bytes().first() {
            Some(b'5' | b'6' | b'9') => Some(Self::Sh),
            Some(b'0' | b'1' | b'2' | b'3') => Some(Self::Sz),
            Some(b'4' | b'8') => Some(Self::Bj),
            _ => None,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

impl FromStr for Market {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_suffix(s.trim()).ok_or_else(|| DataError::InvalidExchange(s.to_string()))
    }
}

/// Output shape for codes returned by list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeFormat {
    /// Number plus exchange suffix, e.g. `000001.SZ`
    #[default]
    MarketSuffix,
    /// Number only, e.g. `000001`
    Bare,
}

impl FromStr for CodeFormat {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "market_suffix" | "suffix" => Ok(Self::MarketSuffix),
            "bare" | "number" => Ok(Self::Bare),
            _ => Err(DataError::InvalidCodeFormat(s.to_string())),
        }
    }
}

/// A normalized stock code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockCode {
    number: String,
    market: Market,
}

impl StockCode {
    /// Normalize a code.
    ///
    /// Accepts `000001.SZ`, `000001.sz`, `SZ000001`, `sz000001` and a bare
    /// `000001`, whose exchange is inferred from its leading digit.
    pub fn parse(raw: &str) -> Result<Self> {
        let s = raw.trim();
        let invalid = || DataError::InvalidCode(raw.to_string());

        let (number, market) = if let Some((number, suffix)) = s.split_once('.') {
            (number, Market::from_suffix(suffix).ok_or_else(invalid)?)
        } else if s.len() == 8 && s.is_char_boundary(2) {
            let (prefix, number) = s.split_at(2);
            (number, Market::from_suffix(prefix).ok_or_else(invalid)?)
        } else {
            (s, Market::infer(s).ok_or_else(invalid)?)
        };

        if number.len() != 6 || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        Ok(Self {
            number: number.to_string(),
            market,
        })
    }

    /// The six digit number.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// The listing exchange.
    pub const fn market(&self) -> Market {
        self.market
    }

    /// Render the code in the requested shape.
    pub fn format(&self, format: CodeFormat) -> String {
        match format {
            CodeFormat::MarketSuffix => self.to_string(),
            CodeFormat::Bare => self.number.clone(),
        }
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.number, self.market)
    }
}

impl FromStr for StockCode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("000001.SZ", "000001.SZ")]
    #[case("000001.sz", "000001.SZ")]
    #[case("SZ000001", "000001.SZ")]
    #[case("sh600000", "600000.SH")]
    #[case("000001", "000001.SZ")]
    #[case("600519", "600519.SH")]
    #[case("510300", "510300.SH")]
    #[case("159915", "159915.SZ")]
    #[case("830799", "830799.BJ")]
    #[case(" 300750.SZ ", "300750.SZ")]
    fn test_parse_normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(StockCode::parse(input).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("00001.SZ")]
    #[case("0000011.SZ")]
    #[case("000001.XX")]
    #[case("ABCDEF")]
    #[case("XX000001")]
    #[case("7000001")]
    #[case("00000A.SZ")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(matches!(
            StockCode::parse(input),
            Err(DataError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_format() {
        let code = StockCode::parse("000001.SZ").unwrap();
        assert_eq!(code.format(CodeFormat::MarketSuffix), "000001.SZ");
        assert_eq!(code.format(CodeFormat::Bare), "000001");
        assert_eq!(code.number(), "000001");
        assert_eq!(code.market(), Market::Sz);
    }

    #[test]
    fn test_market_from_str() {
        assert_eq!("sh".parse::<Market>().unwrap(), Market::Sh);
        assert_eq!("BJ".parse::<Market>().unwrap(), Market::Bj);
        assert!(matches!(
            "HK".parse::<Market>(),
            Err(DataError::InvalidExchange(_))
        ));
        assert_eq!(Market::all().len(), 3);
    }

    #[test]
    fn test_every_suffix_round_trips() {
        for market in Market::all() {
            assert_eq!(Market::from_suffix(market.suffix()), Some(market));
            let lower = market.suffix().to_ascii_lowercase();
            assert_eq!(Market::from_suffix(&lower), Some(market));
        }
        assert_eq!(Market::from_suffix("HK"), None);
        assert_eq!(Market::from_suffix(""), None);
    }

    #[test]
    fn test_code_format_from_str() {
        assert_eq!(
            "market_suffix".parse::<CodeFormat>().unwrap(),
            CodeFormat::MarketSuffix
        );
        assert_eq!("BARE".parse::<CodeFormat>().unwrap(), CodeFormat::Bare);
        assert!("prefix".parse::<CodeFormat>().is_err());
    }
}
