//! Price adjustment.
//!
//! The store keeps raw prices plus a cumulative adjustment factor per day.
//! An adjusted price is `raw * factor / anchor`, where the anchor is the
//! factor of the bar whose price must stay untouched:
//!
//! - [`AdjustMode::Backward`] (`hfq`) anchors on the most recent factor, so
//!   the latest bar keeps its traded price.
//! - [`AdjustMode::Forward`] (`qfq`) anchors on the oldest factor, so the
//!   first bar keeps its traded price.
//!
//! The anchor is looked up over the stock's whole stored history, which
//! makes the adjusted price of a given day independent of the query window.
//! A bar whose factor equals the anchor keeps its stored prices unrounded.

use crate::bar::{DailyBar, RawBar};
use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Price adjustment method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustMode {
    /// Raw traded prices
    #[default]
    None,
    /// Back-adjusted (`hfq`), anchored on the latest bar
    Backward,
    /// Front-adjusted (`qfq`), anchored on the oldest bar
    Forward,
}

impl AdjustMode {
    /// Short name used by callers (`""`, `"hfq"`, `"qfq"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Backward => "hfq",
            Self::Forward => "qfq",
        }
    }

    /// Which end of the history supplies the anchor factor, if any.
    pub const fn anchor(&self) -> Option<Anchor> {
        match self {
            Self::None => None,
            Self::Backward => Some(Anchor::Latest),
            Self::Forward => Some(Anchor::Earliest),
        }
    }
}

impl fmt::Display for AdjustMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FromStr for AdjustMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "hfq" => Ok(Self::Backward),
            "qfq" => Ok(Self::Forward),
            _ => Err(DataError::InvalidAdjustMode(s.to_string())),
        }
    }
}

/// End of a stock's history that supplies the anchor factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Most recent non-null factor
    Latest,
    /// Oldest non-null factor
    Earliest,
}

/// Round to `precision` decimal places.
pub fn round_price(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale
}

/// A usable factor is finite and strictly positive.
fn usable(factor: Option<f64>) -> Option<f64> {
    factor.filter(|f| f.is_finite() && *f > 0.0)
}

/// Scale to apply to a row, or `None` when its prices stay raw.
///
/// A ratio of exactly one leaves the row raw, so the anchor bar is never
/// rounded away from its stored price.
fn ratio(factor: Option<f64>, anchor: Option<f64>) -> Option<f64> {
    let r = usable(factor)? / anchor?;
    (r != 1.0).then_some(r)
}

/// Apply `mode` to raw rows.
///
/// `anchor_factor` is the factor at the mode's anchor end of the history
/// (ignored for [`AdjustMode::None`]). Rows without a usable factor, or all
/// rows when no anchor exists, keep their raw prices.
pub fn adjust_bars(
    rows: Vec<RawBar>,
    mode: AdjustMode,
    anchor_factor: Option<f64>,
    precision: u32,
) -> Vec<DailyBar> {
    let anchor = match mode {
        AdjustMode::None => None,
        AdjustMode::Backward | AdjustMode::Forward => usable(anchor_factor),
    };

    rows.into_iter()
        .map(|row| {
            let row_ratio = ratio(row.adj_factor, anchor);
            let scale = |price: f64| match row_ratio {
                Some(r) => round_price(price * r, precision),
                None => price,
            };

            DailyBar {
                open: scale(row.open),
                high: scale(row.high),
                low: scale(row.low),
                close: scale(row.close),
                volume: row.volume,
                amount: row.amount,
                code: row.code,
                trade_date: row.trade_date,
            }
        })
        .collect()
}

/// Adjust a single close price.
pub fn adjust_price(
    close: f64,
    factor: Option<f64>,
    mode: AdjustMode,
    anchor_factor: Option<f64>,
    precision: u32,
) -> f64 {
    if mode == AdjustMode::None {
        return close;
    }
    match ratio(factor, usable(anchor_factor)) {
        Some(r) => round_price(close * r, precision),
        None => close,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::TradeDate;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn raw(date: &str, close: f64, factor: Option<f64>) -> RawBar {
        RawBar {
            code: "000001.SZ".to_string(),
            trade_date: TradeDate::parse(date).unwrap(),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 100.0,
            amount: Some(close * 100.0),
            adj_factor: factor,
        }
    }

    fn history() -> Vec<RawBar> {
        vec![
            raw("20240102", 10.00, Some(1.0)),
            raw("20240103", 10.20, Some(1.0)),
            raw("20240104", 5.15, Some(2.0)),
            raw("20240105", 5.30, Some(2.0)),
        ]
    }

    #[rstest]
    #[case("", AdjustMode::None)]
    #[case("none", AdjustMode::None)]
    #[case("hfq", AdjustMode::Backward)]
    #[case("QFQ", AdjustMode::Forward)]
    fn test_parse_mode(#[case] input: &str, #[case] expected: AdjustMode) {
        assert_eq!(input.parse::<AdjustMode>().unwrap(), expected);
    }

    #[test]
    fn test_parse_mode_rejects_unknown() {
        assert!(matches!(
            "front".parse::<AdjustMode>(),
            Err(DataError::InvalidAdjustMode(_))
        ));
    }

    #[test]
    fn test_unadjusted_passes_through() {
        let rows = history();
        let bars = adjust_bars(rows.clone(), AdjustMode::None, Some(2.0), 2);
        for (bar, row) in bars.iter().zip(&rows) {
            assert_eq!(bar.open, row.open);
            assert_eq!(bar.high, row.high);
            assert_eq!(bar.low, row.low);
            assert_eq!(bar.close, row.close);
        }
    }

    #[test]
    fn test_backward_keeps_latest_price() {
        let bars = adjust_bars(history(), AdjustMode::Backward, Some(2.0), 2);
        assert_relative_eq!(bars[3].close, 5.30);
        assert_relative_eq!(bars[0].close, 5.00);
        assert_relative_eq!(bars[1].close, 5.10);
    }

    #[test]
    fn test_forward_keeps_oldest_price() {
        let bars = adjust_bars(history(), AdjustMode::Forward, Some(1.0), 2);
        assert_relative_eq!(bars[0].close, 10.00);
        assert_relative_eq!(bars[2].close, 10.30);
        assert_relative_eq!(bars[3].high, 11.60);
    }

    #[test]
    fn test_missing_factor_falls_back_to_raw() {
        let mut rows = history();
        rows[1].adj_factor = None;
        rows[2].adj_factor = Some(0.0);
        let bars = adjust_bars(rows, AdjustMode::Backward, Some(2.0), 2);
        assert_relative_eq!(bars[1].close, 10.20);
        assert_relative_eq!(bars[2].close, 5.15);
        assert_relative_eq!(bars[0].close, 5.00);
    }

    #[test]
    fn test_no_anchor_leaves_prices_raw() {
        let bars = adjust_bars(history(), AdjustMode::Forward, None, 2);
        assert_relative_eq!(bars[2].close, 5.15);
    }

    #[test]
    fn test_adjusted_ohlc_stays_consistent() {
        let bars = adjust_bars(history(), AdjustMode::Backward, Some(2.0), 2);
        for bar in &bars {
            assert!(bar.low <= bar.open && bar.open <= bar.high);
            assert!(bar.low <= bar.close && bar.close <= bar.high);
        }
    }

    #[test]
    fn test_adjust_price() {
        assert_relative_eq!(
            adjust_price(10.2, Some(1.0), AdjustMode::Backward, Some(2.0), 2),
            5.10
        );
        assert_eq!(
            adjust_price(10.2, Some(1.0), AdjustMode::None, Some(2.0), 2),
            10.2
        );
        assert_eq!(
            adjust_price(10.2, None, AdjustMode::Forward, Some(1.0), 2),
            10.2
        );
    }

    #[test]
    fn test_anchor_bar_keeps_unrounded_price() {
        let rows = vec![
            raw("20240103", 10.005, Some(1.0)),
            raw("20240104", 5.123, Some(2.0)),
        ];
        let bars = adjust_bars(rows.clone(), AdjustMode::Forward, Some(1.0), 2);
        assert_eq!(bars[0].close, rows[0].close);
        assert_eq!(bars[0].high, rows[0].high);
        assert_eq!(bars[0].low, rows[0].low);
        assert_relative_eq!(bars[1].close, 10.25);

        assert_eq!(
            adjust_price(10.005, Some(2.0), AdjustMode::Backward, Some(2.0), 2),
            10.005
        );
    }

    #[test]
    fn test_round_price() {
        assert_relative_eq!(round_price(3.14159, 2), 3.14);
        assert_relative_eq!(round_price(2.675_001, 2), 2.68);
        assert_relative_eq!(round_price(7.0, 0), 7.0);
    }
}
