//! Daily and weekly price bars.

use crate::date::TradeDate;
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column order shared by daily and weekly frames.
pub const BAR_COLUMNS: [&str; 8] = [
    "code",
    "trade_date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "amount",
];

/// A daily row exactly as stored, before adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// Normalized stock code (`000001.SZ`)
    pub code: String,
    /// Trade date
    pub trade_date: TradeDate,
    /// Raw open
    pub open: f64,
    /// Raw high
    pub high: f64,
    /// Raw low
    pub low: f64,
    /// Raw close
    pub close: f64,
    /// Traded volume
    pub volume: f64,
    /// Traded amount, when the store records it
    pub amount: Option<f64>,
    /// Cumulative adjustment factor, when the store records it
    pub adj_factor: Option<f64>,
}

/// One trading day of prices, adjusted according to the requested mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Normalized stock code (`000001.SZ`)
    pub code: String,
    /// Trade date
    pub trade_date: TradeDate,
    /// Open
    pub open: f64,
    /// High
    pub high: f64,
    /// Low
    pub low: f64,
    /// Close
    pub close: f64,
    /// Traded volume
    pub volume: f64,
    /// Traded amount
    pub amount: Option<f64>,
}

impl DailyBar {
    /// Build a polars frame with [`BAR_COLUMNS`].
    pub fn to_frame(bars: &[Self]) -> Result<DataFrame> {
        let mut columns = BarColumns::with_capacity(bars.len());
        for bar in bars {
            columns.push(
                &bar.code,
                bar.trade_date,
                [bar.open, bar.high, bar.low, bar.close],
                bar.volume,
                bar.amount,
            );
        }
        columns.finish()
    }
}

/// One ISO week of prices aggregated from daily bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBar {
    /// Normalized stock code (`000001.SZ`)
    pub code: String,
    /// Last trade date of the week
    pub trade_date: TradeDate,
    /// Open of the first trading day
    pub open: f64,
    /// Highest high
    pub high: f64,
    /// Lowest low
    pub low: f64,
    /// Close of the last trading day
    pub close: f64,
    /// Summed volume
    pub volume: f64,
    /// Summed amount; `None` only when no day in the week has an amount
    pub amount: Option<f64>,
    /// Number of daily bars in the week
    pub trading_days: usize,
}

impl WeeklyBar {
    /// Build a polars frame with [`BAR_COLUMNS`].
    ///
    /// `trading_days` is not part of the frame so weekly and daily frames
    /// share one layout.
    pub fn to_frame(bars: &[Self]) -> Result<DataFrame> {
        let mut columns = BarColumns::with_capacity(bars.len());
        for bar in bars {
            columns.push(
                &bar.code,
                bar.trade_date,
                [bar.open, bar.high, bar.low, bar.close],
                bar.volume,
                bar.amount,
            );
        }
        columns.finish()
    }
}

#[derive(Debug, Default)]
struct BarColumns {
    codes: Vec<String>,
    dates: Vec<String>,
    opens: Vec<f64>,
    highs: Vec<f64>,
    lows: Vec<f64>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
    amounts: Vec<Option<f64>>,
}

impl BarColumns {
    fn with_capacity(n: usize) -> Self {
        Self {
            codes: Vec::with_capacity(n),
            dates: Vec::with_capacity(n),
            opens: Vec::with_capacity(n),
            highs: Vec::with_capacity(n),
            lows: Vec::with_capacity(n),
            closes: Vec::with_capacity(n),
            volumes: Vec::with_capacity(n),
            amounts: Vec::with_capacity(n),
        }
    }

    fn push(
        &mut self,
        code: &str,
        date: TradeDate,
        [open, high, low, close]: [f64; 4],
        volume: f64,
        amount: Option<f64>,
    ) {
        self.codes.push(code.to_string());
        self.dates.push(date.to_key());
        self.opens.push(open);
        self.highs.push(high);
        self.lows.push(low);
        self.closes.push(close);
        self.volumes.push(volume);
        self.amounts.push(amount);
    }

    fn finish(self) -> Result<DataFrame> {
        let [code, trade_date, open, high, low, close, volume, amount] = BAR_COLUMNS;
        let df = DataFrame::new(vec![
            Series::new(code.into(), self.codes).into(),
            Series::new(trade_date.into(), self.dates).into(),
            Series::new(open.into(), self.opens).into(),
            Series::new(high.into(), self.highs).into(),
            Series::new(low.into(), self.lows).into(),
            Series::new(close.into(), self.closes).into(),
            Series::new(volume.into(), self.volumes).into(),
            Series::new(amount.into(), self.amounts).into(),
        ])?;
        Ok(df)
    }
}
