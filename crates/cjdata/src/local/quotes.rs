//! Daily, weekly and single-price queries.

use super::LocalData;
use super::schema::DAILY_TABLE;
use crate::adjust::{AdjustMode, Anchor, adjust_bars, adjust_price};
use crate::bar::{DailyBar, RawBar, WeeklyBar};
use crate::code::StockCode;
use crate::date::TradeDate;
use crate::error::Result;
use crate::resample::resample_weekly;
use polars::prelude::DataFrame;
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, params};
use tracing::debug;

impl LocalData {
    /// Daily bars for `code` between `start_date` and `end_date` inclusive.
    ///
    /// Dates are `YYYYMMDD`. Returns an empty frame when nothing matches,
    /// including when `start_date` is after `end_date`. Rows are ordered by
    /// `trade_date` ascending; see [`DailyBar::to_frame`] for the columns.
    ///
    /// Adjustment anchors on the stock's whole stored history, not on the
    /// window. An `hfq` window that ends before the stock's latest bar
    /// therefore still scales its own last row; likewise a `qfq` window that
    /// starts after the first stored bar scales its first row. Only the bar
    /// carrying the anchor factor keeps its raw prices.
    pub fn get_daily(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
        adj: AdjustMode,
    ) -> Result<DataFrame> {
        let bars = self.get_daily_bars(code, start_date, end_date, adj)?;
        DailyBar::to_frame(&bars)
    }

    /// Typed form of [`get_daily`](Self::get_daily).
    pub fn get_daily_bars(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
        adj: AdjustMode,
    ) -> Result<Vec<DailyBar>> {
        let code = StockCode::parse(code)?;
        let start = TradeDate::parse(start_date)?;
        let end = TradeDate::parse(end_date)?;

        if start > end {
            debug!(%code, %start, %end, "empty range");
            return Ok(Vec::new());
        }

        let rows = self.raw_bars(&code, start, end)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let anchor = match adj.anchor() {
            Some(anchor) => self.anchor_factor(&code, anchor)?,
            None => None,
        };

        debug!(%code, %start, %end, %adj, rows = rows.len(), "daily bars");
        Ok(adjust_bars(rows, adj, anchor, self.config.price_precision))
    }

    /// Weekly bars resampled from the daily bars of the same range.
    ///
    /// Each row is one ISO week, dated by its last trade date.
    pub fn get_weekly(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
        adj: AdjustMode,
    ) -> Result<DataFrame> {
        let bars = self.get_weekly_bars(code, start_date, end_date, adj)?;
        WeeklyBar::to_frame(&bars)
    }

    /// Typed form of [`get_weekly`](Self::get_weekly).
    pub fn get_weekly_bars(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
        adj: AdjustMode,
    ) -> Result<Vec<WeeklyBar>> {
        let daily = self.get_daily_bars(code, start_date, end_date, adj)?;
        Ok(resample_weekly(&daily))
    }

    /// Most recent trade date in the daily table, or `None` when it is empty.
    pub fn get_latest_date(&self) -> Result<Option<String>> {
        let sql = format!("SELECT MAX(trade_date) FROM {DAILY_TABLE}");
        let latest: Option<String> = self.conn()?.query_row(&sql, [], |row| row.get(0))?;
        debug!(latest = ?latest, "latest trade date");
        Ok(latest)
    }

    /// Close price of `code` on `date`.
    ///
    /// Returns `0.0` when the store has no bar for that exact day. Use
    /// [`get_price_opt`](Self::get_price_opt) to tell absence apart from a
    /// genuine zero.
    pub fn get_price(&self, code: &str, date: &str, adj: AdjustMode) -> Result<f64> {
        Ok(self.get_price_opt(code, date, adj)?.unwrap_or(0.0))
    }

    /// Close price of `code` on `date`, or `None` when there is no bar.
    pub fn get_price_opt(&self, code: &str, date: &str, adj: AdjustMode) -> Result<Option<f64>> {
        let code = StockCode::parse(code)?;
        let date = TradeDate::parse(date)?;

        let sql = format!(
            "SELECT close, adj_factor FROM {DAILY_TABLE}
             WHERE code = ?1 AND trade_date = ?2"
        );
        let row: Option<(f64, Option<f64>)> = self
            .conn()?
            .query_row(
                &sql,
                params![code.to_string(), date.to_key()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((close, factor)) = row else {
            debug!(%code, %date, "no price");
            return Ok(None);
        };

        let anchor = match adj.anchor() {
            Some(anchor) => self.anchor_factor(&code, anchor)?,
            None => None,
        };

        Ok(Some(adjust_price(
            close,
            factor,
            adj,
            anchor,
            self.config.price_precision,
        )))
    }

    fn raw_bars(&self, code: &StockCode, start: TradeDate, end: TradeDate) -> Result<Vec<RawBar>> {
        let sql = format!(
            "SELECT code, trade_date, open, high, low, close, volume, amount, adj_factor
             FROM {DAILY_TABLE}
             WHERE code = ?1 AND trade_date >= ?2 AND trade_date <= ?3
             ORDER BY trade_date ASC"
        );
        let mut stmt = self.conn()?.prepare(&sql)?;

        let rows = stmt.query_map(
            params![code.to_string(), start.to_key(), end.to_key()],
            |row| {
                let trade_date: String = row.get(1)?;
                Ok(RawBar {
                    code: row.get(0)?,
                    trade_date: TradeDate::parse(&trade_date).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, e.to_string().into())
                    })?,
                    open: row.get(2)?,
                    high: row.get(3)?,
                    low: row.get(4)?,
                    close: row.get(5)?,
                    volume: row.get(6)?,
                    amount: row.get(7)?,
                    adj_factor: row.get(8)?,
                })
            },
        )?;

        let bars = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(bars)
    }

    /// Factor at one end of the stock's stored history.
    fn anchor_factor(&self, code: &StockCode, anchor: Anchor) -> Result<Option<f64>> {
        let order = match anchor {
            Anchor::Latest => "DESC",
            Anchor::Earliest => "ASC",
        };
        let sql = format!(
            "SELECT adj_factor FROM {DAILY_TABLE}
             WHERE code = ?1 AND adj_factor > 0
             ORDER BY trade_date {order} LIMIT 1"
        );

        let factor = self
            .conn()?
            .query_row(&sql, params![code.to_string()], |row| row.get(0))
            .optional()?;
        Ok(factor)
    }
}
