//! Stock names, sectors and the trading calendar.

use super::LocalData;
use super::schema::{CALENDAR_TABLE, SECTOR_TABLE, STOCK_INFO_TABLE};
use crate::code::{CodeFormat, Market, StockCode};
use crate::date::TradeDate;
use crate::error::Result;
use polars::prelude::*;
use rusqlite::{OptionalExtension, params};
use tracing::{debug, warn};

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl LocalData {
    /// Display name of `code`, or an empty string when the code is unknown.
    pub fn get_stock_name(&self, code: &str) -> Result<String> {
        let code = StockCode::parse(code)?;
        let sql = format!("SELECT name FROM {STOCK_INFO_TABLE} WHERE code = ?1");
        let name: Option<String> = self
            .conn()?
            .query_row(&sql, params![code.to_string()], |row| row.get(0))
            .optional()?;
        Ok(name.unwrap_or_default())
    }

    /// Stocks whose code or name contains `query`, ignoring case.
    ///
    /// Matches where the code or name starts with `query` come first, then
    /// plain substring matches; ties are broken by code. At most `limit`
    /// `(code, name)` pairs are returned.
    pub fn search_stocks(&self, query: &str, limit: usize) -> Result<Vec<(String, String)>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let escaped = escape_like(query);
        let contains = format!("%{escaped}%");
        let prefix = format!("{escaped}%");
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let sql = format!(
            r"SELECT code, name FROM {STOCK_INFO_TABLE}
              WHERE code LIKE ?1 ESCAPE '\' OR name LIKE ?1 ESCAPE '\'
              ORDER BY
                  CASE WHEN code LIKE ?2 ESCAPE '\' OR name LIKE ?2 ESCAPE '\' THEN 0 ELSE 1 END,
                  code ASC
              LIMIT ?3"
        );
        let mut stmt = self.conn()?.prepare(&sql)?;

        let results = stmt
            .query_map(params![contains, prefix, limit], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<Vec<(String, String)>, _>>()?;

        debug!(query, matches = results.len(), "stock search");
        Ok(results)
    }

    /// [`search_stocks`](Self::search_stocks) capped at the configured default limit.
    pub fn search_stocks_default(&self, query: &str) -> Result<Vec<(String, String)>> {
        self.search_stocks(query, self.config.default_search_limit)
    }

    /// Member codes of `sector_name`, ascending, shaped by `format`.
    ///
    /// An unknown sector yields an empty list.
    pub fn get_stock_list_in_sector(
        &self,
        sector_name: &str,
        format: CodeFormat,
    ) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT code FROM {SECTOR_TABLE}
             WHERE sector_name = ?1
             ORDER BY code ASC"
        );
        let mut stmt = self.conn()?.prepare(&sql)?;

        let stored = stmt
            .query_map(params![sector_name], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let codes: Vec<String> = stored
            .iter()
            .filter_map(|raw| match StockCode::parse(raw) {
                Ok(code) => Some(code.format(format)),
                Err(e) => {
                    warn!(sector = sector_name, code = %raw, error = %e, "skipping member");
                    None
                }
            })
            .collect();

        debug!(sector = sector_name, members = codes.len(), "sector members");
        Ok(codes)
    }

    /// Every sector name, ascending.
    pub fn get_sector_list(&self) -> Result<Vec<String>> {
        let sql = format!("SELECT DISTINCT sector_name FROM {SECTOR_TABLE} ORDER BY sector_name");
        let mut stmt = self.conn()?.prepare(&sql)?;

        let sectors = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(sectors)
    }

    /// Sector names starting with the ETF marker (`"ETF"` by default), ascending.
    pub fn get_etf_sector_list(&self) -> Result<Vec<String>> {
        let prefix = &self.config.etf_sector_prefix;
        let sql = format!(
            "SELECT DISTINCT sector_name FROM {SECTOR_TABLE}
             WHERE substr(sector_name, 1, length(?1)) = ?1
             ORDER BY sector_name"
        );
        let mut stmt = self.conn()?.prepare(&sql)?;

        let sectors = stmt
            .query_map(params![prefix], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        debug!(prefix = %prefix, sectors = sectors.len(), "etf sectors");
        Ok(sectors)
    }

    /// Trading days of `exchange` (`SH`, `SZ` or `BJ`) in `[start_date, end_date]`.
    ///
    /// Returns a frame with `exchange` and `trade_date` columns ordered by
    /// date. Dates may be `YYYYMMDD` or `YYYY-MM-DD`.
    pub fn get_trading_dates(
        &self,
        exchange: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<DataFrame> {
        let market: Market = exchange.parse()?;
        let start = TradeDate::parse_lenient(start_date)?;
        let end = TradeDate::parse_lenient(end_date)?;

        let dates = if start > end {
            Vec::new()
        } else {
            let sql = format!(
                "SELECT trade_date FROM {CALENDAR_TABLE}
                 WHERE exchange = ?1 AND trade_date >= ?2 AND trade_date <= ?3
                 ORDER BY trade_date ASC"
            );
            let mut stmt = self.conn()?.prepare(&sql)?;
            let dates = stmt
                .query_map(
                    params![market.suffix(), start.to_key(), end.to_key()],
                    |row| row.get(0),
                )?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            dates
        };

        debug!(%market, %start, %end, days = dates.len(), "trading calendar");
        let exchanges = vec![market.suffix(); dates.len()];
        let df = DataFrame::new(vec![
            Series::new("exchange".into(), exchanges).into(),
            Series::new("trade_date".into(), dates).into(),
        ])?;
        Ok(df)
    }

    /// Whether `date` (`YYYYMMDD` or `YYYY-MM-DD`) is a trading day on `exchange`.
    pub fn is_trading_day(&self, exchange: &str, date: &str) -> Result<bool> {
        let market: Market = exchange.parse()?;
        let date = TradeDate::parse_lenient(date)?;
        let sql = format!("SELECT 1 FROM {CALENDAR_TABLE} WHERE exchange = ?1 AND trade_date = ?2");
        let found = self
            .conn()?
            .query_row(
                &sql,
                params![market.suffix(), date.to_key()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
