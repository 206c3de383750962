//! Table layout of the local store.
//!
//! The ingestion pipeline owns this layout; the reader only depends on the
//! table and column names below. [`REFERENCE_DDL`] documents the expected
//! shape and is what the test fixtures build.

/// Daily bars: `code, trade_date, open, high, low, close, volume, amount, adj_factor`.
pub const DAILY_TABLE: &str = "daily_k_data";

/// Stock names: `code, name`.
pub const STOCK_INFO_TABLE: &str = "stock_info";

/// Sector membership: `sector_name, code`.
pub const SECTOR_TABLE: &str = "sector_stocks";

/// Trading calendar: `exchange, trade_date`.
pub const CALENDAR_TABLE: &str = "trading_calendar";

/// Tables a populated store is expected to contain.
pub const REQUIRED_TABLES: [&str; 4] = [DAILY_TABLE, STOCK_INFO_TABLE, SECTOR_TABLE, CALENDAR_TABLE];

/// Expected table definitions.
pub const REFERENCE_DDL: &str = "
CREATE TABLE IF NOT EXISTS daily_k_data (
    code TEXT NOT NULL,
    trade_date TEXT NOT NULL,
    open REAL NOT NULL,
    high REAL NOT NULL,
    low REAL NOT NULL,
    close REAL NOT NULL,
    volume REAL NOT NULL,
    amount REAL,
    adj_factor REAL,
    PRIMARY KEY (code, trade_date)
);

CREATE INDEX IF NOT EXISTS idx_daily_trade_date ON daily_k_data(trade_date);

CREATE TABLE IF NOT EXISTS stock_info (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sector_stocks (
    sector_name TEXT NOT NULL,
    code TEXT NOT NULL,
    PRIMARY KEY (sector_name, code)
);

CREATE TABLE IF NOT EXISTS trading_calendar (
    exchange TEXT NOT NULL,
    trade_date TEXT NOT NULL,
    PRIMARY KEY (exchange, trade_date)
);
";
