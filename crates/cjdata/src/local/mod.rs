//! Read-only handle on the local SQLite store.
//!
//! [`LocalData`] owns one connection for its lifetime. The connection is
//! released by [`LocalData::close`] or, failing that, when the handle is
//! dropped, so every exit path (including `?` early returns) gives it back.
//!
//! ```no_run
//! use cjdata::{AdjustMode, LocalData};
//!
//! # fn main() -> cjdata::Result<()> {
//! let mut data = LocalData::open("data/stock_data.db")?;
//! let daily = data.get_daily("000001.SZ", "20240101", "20240131", AdjustMode::Backward)?;
//! println!("{daily}");
//! data.close()?;
//! # Ok(())
//! # }
//! ```

mod metadata;
mod quotes;
pub mod schema;

use crate::config::LocalDataConfig;
use crate::error::{DataError, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Read-only access to a local price, sector and calendar store.
///
/// A handle is not meant to be shared between threads; open one per reader.
#[derive(Debug)]
pub struct LocalData {
    conn: Option<Connection>,
    path: PathBuf,
    config: LocalDataConfig,
}

impl LocalData {
    /// Open the store at `path` with the default configuration.
    ///
    /// Fails with [`DataError::Connection`] when the file is missing or is
    /// not a SQLite database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, LocalDataConfig::default())
    }

    /// Open the store at `path` with a custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: LocalDataConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref().to_path_buf();
        let connection_error = |e: rusqlite::Error| DataError::Connection {
            path: path.clone(),
            reason: e.to_string(),
        };

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(connection_error)?;

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(connection_error)?;

        // SQLite opens lazily; touching the catalog surfaces a corrupt or
        // non-database file here instead of on the first query.
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connection_error)?;

        info!(path = %path.display(), "opened local store");
        Ok(Self {
            conn: Some(conn),
            path,
            config,
        })
    }

    /// Release the connection. Calling it again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        conn.close().map_err(|(_, e)| DataError::Database(e))?;
        info!(path = %self.path.display(), "closed local store");
        Ok(())
    }

    /// Whether [`close`](Self::close) has been called.
    pub const fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Path the store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Active configuration.
    pub const fn config(&self) -> &LocalDataConfig {
        &self.config
    }

    /// Whether the store has a table called `name`.
    ///
    /// A missing table is reported as `false`, never as an error.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let found = self
            .conn()?
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        debug!(table = name, exists = found.is_some(), "table check");
        Ok(found.is_some())
    }

    /// Required tables that the store does not contain.
    pub fn missing_tables(&self) -> Result<Vec<&'static str>> {
        let mut missing = Vec::new();
        for table in schema::REQUIRED_TABLES {
            if !self.table_exists(table)? {
                missing.push(table);
            }
        }
        Ok(missing)
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(DataError::Closed)
    }
}

impl Drop for LocalData {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), error = %e, "failed to close local store");
        }
    }
}
