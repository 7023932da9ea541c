//! SQLite output backend (feature `sqlite`).
//!
//! Writes the same readings as the CSV backend into a `signals` table, with
//! the tick as an extra column.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, SignalRow};

/// Writes signal rows to an SQLite database, one transaction per tick.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn new(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS signals (
                 tick   INTEGER NOT NULL,
                 field  TEXT    NOT NULL,
                 signal TEXT    NOT NULL,
                 value  TEXT    NOT NULL,
                 delay  REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_rows(&mut self, rows: &[SignalRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO signals (tick, field, signal, value, delay) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.field,
                    row.signal,
                    row.value,
                    row.delay,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
