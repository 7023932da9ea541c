//! CSV output backend.
//!
//! Writes one file with the header `field,signal,value,delay` followed by one
//! record per signal reading.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, SignalRow};

pub const CSV_HEADER: [&str; 4] = ["field", "signal", "value", "delay"];

/// Writes signal rows to a single CSV file.
pub struct CsvWriter {
    path:     PathBuf,
    out:      Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create (or truncate) `path` and write the header row.
    pub fn new(path: &Path) -> OutputResult<Self> {
        let mut out = Writer::from_path(path)?;
        out.write_record(CSV_HEADER)?;
        Ok(Self { path: path.to_path_buf(), out, finished: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputWriter for CsvWriter {
    fn write_rows(&mut self, rows: &[SignalRow]) -> OutputResult<()> {
        for row in rows {
            let delay = row.delay_text();
            self.out.write_record([row.field, row.signal, row.value.as_str(), delay.as_str()])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
