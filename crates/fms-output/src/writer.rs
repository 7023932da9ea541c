//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, SignalRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// The observer keeps the first error a writer returns and stops writing;
/// it is retrieved with
/// [`SignalOutputObserver::take_error`][crate::SignalOutputObserver::take_error].
pub trait OutputWriter {
    /// Write every row of one tick, in order.
    fn write_rows(&mut self, rows: &[SignalRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
