//! Plain data row type written by output backends.

/// Value of the `field` column on every row.
pub const FIELD_CURRENT: &str = "current";

/// One signal reading: a `field,signal,value,delay` record.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    /// Tick the reading belongs to.  Not part of the CSV layout.
    pub tick:   u64,
    pub field:  &'static str,
    /// Dotted signal path, e.g. `Vehicle.CurrentLocation.Latitude`.
    pub signal: &'static str,
    pub value:  String,
    /// Simulated transmission delay in seconds, four decimals.
    pub delay:  f64,
}

impl SignalRow {
    /// The `delay` column as written: always four decimals.
    pub fn delay_text(&self) -> String {
        format!("{:.4}", self.delay)
    }
}
