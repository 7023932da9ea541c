//! `SignalOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use fms_core::{RandomSource, SimRng, Tick};
use fms_sim::SimObserver;
use fms_vehicle::VehicleSnapshot;
use fms_vehicle::snapshot::round_to;
use tracing::{debug, warn};

use crate::row::{FIELD_CURRENT, SignalRow};
use crate::signal::{Signal, SignalSet, SignalSource};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Fixed part of every generated VIN.
pub const VIN_PREFIX: &str = "YV2E4C3A5VB";

/// Child-stream offset of the output-side random source.
const OUTPUT_STREAM: u64 = 0x0f5;

/// A [`SimObserver`] that expands each snapshot into signal rows and writes
/// them to any [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Delays and the VIN come from the observer's own random stream, so adding
/// or removing output never changes the simulated vehicle.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  The first error makes [`halted`][SimObserver::halted]
/// return `true`, which stops the run; retrieve the cause with
/// [`take_error`][Self::take_error].
pub struct SignalOutputObserver<W: OutputWriter> {
    writer:       W,
    signals:      &'static [Signal],
    vin:          String,
    rng:          SimRng,
    rows_written: u64,
    last_error:   Option<OutputError>,
}

impl<W: OutputWriter> SignalOutputObserver<W> {
    /// Create an observer backed by `writer`, drawing the VIN and delays
    /// from `rng`.
    pub fn new(writer: W, set: SignalSet, mut rng: SimRng) -> Self {
        let vin = format!("{VIN_PREFIX}{}", rng.int_in(100_000, 999_999));
        Self {
            writer,
            signals: set.signals(),
            vin,
            rng,
            rows_written: 0,
            last_error: None,
        }
    }

    /// Like [`new`][Self::new], with an output stream derived from the run seed.
    pub fn seeded(writer: W, set: SignalSet, seed: u64) -> Self {
        Self::new(writer, set, SimRng::new(seed).child(OUTPUT_STREAM))
    }

    pub fn vin(&self) -> &str {
        &self.vin
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Expand one snapshot into rows, one per catalog entry.
    pub fn rows_for(&mut self, snapshot: &VehicleSnapshot) -> Vec<SignalRow> {
        let tick = snapshot.tick.0;
        let signals = self.signals;
        signals
            .iter()
            .map(|signal| SignalRow {
                tick,
                field: FIELD_CURRENT,
                signal: signal.path,
                value: signal_value(signal, snapshot, &self.vin),
                delay: round_to(self.rng.next_unit(), 4),
            })
            .collect()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

/// Rendered value of one signal.  Every catalog field must be a snapshot
/// key; an unknown one renders empty so the row count per tick stays fixed.
pub(crate) fn signal_value(signal: &Signal, snapshot: &VehicleSnapshot, vin: &str) -> String {
    match signal.source {
        SignalSource::Vin => vin.to_owned(),
        SignalSource::Field(name) => {
            let value = snapshot.get(name);
            debug_assert!(value.is_some(), "unknown snapshot field `{name}` for {}", signal.path);
            value.map(|v| v.to_string()).unwrap_or_default()
        }
    }
}

impl<W: OutputWriter> SimObserver for SignalOutputObserver<W> {
    fn on_run_start(&mut self, _initial: &VehicleSnapshot) {
        debug!(vin = %self.vin, signals = self.signals.len(), "output started");
    }

    fn on_tick(&mut self, _tick: Tick, snapshot: &VehicleSnapshot) {
        if self.last_error.is_some() {
            return;
        }
        let rows = self.rows_for(snapshot);
        let result = self.writer.write_rows(&rows);
        if result.is_ok() {
            self.rows_written += rows.len() as u64;
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
        debug!(final_tick = final_tick.0, rows = self.rows_written, "output finished");
    }

    fn halted(&self) -> bool {
        self.last_error.is_some()
    }
}
