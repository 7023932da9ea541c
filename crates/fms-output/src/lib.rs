//! `fms-output`: signal catalog and output writers for the fms telemetry
//! simulator.
//!
//! Every tick's [`VehicleSnapshot`][fms_vehicle::VehicleSnapshot] is
//! expanded into one row per catalog signal (`field,signal,value,delay`).
//!
//! | Feature   | Backend | Output                                           |
//! |-----------|---------|--------------------------------------------------|
//! | *(none)*  | CSV     | one file, header `field,signal,value,delay`      |
//! | `sqlite`  | SQLite  | `signals` table, one transaction per tick        |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`SignalOutputObserver`], which implements `fms_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fms_output::{CsvWriter, SignalOutputObserver, SignalSet};
//!
//! let writer = CsvWriter::new(Path::new("signalsFmsRecording.csv"))?;
//! let mut obs = SignalOutputObserver::seeded(writer, SignalSet::Standard, seed);
//! let outcome = sim.run(&mut obs);
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//! outcome?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod signal;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{SignalOutputObserver, VIN_PREFIX};
pub use row::SignalRow;
pub use signal::{EXTENDED_SIGNALS, STANDARD_SIGNALS, Signal, SignalSet, SignalSource};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
