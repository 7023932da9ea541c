//! `fms-sim`: tick orchestrator for the fms telemetry simulator.
//!
//! # Tick loop
//!
//! ```text
//! on_run_start(initial snapshot)
//! for tick in current..config.end_tick():
//!   ① step          fms_vehicle::step advances the state by one second
//!   ② log           phase transitions and swaps at debug, the tick at trace
//!   ③ on_tick       observer receives the rounded VehicleSnapshot
//!   ④ halted?       an observer may stop the run (SimError::Halted)
//! on_run_end(final tick)
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fms_core::RunConfig;
//! use fms_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(RunConfig::new(280, 42)).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, SnapshotLog};
pub use sim::Sim;
