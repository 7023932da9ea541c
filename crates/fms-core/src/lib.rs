//! `fms-core`: foundational types for the fms telemetry simulator.
//!
//! This crate is a dependency of every other `fms-*` crate.  It intentionally
//! has no `fms-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`geo`]         | `GeoPoint`, flat-earth dead reckoning, heading wrap         |
//! | [`time`]        | `Tick`, `RunConfig`                                         |
//! | [`rng`]         | `RandomSource` trait, `SimRng`, `ReplayRng`, `RecordingRng` |
//! | [`error`]       | `FmsError`, `FmsResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FmsError, FmsResult};
pub use geo::GeoPoint;
pub use rng::{RandomSource, RecordingRng, ReplayRng, SimRng};
pub use time::{RunConfig, Tick};
