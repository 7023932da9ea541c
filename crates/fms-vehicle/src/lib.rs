//! `fms-vehicle`: the per-tick vehicle and driver-duty state machine.
//!
//! # Tick pipeline
//!
//! ```text
//! step(state, params, rng):
//!   ① cycle_count += 1
//!   ② PhaseController     driving ↔ resting, durations, speed profile
//!   ③ SpeedModel          cruise / transition / deceleration, engine rpm,
//!                         parking brake
//!   ④ ResourceModel       fuel, AdBlue, odometer, engine hours,
//!                         temperature, weight, cards
//!   ⑤ GeoTracker          heading and position
//!   ⑥ DriverScheduler     breaks, role reconciliation, swaps
//!   ⑦ PhaseController     pull over when both drivers are on break
//! ```
//!
//! Each component reads what the previous ones wrote during the same tick.
//! All randomness flows through one [`RandomSource`][fms_core::RandomSource]
//! in a fixed draw order, so a recorded draw sequence replays bit-identically.
//!
//! # Modules
//!
//! | Module         | Contents                                             |
//! |----------------|------------------------------------------------------|
//! | [`params`]     | `VehicleParams` and per-component parameter groups   |
//! | [`state`]      | `VehicleState`, `WorkingState`, `DriverDuty`, cities |
//! | [`phase`]      | `PhaseController`, rest/resume triggers              |
//! | [`speed`]      | `SpeedModel`                                         |
//! | [`resources`]  | `ResourceModel`                                      |
//! | [`tracker`]    | `GeoTracker`                                         |
//! | [`duty`]       | `DriverScheduler`, `DutyRule`, `DriverSwap`          |
//! | [`step`]       | `step`, `TickReport`                                 |
//! | [`snapshot`]   | `VehicleSnapshot`, `FieldValue`                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Serde derives on params, state, and snapshots.             |

pub mod duty;
pub mod params;
pub mod phase;
pub mod resources;
pub mod snapshot;
pub mod speed;
pub mod state;
pub mod step;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use duty::{DriverScheduler, DriverSwap, DutyRule};
pub use params::{
    Bounds, DutyParams, GeoParams, InitParams, PhaseParams, ResourceParams, SpeedParams,
    TickRange, VehicleParams,
};
pub use phase::{PhaseController, PhaseTransition, RestTrigger, ResumeTrigger};
pub use resources::ResourceModel;
pub use snapshot::{FieldValue, VehicleSnapshot};
pub use speed::{SpeedChange, SpeedModel};
pub use state::{DriverDuty, DriverSlot, Phase, VehicleState, WorkingState};
pub use step::{TickReport, step, step_in_place};
pub use tracker::GeoTracker;
