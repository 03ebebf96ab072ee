#![deny(warnings)]

//! Simulation runtime: crop and animal state machines on a farm grid.
//!
//! A [`Farm`] owns its tiles and cash [`sim_econ::Ledger`]. Callers buy onto
//! empty tiles, act on occupants, and end the day with
//! [`Farm::advance_day`], which steps every occupied tile exactly once.

pub mod animal;
pub mod crop;
mod error;
pub mod farm;
pub mod view;

pub use animal::{Animal, AnimalStage};
pub use crop::{Crop, CropStage};
pub use error::FarmError;
pub use farm::{DayReport, Farm, Interaction, Tile};
pub use view::{FarmSnapshot, TileView};

use serde::Serialize;

/// Why an occupant died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DeathCause {
    /// Crop left unharvested past full growth.
    Withered,
    /// Three days without food.
    Starved,
    OldAge,
}

/// Outcome of one entity's end-of-day step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    /// A harvest or product became available.
    BecameReady,
    Died(DeathCause),
}

/// Advance an unattended farm by `days` and return the final snapshot.
pub fn run_days(farm: &mut Farm, days: u32) -> FarmSnapshot {
    for _ in 0..days {
        farm.advance_day();
    }
    farm.snapshot()
}
