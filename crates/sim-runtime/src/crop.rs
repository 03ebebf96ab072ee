//! Crop state machine: growing, ready to harvest, regrowing, dead.

use crate::{DeathCause, FarmError, Transition};
use serde::Serialize;
use sim_core::CropKindSpec;
use sim_econ::crop_yield_value;
use std::fmt;
use tracing::debug;

/// Display stage of a crop, in label priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CropStage {
    Dead,
    /// Bought today, not yet grown a day.
    Planted,
    Harvest,
    Growing,
}

impl fmt::Display for CropStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CropStage::Dead => "Dead",
            CropStage::Planted => "Planted",
            CropStage::Harvest => "Harvest",
            CropStage::Growing => "Growing",
        };
        f.write_str(s)
    }
}

/// A planted crop on one tile.
///
/// Quality starts at 1.0 and gains `1 / days_to_grow` for every day the crop
/// went into the night watered. It is kept as a count of watered days so the
/// yield is an exact fraction.
#[derive(Clone, Debug, PartialEq)]
pub struct Crop {
    spec: CropKindSpec,
    days_grown: u32,
    watered_days: u32,
    dead: bool,
    watered: bool,
    harvest_ready: bool,
    last_yield_value: i64,
    times_harvested: u32,
}

impl Crop {
    pub fn new(spec: &CropKindSpec) -> Self {
        Self {
            spec: spec.clone(),
            days_grown: 0,
            watered_days: 0,
            dead: false,
            watered: false,
            harvest_ready: false,
            last_yield_value: 0,
            times_harvested: 0,
        }
    }

    pub fn kind(&self) -> &str {
        &self.spec.kind
    }

    pub fn spec(&self) -> &CropKindSpec {
        &self.spec
    }

    pub fn quality(&self) -> f64 {
        1.0 + f64::from(self.watered_days) / f64::from(self.spec.days_to_grow)
    }

    pub fn days_grown(&self) -> u32 {
        self.days_grown
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_watered(&self) -> bool {
        self.watered
    }

    pub fn is_harvest_ready(&self) -> bool {
        self.harvest_ready
    }

    pub fn last_yield_value(&self) -> i64 {
        self.last_yield_value
    }

    pub fn times_harvested(&self) -> u32 {
        self.times_harvested
    }

    pub fn stage(&self) -> CropStage {
        if self.dead {
            CropStage::Dead
        } else if self.days_grown == 0 {
            CropStage::Planted
        } else if self.harvest_ready {
            CropStage::Harvest
        } else {
            CropStage::Growing
        }
    }

    /// Mark the crop watered for tonight. Repeat calls within a day do nothing.
    pub fn water(&mut self) {
        if !self.dead {
            self.watered = true;
        }
    }

    /// Grow one day. A crop already at full growth withers instead.
    pub fn advance_day(&mut self) -> Transition {
        if self.dead {
            return Transition::Unchanged;
        }
        if self.days_grown >= self.spec.days_to_grow {
            self.dead = true;
            self.harvest_ready = false;
            debug!(kind = %self.spec.kind, "crop withered unharvested");
            return Transition::Died(DeathCause::Withered);
        }
        let mut transition = Transition::Unchanged;
        self.days_grown += 1;
        if self.days_grown == self.spec.days_to_grow {
            self.harvest_ready = true;
            transition = Transition::BecameReady;
        }
        if self.watered {
            self.watered_days += 1;
            self.watered = false;
        }
        transition
    }

    /// Harvest the crop, returning the yield value. A crop with harvests left
    /// restarts at day one; otherwise it is spent and dies.
    pub fn harvest(&mut self) -> Result<i64, FarmError> {
        if !self.harvest_ready {
            return Err(FarmError::PreconditionNotMet(format!(
                "{} is not ready to harvest",
                self.spec.kind
            )));
        }
        self.times_harvested += 1;
        let value = crop_yield_value(
            self.spec.yield_count,
            self.spec.base_value,
            self.spec.days_to_grow,
            self.watered_days,
        );
        self.last_yield_value = value;
        self.harvest_ready = false;
        if self.times_harvested < self.spec.regrow_cycles {
            self.days_grown = 1;
        } else {
            self.dead = true;
        }
        debug!(
            kind = %self.spec.kind,
            value,
            times = self.times_harvested,
            spent = self.dead,
            "crop harvested"
        );
        Ok(value)
    }
}
