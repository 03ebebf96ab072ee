#![deny(warnings)]

//! Core domain models and invariants for Farm Sim.
//!
//! This crate defines the serializable reference data used across the
//! simulation (crop kinds, animal kinds, farm configuration) with validation
//! helpers to guarantee basic invariants.

pub mod catalog;
pub mod config;

pub use catalog::{AnimalKindSpec, Catalog, CatalogError, CropKindSpec};
pub use config::{ConfigError, FarmConfig};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Broad category of something that can occupy a farm tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Planted crop.
    Crop,
    /// Herded animal.
    Animal,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Crop => f.write_str("crop"),
            Category::Animal => f.write_str("animal"),
        }
    }
}

/// Zero-based tile position on the farm grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column index (x).
    pub column: usize,
    /// Row index (y).
    pub row: usize,
}

impl TileCoord {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Kind names must be non-blank.
    #[error("kind name must not be empty")]
    EmptyKind,
    /// Crops need at least one day of growth.
    #[error("crop {0} must take at least one day to grow")]
    ZeroDaysToGrow(String),
    /// Animals need a positive lifespan.
    #[error("animal {0} must have a positive maximum age")]
    ZeroAgeMax(String),
    /// Animals need a positive production interval.
    #[error("animal {0} must take at least one day to produce")]
    ZeroDaysToProduce(String),
    /// An animal must be able to reach adulthood before dying of old age.
    #[error("animal {kind} becomes adult at {age_to_adult} but dies at {age_max}")]
    AdultAfterMaxAge {
        kind: String,
        age_to_adult: u32,
        age_max: u32,
    },
    /// Grid must have at least one row and one column.
    #[error("farm grid must be at least 1x1, got {rows}x{columns}")]
    EmptyGrid { rows: usize, columns: usize },
    /// Grid larger than [`MAX_TILES`] or too large to address.
    #[error("farm grid {rows}x{columns} exceeds {} tiles", MAX_TILES)]
    GridTooLarge { rows: usize, columns: usize },
    /// Starting cash must be non-negative.
    #[error("starting balance {0} is negative")]
    NegativeBalance(i64),
    /// Best-case harvest value of a crop does not fit a balance.
    #[error("crop {0} can yield more than a balance can hold")]
    YieldOverflow(String),
}

/// Upper bound on `rows * columns`.
pub const MAX_TILES: usize = 1 << 20;

/// Validate a crop kind.
pub fn validate_crop_spec(spec: &CropKindSpec) -> Result<(), ValidationError> {
    if spec.kind.trim().is_empty() {
        return Err(ValidationError::EmptyKind);
    }
    if spec.days_to_grow == 0 {
        return Err(ValidationError::ZeroDaysToGrow(spec.kind.clone()));
    }
    // watering every day of every cycle caps quality at 1 + harvests
    let harvests = u128::from(spec.regrow_cycles.max(1));
    let best = u128::from(spec.yield_count) * u128::from(spec.base_value) * (1 + harvests);
    if best > i64::MAX as u128 {
        return Err(ValidationError::YieldOverflow(spec.kind.clone()));
    }
    Ok(())
}

/// Validate an animal kind.
pub fn validate_animal_spec(spec: &AnimalKindSpec) -> Result<(), ValidationError> {
    if spec.kind.trim().is_empty() {
        return Err(ValidationError::EmptyKind);
    }
    if spec.age_max == 0 {
        return Err(ValidationError::ZeroAgeMax(spec.kind.clone()));
    }
    if spec.days_to_produce == 0 {
        return Err(ValidationError::ZeroDaysToProduce(spec.kind.clone()));
    }
    if spec.age_to_adult > spec.age_max {
        return Err(ValidationError::AdultAfterMaxAge {
            kind: spec.kind.clone(),
            age_to_adult: spec.age_to_adult,
            age_max: spec.age_max,
        });
    }
    Ok(())
}

/// Validate farm configuration.
pub fn validate_config(cfg: &FarmConfig) -> Result<(), ValidationError> {
    if cfg.rows == 0 || cfg.columns == 0 {
        return Err(ValidationError::EmptyGrid {
            rows: cfg.rows,
            columns: cfg.columns,
        });
    }
    match cfg.rows.checked_mul(cfg.columns) {
        Some(tiles) if tiles <= MAX_TILES => {}
        _ => {
            return Err(ValidationError::GridTooLarge {
                rows: cfg.rows,
                columns: cfg.columns,
            })
        }
    }
    if cfg.starting_balance < 0 {
        return Err(ValidationError::NegativeBalance(cfg.starting_balance));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn crop(kind: &str, days: u32) -> CropKindSpec {
        CropKindSpec {
            kind: kind.to_string(),
            price: 10,
            days_to_grow: days,
            base_value: 5,
            yield_count: 1,
            regrow_cycles: 0,
        }
    }

    fn animal(kind: &str, adult: u32, max: u32) -> AnimalKindSpec {
        AnimalKindSpec {
            kind: kind.to_string(),
            purchase_price: 100,
            age_to_adult: adult,
            age_max: max,
            days_to_produce: 1,
            base_product_value: 5,
        }
    }

    #[test]
    fn crop_needs_growth_days() {
        assert_eq!(
            validate_crop_spec(&crop("Weed", 0)),
            Err(ValidationError::ZeroDaysToGrow("Weed".into()))
        );
        assert!(validate_crop_spec(&crop("Wheat", 3)).is_ok());
    }

    #[test]
    fn blank_kind_rejected() {
        assert_eq!(validate_crop_spec(&crop("  ", 3)), Err(ValidationError::EmptyKind));
        assert_eq!(validate_animal_spec(&animal("", 1, 2)), Err(ValidationError::EmptyKind));
    }

    #[test]
    fn animal_must_reach_adulthood() {
        assert!(matches!(
            validate_animal_spec(&animal("Goat", 20, 10)),
            Err(ValidationError::AdultAfterMaxAge { .. })
        ));
        assert_eq!(
            validate_animal_spec(&animal("Goat", 0, 0)),
            Err(ValidationError::ZeroAgeMax("Goat".into()))
        );
    }

    #[test]
    fn config_grid_and_balance() {
        let mut cfg = FarmConfig::default();
        assert!(validate_config(&cfg).is_ok());
        cfg.columns = 0;
        assert!(matches!(validate_config(&cfg), Err(ValidationError::EmptyGrid { .. })));
        cfg.columns = 4;
        cfg.starting_balance = -1;
        assert_eq!(validate_config(&cfg), Err(ValidationError::NegativeBalance(-1)));
    }

    #[test]
    fn crop_value_must_fit_balance() {
        let mut huge = crop("Gold", 1);
        huge.yield_count = u32::MAX;
        huge.base_value = u32::MAX;
        assert_eq!(
            validate_crop_spec(&huge),
            Err(ValidationError::YieldOverflow("Gold".into()))
        );
        huge.base_value = 1_000;
        huge.regrow_cycles = 4;
        assert!(validate_crop_spec(&huge).is_ok());
    }

    #[test]
    fn coord_serde_and_display() {
        let c = TileCoord::new(3, 1);
        assert_eq!(c.to_string(), "(3, 1)");
        let s = serde_json::to_string(&c).unwrap();
        let back: TileCoord = serde_json::from_str(&s).unwrap();
        assert_eq!(back, c);
    }

    proptest! {
        #[test]
        fn any_positive_growth_is_valid(days in 1u32..1_000) {
            prop_assert!(validate_crop_spec(&crop("Corn", days)).is_ok());
        }

        #[test]
        fn adult_before_max_is_valid(max in 1u32..10_000, frac in 0.0f64..=1.0) {
            let adult = (max as f64 * frac).floor() as u32;
            prop_assert!(validate_animal_spec(&animal("Cow", adult, max)).is_ok());
        }
    }
}
