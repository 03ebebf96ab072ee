//! Read-only views of the farm for whatever presents it.

use crate::{AnimalStage, CropStage, Tile};
use serde::Serialize;
use std::fmt;

/// What a single tile shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "occupant", rename_all = "snake_case")]
pub enum TileView {
    Empty,
    Crop {
        kind: String,
        stage: CropStage,
        watered: bool,
    },
    Animal {
        kind: String,
        stage: AnimalStage,
        fed: bool,
        petted: bool,
    },
}

impl From<&Tile> for TileView {
    fn from(tile: &Tile) -> Self {
        match tile {
            Tile::Empty => TileView::Empty,
            Tile::Crop(c) => TileView::Crop {
                kind: c.kind().to_string(),
                stage: c.stage(),
                watered: c.is_watered(),
            },
            Tile::Animal(a) => TileView::Animal {
                kind: a.kind().to_string(),
                stage: a.stage(),
                fed: a.is_fed(),
                petted: a.is_petted(),
            },
        }
    }
}

impl fmt::Display for TileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileView::Empty => f.write_str("Soil"),
            TileView::Crop { kind, stage, watered } => {
                write!(f, "{kind} {stage}")?;
                if *watered {
                    f.write_str(" +w")?;
                }
                Ok(())
            }
            TileView::Animal {
                kind,
                stage,
                fed,
                petted,
            } => {
                write!(f, "{kind} {stage}")?;
                if *fed {
                    f.write_str(" +f")?;
                }
                if *petted {
                    f.write_str(" +p")?;
                }
                Ok(())
            }
        }
    }
}

/// Whole-farm state at one point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FarmSnapshot {
    pub day: u32,
    pub balance: i64,
    pub last_transaction_delta: i64,
    pub total_earned: u64,
    pub total_spent: u64,
    /// Tiles by row, then column.
    pub tiles: Vec<Vec<TileView>>,
}

impl FarmSnapshot {
    pub fn occupied(&self) -> usize {
        self.tiles
            .iter()
            .flatten()
            .filter(|t| **t != TileView::Empty)
            .count()
    }
}
