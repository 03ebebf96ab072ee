use sim_core::{CatalogError, Category, TileCoord, ValidationError};
use sim_econ::EconError;
use thiserror::Error;

/// Errors returned by farm actions. None of them leave partial state behind.
#[derive(Debug, Error, PartialEq)]
pub enum FarmError {
    #[error("unknown {category} kind: {kind}")]
    UnknownKind { category: Category, kind: String },
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("tile {0} is occupied")]
    TileOccupied(TileCoord),
    #[error("tile {coord} is outside the {columns}x{rows} farm")]
    OutOfBounds {
        coord: TileCoord,
        columns: usize,
        rows: usize,
    },
    /// Action attempted out of turn, e.g. harvesting an unripe crop.
    #[error("precondition not met: {0}")]
    PreconditionNotMet(String),
    #[error("invalid farm config: {0}")]
    InvalidConfig(#[from] ValidationError),
    #[error(transparent)]
    Catalog(CatalogError),
    #[error(transparent)]
    Ledger(EconError),
}

impl From<CatalogError> for FarmError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::UnknownKind { category, kind } => FarmError::UnknownKind { category, kind },
            other => FarmError::Catalog(other),
        }
    }
}

impl From<EconError> for FarmError {
    fn from(e: EconError) -> Self {
        match e {
            EconError::InsufficientFunds { needed, available } => {
                FarmError::InsufficientFunds { needed, available }
            }
            other => FarmError::Ledger(other),
        }
    }
}
