//! The farm grid: tile ownership, action routing, and the end-of-day sweep.

use crate::{Animal, Crop, DeathCause, FarmError, FarmSnapshot, TileView, Transition};
use serde::Serialize;
use sim_core::{validate_config, Catalog, Category, FarmConfig, TileCoord};
use sim_econ::Ledger;
use tracing::{debug, info, warn};

/// One grid cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Tile {
    #[default]
    Empty,
    Crop(Crop),
    Animal(Animal),
}

impl Tile {
    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Tile::Empty => None,
            Tile::Crop(_) => Some(Category::Crop),
            Tile::Animal(_) => Some(Category::Animal),
        }
    }
}

/// Result of the primary action on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Interaction {
    /// Nothing left to do on this tile today.
    Nothing,
    /// A dead occupant was removed.
    Cleared,
    Watered,
    Harvested(i64),
    Fed,
    Petted,
    Collected(i64),
}

/// What the end-of-day sweep changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DayReport {
    /// Day number after the sweep.
    pub day: u32,
    pub died: Vec<(TileCoord, DeathCause)>,
    /// Tiles with a fresh harvest or product.
    pub ready: Vec<TileCoord>,
}

enum Step {
    Clear,
    Water,
    Harvest,
    Feed,
    Pet,
    Collect,
}

/// Fixed-size farm with its cash ledger and day counter.
#[derive(Clone, Debug)]
pub struct Farm {
    rows: usize,
    columns: usize,
    tiles: Vec<Tile>,
    ledger: Ledger,
    day: u32,
}

impl Farm {
    pub fn new(cfg: &FarmConfig) -> Result<Self, FarmError> {
        validate_config(cfg)?;
        Ok(Self {
            rows: cfg.rows,
            columns: cfg.columns,
            tiles: vec![Tile::Empty; cfg.tile_count()],
            ledger: Ledger::new(cfg.starting_balance),
            day: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance()
    }

    /// All coordinates, row by row.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> {
        let columns = self.columns;
        (0..self.rows * columns).map(move |i| TileCoord::new(i % columns, i / columns))
    }

    fn index(&self, coord: TileCoord) -> Result<usize, FarmError> {
        if coord.column >= self.columns || coord.row >= self.rows {
            return Err(FarmError::OutOfBounds {
                coord,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(coord.row * self.columns + coord.column)
    }

    pub fn tile(&self, coord: TileCoord) -> Result<&Tile, FarmError> {
        let idx = self.index(coord)?;
        Ok(&self.tiles[idx])
    }

    pub fn view(&self, coord: TileCoord) -> Result<TileView, FarmError> {
        self.tile(coord).map(TileView::from)
    }

    pub fn snapshot(&self) -> FarmSnapshot {
        FarmSnapshot {
            day: self.day,
            balance: self.ledger.balance(),
            last_transaction_delta: self.ledger.last_transaction_delta(),
            total_earned: self.ledger.total_earned(),
            total_spent: self.ledger.total_spent(),
            tiles: self
                .tiles
                .chunks(self.columns)
                .map(|row| row.iter().map(TileView::from).collect())
                .collect(),
        }
    }

    fn crop_mut(&mut self, coord: TileCoord) -> Result<&mut Crop, FarmError> {
        let idx = self.index(coord)?;
        match &mut self.tiles[idx] {
            Tile::Crop(c) => Ok(c),
            _ => Err(FarmError::PreconditionNotMet(format!("tile {coord} holds no crop"))),
        }
    }

    fn animal_mut(&mut self, coord: TileCoord) -> Result<&mut Animal, FarmError> {
        let idx = self.index(coord)?;
        match &mut self.tiles[idx] {
            Tile::Animal(a) => Ok(a),
            _ => Err(FarmError::PreconditionNotMet(format!("tile {coord} holds no animal"))),
        }
    }

    /// Buy a crop or animal of `kind` onto an empty tile.
    ///
    /// Every check runs before anything changes, so a failed purchase leaves
    /// the tile and the balance untouched. Returns the price paid.
    pub fn buy(
        &mut self,
        catalog: &Catalog,
        coord: TileCoord,
        kind: &str,
        category: Category,
    ) -> Result<i64, FarmError> {
        let idx = self.index(coord)?;
        let (price, tile) = match category {
            Category::Crop => {
                let spec = catalog.lookup_crop(kind)?;
                (spec.price, Tile::Crop(Crop::new(spec)))
            }
            Category::Animal => {
                let spec = catalog.lookup_animal(kind)?;
                (spec.purchase_price, Tile::Animal(Animal::new(spec)))
            }
        };
        let price = i64::from(price);
        if !self.ledger.can_afford(price) {
            warn!(%coord, kind, price, balance = self.ledger.balance(), "cannot afford");
            return Err(FarmError::InsufficientFunds {
                needed: price,
                available: self.ledger.balance(),
            });
        }
        if !self.tiles[idx].is_empty() {
            return Err(FarmError::TileOccupied(coord));
        }
        self.ledger.debit(price, &format!("bought {kind} at {coord}"))?;
        self.tiles[idx] = tile;
        Ok(price)
    }

    /// Sell a living animal, then empty the tile whatever it held.
    /// Returns the sale value when an animal was sold.
    pub fn clear_or_sell(&mut self, coord: TileCoord) -> Result<Option<i64>, FarmError> {
        let idx = self.index(coord)?;
        let sale = match &self.tiles[idx] {
            Tile::Empty => return Ok(None),
            Tile::Animal(a) if !a.is_dead() => Some((a.sell(), a.kind().to_string())),
            _ => None,
        };
        if let Some((value, kind)) = &sale {
            self.ledger.credit(*value, &format!("sold {kind} at {coord}"))?;
        }
        let previous = std::mem::take(&mut self.tiles[idx]);
        debug!(%coord, category = ?previous.category(), "tile cleared");
        Ok(sale.map(|(value, _)| value))
    }

    pub fn water(&mut self, coord: TileCoord) -> Result<(), FarmError> {
        self.crop_mut(coord)?.water();
        Ok(())
    }

    /// Harvest a ripe crop and credit its yield.
    pub fn harvest(&mut self, coord: TileCoord) -> Result<i64, FarmError> {
        let crop = self.crop_mut(coord)?;
        let value = crop.harvest()?;
        let reason = format!("harvested {} at {coord}", crop.kind());
        self.ledger.credit(value, &reason)?;
        Ok(value)
    }

    pub fn feed(&mut self, coord: TileCoord) -> Result<(), FarmError> {
        self.animal_mut(coord)?.feed();
        Ok(())
    }

    pub fn pet(&mut self, coord: TileCoord) -> Result<(), FarmError> {
        self.animal_mut(coord)?.pet();
        Ok(())
    }

    /// Collect an animal's product and credit its value.
    pub fn collect_product(&mut self, coord: TileCoord) -> Result<i64, FarmError> {
        let animal = self.animal_mut(coord)?;
        let value = animal.collect_product()?;
        let reason = format!("collected {} product at {coord}", animal.kind());
        self.ledger.credit(value, &reason)?;
        Ok(value)
    }

    /// Perform the next sensible action on an occupied tile.
    ///
    /// Crops: clear if dead, else harvest, else water. Animals: clear if dead,
    /// else collect, else feed, else pet. Empty tiles are left alone.
    pub fn interact(&mut self, coord: TileCoord) -> Result<Interaction, FarmError> {
        let step = match self.tile(coord)? {
            Tile::Empty => None,
            Tile::Crop(c) if c.is_dead() => Some(Step::Clear),
            Tile::Crop(c) if c.is_harvest_ready() => Some(Step::Harvest),
            Tile::Crop(c) if !c.is_watered() => Some(Step::Water),
            Tile::Crop(_) => None,
            Tile::Animal(a) if a.is_dead() => Some(Step::Clear),
            Tile::Animal(a) if a.is_harvest_ready() => Some(Step::Collect),
            Tile::Animal(a) if !a.is_fed() => Some(Step::Feed),
            Tile::Animal(a) if !a.is_petted() => Some(Step::Pet),
            Tile::Animal(_) => None,
        };
        let interaction = match step {
            None => Interaction::Nothing,
            Some(Step::Clear) => {
                self.clear_or_sell(coord)?;
                Interaction::Cleared
            }
            Some(Step::Water) => {
                self.water(coord)?;
                Interaction::Watered
            }
            Some(Step::Harvest) => Interaction::Harvested(self.harvest(coord)?),
            Some(Step::Feed) => {
                self.feed(coord)?;
                Interaction::Fed
            }
            Some(Step::Pet) => {
                self.pet(coord)?;
                Interaction::Petted
            }
            Some(Step::Collect) => Interaction::Collected(self.collect_product(coord)?),
        };
        Ok(interaction)
    }

    /// End the day: advance every occupied tile once. Dead occupants stay on
    /// their tiles until cleared.
    pub fn advance_day(&mut self) -> DayReport {
        self.day += 1;
        let columns = self.columns;
        let mut report = DayReport {
            day: self.day,
            ..DayReport::default()
        };
        for (idx, tile) in self.tiles.iter_mut().enumerate() {
            let coord = TileCoord::new(idx % columns, idx / columns);
            let (kind, transition) = match tile {
                Tile::Empty => continue,
                Tile::Crop(c) => (c.kind().to_string(), c.advance_day()),
                Tile::Animal(a) => (a.kind().to_string(), a.advance_day()),
            };
            match transition {
                Transition::Unchanged => {}
                Transition::BecameReady => report.ready.push(coord),
                Transition::Died(cause) => {
                    warn!(%coord, %kind, ?cause, "died");
                    report.died.push((coord, cause));
                }
            }
        }
        info!(
            day = self.day,
            balance = self.ledger.balance(),
            ready = report.ready.len(),
            died = report.died.len(),
            "day ended"
        );
        report
    }
}
