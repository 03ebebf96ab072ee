//! Reference catalog: immutable per-kind attribute tables.
//!
//! A catalog is built once at startup (from the built-in tables, a YAML file,
//! or an external store) and then shared read-only by every entity of a
//! matching kind.

use crate::{validate_animal_spec, validate_crop_spec, Category, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Static attributes of a crop kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropKindSpec {
    /// Kind name, e.g. "Wheat".
    pub kind: String,
    /// Purchase price of a planting.
    pub price: u32,
    /// Days from planting until the first harvest.
    pub days_to_grow: u32,
    /// Value of one unit of produce at quality 1.0.
    pub base_value: u32,
    /// Units of produce per harvest.
    pub yield_count: u32,
    /// Number of harvests before the plant is spent (0 and 1 both mean one).
    #[serde(default)]
    pub regrow_cycles: u32,
}

/// Static attributes of an animal kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalKindSpec {
    /// Kind name, e.g. "Cow".
    pub kind: String,
    /// Purchase price.
    pub purchase_price: u32,
    /// Age in days at which the animal becomes an adult.
    pub age_to_adult: u32,
    /// Age in days at which the animal dies of old age.
    pub age_max: u32,
    /// Fed adult days between two products.
    pub days_to_produce: u32,
    /// Base value of one product.
    pub base_product_value: u32,
}

/// Errors raised while building or querying a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("unknown {category} kind: {kind}")]
    UnknownKind { category: Category, kind: String },
    #[error("duplicate {category} kind: {kind}")]
    Duplicate { category: Category, kind: String },
    #[error("invalid catalog entry: {0}")]
    Invalid(#[from] ValidationError),
    #[error("catalog parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e.to_string())
    }
}

/// On-disk layout of a catalog file.
#[derive(Debug, Default, Deserialize, Serialize)]
struct CatalogFile {
    #[serde(default)]
    crops: Vec<CropKindSpec>,
    #[serde(default)]
    animals: Vec<AnimalKindSpec>,
}

/// Keyed, read-only store of crop and animal kinds. Kinds keep the order
/// they were listed in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    crops: Vec<CropKindSpec>,
    animals: Vec<AnimalKindSpec>,
    crop_index: BTreeMap<String, usize>,
    animal_index: BTreeMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from spec lists, validating each entry and rejecting
    /// duplicate kind names.
    pub fn from_specs<C, A>(crops: C, animals: A) -> Result<Self, CatalogError>
    where
        C: IntoIterator<Item = CropKindSpec>,
        A: IntoIterator<Item = AnimalKindSpec>,
    {
        let mut catalog = Catalog::default();
        for spec in crops {
            validate_crop_spec(&spec)?;
            if catalog.crop_index.contains_key(&spec.kind) {
                return Err(CatalogError::Duplicate {
                    category: Category::Crop,
                    kind: spec.kind,
                });
            }
            catalog.crop_index.insert(spec.kind.clone(), catalog.crops.len());
            catalog.crops.push(spec);
        }
        for spec in animals {
            validate_animal_spec(&spec)?;
            if catalog.animal_index.contains_key(&spec.kind) {
                return Err(CatalogError::Duplicate {
                    category: Category::Animal,
                    kind: spec.kind,
                });
            }
            catalog.animal_index.insert(spec.kind.clone(), catalog.animals.len());
            catalog.animals.push(spec);
        }
        debug!(
            crops = catalog.crops.len(),
            animals = catalog.animals.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    /// The built-in tables: six crops and four animals.
    pub fn with_defaults() -> Self {
        let crops: Vec<CropKindSpec> = [
            ("Wheat", 25, 3, 40, 1, 0),
            ("Corn", 100, 6, 50, 2, 3),
            ("Melon", 120, 10, 200, 1, 0),
            ("Cabbage", 40, 4, 60, 1, 0),
            ("Strawberry", 20, 5, 5, 4, 4),
            ("Potato", 50, 6, 35, 3, 0),
        ]
        .into_iter()
        .map(|(kind, price, days, value, count, regrow)| CropKindSpec {
            kind: kind.to_string(),
            price,
            days_to_grow: days,
            base_value: value,
            yield_count: count,
            regrow_cycles: regrow,
        })
        .collect();

        let animals: Vec<AnimalKindSpec> = [
            ("Cow", 1000, 8, 250, 2, 12),
            ("Chicken", 250, 2, 100, 1, 5),
            ("Pig", 500, 5, 150, 5, 15),
            ("Sheep", 750, 10, 200, 10, 50),
        ]
        .into_iter()
        .map(|(kind, price, adult, max, produce, value)| AnimalKindSpec {
            kind: kind.to_string(),
            purchase_price: price,
            age_to_adult: adult,
            age_max: max,
            days_to_produce: produce,
            base_product_value: value,
        })
        .collect();

        Catalog {
            crop_index: crops
                .iter()
                .enumerate()
                .map(|(i, c)| (c.kind.clone(), i))
                .collect(),
            animal_index: animals
                .iter()
                .enumerate()
                .map(|(i, a)| (a.kind.clone(), i))
                .collect(),
            crops,
            animals,
        }
    }

    /// Parse a catalog from YAML text with top-level `crops` and `animals` lists.
    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_yaml::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_specs(file.crops, file.animals)
    }

    /// Load a catalog from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Render the catalog back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, CatalogError> {
        let file = CatalogFile {
            crops: self.crops.clone(),
            animals: self.animals.clone(),
        };
        serde_yaml::to_string(&file).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    pub fn lookup_crop(&self, kind: &str) -> Result<&CropKindSpec, CatalogError> {
        self.crop_index
            .get(kind)
            .and_then(|&i| self.crops.get(i))
            .ok_or_else(|| CatalogError::UnknownKind {
                category: Category::Crop,
                kind: kind.to_string(),
            })
    }

    pub fn lookup_animal(&self, kind: &str) -> Result<&AnimalKindSpec, CatalogError> {
        self.animal_index
            .get(kind)
            .and_then(|&i| self.animals.get(i))
            .ok_or_else(|| CatalogError::UnknownKind {
                category: Category::Animal,
                kind: kind.to_string(),
            })
    }

    /// Purchase price of a kind in the given category.
    pub fn price(&self, category: Category, kind: &str) -> Result<u32, CatalogError> {
        match category {
            Category::Crop => self.lookup_crop(kind).map(|s| s.price),
            Category::Animal => self.lookup_animal(kind).map(|s| s.purchase_price),
        }
    }

    /// Crop kinds in listing order.
    pub fn crops(&self) -> impl Iterator<Item = &CropKindSpec> {
        self.crops.iter()
    }

    /// Animal kinds in listing order.
    pub fn animals(&self) -> impl Iterator<Item = &AnimalKindSpec> {
        self.animals.iter()
    }

    /// Total number of kinds across both categories.
    pub fn len(&self) -> usize {
        self.crops.len() + self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty() && self.animals.is_empty()
    }
}
