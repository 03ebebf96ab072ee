#![deny(warnings)]

//! Persistence layer: SQLite store for the reference catalog.

use anyhow::{Context, Result};
use sim_core::{AnimalKindSpec, Catalog, CropKindSpec};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

const MAX_CONNECTIONS: u32 = 5;

/// Returns the default SQLite URL used for local saves.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./saves/farmsim.db"
}

/// Create the parent directory of a file-backed SQLite URL.
pub async fn ensure_parent_dir(url: &str) -> Result<()> {
    if url.contains(":memory:") {
        return Ok(());
    }
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .map(|p| p.split('?').next().unwrap_or(p));
    if let Some(parent) = path.and_then(|p| Path::new(p).parent()) {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Open (creating if missing) the database at `url` and apply migrations.
pub async fn init_db(url: &str) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("parsing database url {url}"))?
        .create_if_missing(true);
    // every connection to an in-memory database opens a fresh one
    let max = if url.contains(":memory:") { 1 } else { MAX_CONNECTIONS };
    let pool = SqlitePoolOptions::new()
        .max_connections(max)
        .connect_with(opts)
        .await
        .with_context(|| format!("connecting to {url}"))?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("running migrations")?;
    info!(url, "database ready");
    Ok(pool)
}

/// Insert or replace every kind of `catalog` in one transaction.
pub async fn seed_catalog(pool: &SqlitePool, catalog: &Catalog) -> Result<()> {
    let mut tx = pool.begin().await?;
    for (position, c) in catalog.crops().enumerate() {
        sqlx::query(
            "INSERT OR REPLACE INTO crop_kinds \
             (kind, position, price, days_to_grow, base_value, yield_count, regrow_cycles) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(c.kind.as_str())
        .bind(position as i64)
        .bind(i64::from(c.price))
        .bind(i64::from(c.days_to_grow))
        .bind(i64::from(c.base_value))
        .bind(i64::from(c.yield_count))
        .bind(i64::from(c.regrow_cycles))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("storing crop kind {}", c.kind))?;
    }
    for (position, a) in catalog.animals().enumerate() {
        sqlx::query(
            "INSERT OR REPLACE INTO animal_kinds \
             (kind, position, purchase_price, age_to_adult, age_max, days_to_produce, base_product_value) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(a.kind.as_str())
        .bind(position as i64)
        .bind(i64::from(a.purchase_price))
        .bind(i64::from(a.age_to_adult))
        .bind(i64::from(a.age_max))
        .bind(i64::from(a.days_to_produce))
        .bind(i64::from(a.base_product_value))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("storing animal kind {}", a.kind))?;
    }
    tx.commit().await?;
    info!(kinds = catalog.len(), "catalog seeded");
    Ok(())
}

type KindRow = (String, i64, i64, i64, i64, i64);

fn column(kind: &str, name: &str, value: i64) -> Result<u32> {
    u32::try_from(value).with_context(|| format!("{kind}: {name} out of range ({value})"))
}

/// Read every stored kind back into a validated catalog.
pub async fn load_catalog(pool: &SqlitePool) -> Result<Catalog> {
    let crop_rows: Vec<KindRow> = sqlx::query_as(
        "SELECT kind, price, days_to_grow, base_value, yield_count, regrow_cycles \
         FROM crop_kinds ORDER BY position, kind",
    )
    .fetch_all(pool)
    .await
    .context("loading crop kinds")?;
    let animal_rows: Vec<KindRow> = sqlx::query_as(
        "SELECT kind, purchase_price, age_to_adult, age_max, days_to_produce, base_product_value \
         FROM animal_kinds ORDER BY position, kind",
    )
    .fetch_all(pool)
    .await
    .context("loading animal kinds")?;

    let crops = crop_rows
        .into_iter()
        .map(|(kind, price, grow, value, count, regrow)| -> Result<CropKindSpec> {
            Ok(CropKindSpec {
                price: column(&kind, "price", price)?,
                days_to_grow: column(&kind, "days_to_grow", grow)?,
                base_value: column(&kind, "base_value", value)?,
                yield_count: column(&kind, "yield_count", count)?,
                regrow_cycles: column(&kind, "regrow_cycles", regrow)?,
                kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let animals = animal_rows
        .into_iter()
        .map(|(kind, price, adult, max, produce, value)| -> Result<AnimalKindSpec> {
            Ok(AnimalKindSpec {
                purchase_price: column(&kind, "purchase_price", price)?,
                age_to_adult: column(&kind, "age_to_adult", adult)?,
                age_max: column(&kind, "age_max", max)?,
                days_to_produce: column(&kind, "days_to_produce", produce)?,
                base_product_value: column(&kind, "base_product_value", value)?,
                kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let catalog = Catalog::from_specs(crops, animals).context("stored catalog is invalid")?;
    info!(kinds = catalog.len(), "catalog loaded");
    Ok(catalog)
}
