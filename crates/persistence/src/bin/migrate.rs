#![deny(warnings)]

use persistence::{default_sqlite_url, ensure_parent_dir, init_db, load_catalog, seed_catalog};
use sim_core::Catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| default_sqlite_url().to_string());
    ensure_parent_dir(&url).await?;
    let pool = init_db(&url).await?;
    // seed only an empty store so edited rows survive a re-run
    if load_catalog(&pool).await?.is_empty() {
        seed_catalog(&pool, &Catalog::with_defaults()).await?;
    }
    let catalog = load_catalog(&pool).await?;
    println!(
        "DB migrated at {} | crops: {} | animals: {}",
        url,
        catalog.crops().count(),
        catalog.animals().count()
    );
    Ok(())
}
