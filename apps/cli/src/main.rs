#![deny(warnings)]

//! Headless CLI: set up a farm, let the autoplayer run it, print the result.

use anyhow::{Context, Result};
use sim_ai::{run_autoplay, Autoplayer};
use sim_core::{Catalog, FarmConfig};
use sim_runtime::{Farm, FarmSnapshot};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    catalog: Option<String>,
    db: Option<String>,
    days: Option<u32>,
    seed: Option<u64>,
    json: bool,
    version: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next(),
            "--catalog" => args.catalog = it.next(),
            "--db" => args.db = it.next(),
            "--days" => args.days = it.next().and_then(|s| s.parse().ok()),
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--json" => args.json = true,
            "--version" => args.version = true,
            _ => {}
        }
    }
    args
}

fn load_catalog(args: &Args) -> Result<Catalog> {
    if let Some(path) = &args.catalog {
        return Catalog::from_yaml_file(path).with_context(|| format!("loading catalog {path}"));
    }
    if let Some(url) = &args.db {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        return rt.block_on(async {
            persistence::ensure_parent_dir(url).await?;
            let pool = persistence::init_db(url).await?;
            let mut catalog = persistence::load_catalog(&pool).await?;
            if catalog.is_empty() {
                catalog = Catalog::with_defaults();
                persistence::seed_catalog(&pool, &catalog).await?;
            }
            pool.close().await;
            Ok::<_, anyhow::Error>(catalog)
        });
    }
    Ok(Catalog::with_defaults())
}

fn print_grid(snap: &FarmSnapshot) {
    for row in &snap.tiles {
        let cells: Vec<String> = row.iter().map(|t| format!("{:<18}", t.to_string())).collect();
        println!("{}", cells.join("|"));
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    if args.version {
        println!("farmsim {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_SHA"));
        return Ok(());
    }
    info!(?args, "starting CLI");

    let mut cfg = match &args.config {
        Some(path) => {
            FarmConfig::from_yaml_file(path).with_context(|| format!("loading config {path}"))?
        }
        None => FarmConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.rng_seed = seed;
    }
    let catalog = load_catalog(&args)?;
    let days = args.days.unwrap_or(30);

    let mut farm = Farm::new(&cfg)?;
    let mut player = Autoplayer::new(catalog, cfg.rng_seed);
    let snap = run_autoplay(&mut farm, &mut player, days)?;

    println!(
        "Farm {}x{} | day: {} | balance: ${} | earned: ${} | spent: ${} | occupied: {}/{}",
        cfg.columns,
        cfg.rows,
        snap.day,
        snap.balance,
        snap.total_earned,
        snap.total_spent,
        snap.occupied(),
        cfg.tile_count()
    );
    print_grid(&snap);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
    }
    Ok(())
}
