//! Scenario runner for the combat engine.
//!
//! Loads a catalog, builds an attacker and a training dummy, and drives both at
//! a fixed timestep while every result flows into a combat log.
//! Run with: `cargo run -p combat-sim -- --status Burn --status Bleed`

mod config;
mod scenario;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use combat_content::{Catalog, CatalogLoader, ConfigLoader, ContentFactory};
use combat_core::{CombatConfig, Magnitude, StatKind};
use scenario::{Scenario, Summary};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Run a status scenario against a training dummy
#[derive(Parser)]
#[command(name = "combat-sim")]
#[command(about = "Run a status scenario against a training dummy", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory containing `catalog.ron` and `config.toml` (built-in catalog if omitted)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Catalog RON file; takes precedence over `--data-dir`
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Config TOML file; takes precedence over `--data-dir`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Status applied on every application; repeat to apply several in order
    #[arg(long = "status", default_value = "Burn")]
    statuses: Vec<String>,

    /// Seconds between applications
    #[arg(long, default_value_t = 1.0)]
    every: f32,

    /// Total simulated seconds
    #[arg(long, default_value_t = 10.0)]
    duration: f32,

    /// Base of a physical hit sent with every application, scaled by attacker power
    #[arg(long)]
    hit: Option<f32>,

    /// Attacker power stat
    #[arg(long, default_value_t = 20.0)]
    power: f32,

    /// Dummy maximum health
    #[arg(long, default_value_t = 200.0)]
    health: f32,

    /// Dummy armor
    #[arg(long, default_value_t = 0.0)]
    armor: f32,

    /// Dummy resistance
    #[arg(long, default_value_t = 0.0)]
    resistance: f32,

    /// List catalog statuses and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();
    setup_logging();

    let cli = Cli::parse();
    let (mut combat_config, catalog) = load_content(&cli)?;
    config::apply_env_overrides(&mut combat_config);

    if cli.list {
        for name in catalog.status_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let scenario = build_scenario(&cli, &catalog)?;
    tracing::info!(
        statuses = ?cli.statuses,
        every = scenario.every,
        duration = scenario.duration,
        dt = combat_config.fixed_timestep,
        "scenario configured"
    );

    let summary = scenario::run(&combat_config, catalog.interactions(), &scenario)?;
    print_summary(&summary);
    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the default `info` level.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn load_content(cli: &Cli) -> Result<(CombatConfig, Catalog)> {
    let factory = cli.data_dir.as_deref().map(ContentFactory::new);
    if let Some(factory) = &factory {
        tracing::info!(data_dir = %factory.data_dir().display(), "loading content");
    }

    let config = match (&cli.config, &factory) {
        (Some(path), _) => ConfigLoader::load(path)?,
        (None, Some(factory)) => factory.load_config()?,
        (None, None) => CombatConfig::default(),
    };

    let catalog = match (&cli.catalog, &factory) {
        (Some(path), _) => CatalogLoader::load(path)?,
        (None, Some(factory)) => factory.load_catalog()?,
        (None, None) => CatalogLoader::builtin()?,
    };

    Ok((config, catalog))
}

fn build_scenario(cli: &Cli, catalog: &Catalog) -> Result<Scenario> {
    let statuses = cli
        .statuses
        .iter()
        .map(|name| {
            catalog.status(name).map(Arc::clone).ok_or_else(|| {
                let known: Vec<&str> = catalog.status_names().collect();
                anyhow::anyhow!("Unknown status '{}' (known: {})", name, known.join(", "))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if !cli.every.is_finite() || cli.every <= 0.0 {
        anyhow::bail!("--every must be positive, got {}", cli.every);
    }

    Ok(Scenario {
        statuses,
        every: cli.every,
        duration: cli.duration.max(0.0),
        hit: cli.hit.map(|base| Magnitude::Scaled {
            base,
            stat: StatKind::Power,
            ratio: 0.5,
        }),
        attacker_power: cli.power,
        defender_health: cli.health,
        defender_armor: cli.armor,
        defender_resistance: cli.resistance,
    })
}

fn print_summary(summary: &Summary) {
    println!("frames simulated : {}", summary.frames);
    println!("results retained : {}", summary.retained);
    for (category, count) in &summary.counts {
        println!("  {category:<16}: {count}");
    }
    println!("damage dealt     : {:.1}", summary.damage_dealt);
    println!(
        "tag transitions  : {} started, {} ended",
        summary.tags_started, summary.tags_ended
    );
    println!("visuals played   : {}", summary.visuals_played);
    println!(
        "defender         : {:.1} hp{}",
        summary.defender_health,
        if summary.defender_alive { "" } else { " (defeated)" }
    );
}
