use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use std::fs::File;
use std::path::{Path, PathBuf};

use snake::game::GameConfig;
use snake::modes::HumanMode;
use snake::storage::FileStore;

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// JSON game configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells along each side of the square grid [default: 20]
    #[arg(long)]
    grid_count: Option<usize>,

    /// Milliseconds between ticks [default: 100]
    #[arg(long)]
    tick_ms: Option<u64>,

    /// File the high score is kept in
    #[arg(long, default_value = "snake_scores.json")]
    store: PathBuf,

    /// Write logs to this file (the terminal belongs to the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("snake=info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialize logger")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = match cli.config.as_deref() {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(grid_count) = cli.grid_count {
        config = config.with_grid_count(grid_count);
    }
    if let Some(tick_ms) = cli.tick_ms {
        config = config.with_tick_interval(tick_ms);
    }
    config.validate().context("Invalid game configuration")?;

    let mut human_mode = HumanMode::new(config, FileStore::new(cli.store));
    human_mode.run().await?;

    Ok(())
}
