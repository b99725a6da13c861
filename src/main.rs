mod config;
mod error;
mod food;
mod game;
mod geometry;
mod render;
mod snake;
mod term;
mod window;

use std::{fs::File, path::{Path, PathBuf}, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{GameConfig, Preset};
use crate::game::{Ending, Game};
use crate::term::TermWindow;

const FRAME_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Parser, Debug)]
#[command(name = "gridsnake")]
#[command(about = "Snake on a fixed grid, in the terminal")]
struct Args {
    /// Built-in rule set to start from
    #[arg(long, value_enum, default_value = "compact")]
    preset: Preset,

    /// TOML file overriding the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<i32>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Initial snake length
    #[arg(long, allow_negative_numbers = true)]
    length: Option<i32>,

    /// Segments gained per food
    #[arg(long)]
    growth: Option<usize>,

    /// Milliseconds between snake moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Preset, then config file, then flags.
    fn game_config(&self) -> Result<GameConfig> {
        let mut cfg = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::preset(self.preset),
        };

        if let Some(width) = self.width {
            cfg.grid_width = width;
        }
        if let Some(height) = self.height {
            cfg.grid_height = height;
        }
        if let Some(length) = self.length {
            cfg.initial_length = length;
        }
        if let Some(growth) = self.growth {
            cfg.growth = growth;
        }
        if let Some(tick_ms) = self.tick_ms {
            cfg.tick_interval_ms = tick_ms;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let cfg = args.game_config().context("invalid game configuration")?;
    info!(?cfg, "configuration loaded");

    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let grid = cfg.grid();
    let mut game = Game::new(cfg, rng)?;

    let outcome = {
        let mut window = TermWindow::open(&grid, FRAME_INTERVAL).context("cannot set up the terminal")?;
        let outcome = game.run(&mut window)?;
        if outcome.ending != Ending::Closed {
            window.show_summary(&outcome)?;
        }
        outcome
    };

    println!("{} Score: {}", outcome.ending, outcome.score);
    Ok(())
}
