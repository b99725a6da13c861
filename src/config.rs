use std::{fs, path::Path, time::Duration};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::geometry::Grid;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
pub const DEFAULT_INITIAL_LENGTH: i32 = 5;
/// Largest grid side accepted, in cells.
pub const MAX_GRID_SIDE: i32 = 1000;

/// Built-in rule sets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// 40x40 grid, the snake grows by 10 per food
    Classic,
    /// 20x20 grid, the snake grows by 2 per food
    Compact,
}

/// Immutable game settings handed to the orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Surface units (terminal columns) per cell.
    pub cell_width: i32,
    /// Surface units (terminal rows) per cell.
    pub cell_height: i32,
    pub initial_length: i32,
    pub tick_interval_ms: u64,
    /// Segments added per food eaten.
    pub growth: usize,
    /// Fixed RNG seed for food placement. Random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::preset(Preset::Compact)
    }
}

impl GameConfig {
    pub fn preset(preset: Preset) -> Self {
        let (side, growth) = match preset {
            Preset::Classic => (40, 10),
            Preset::Compact => (20, 2),
        };

        GameConfig {
            grid_width: side,
            grid_height: side,
            cell_width: 2,
            cell_height: 1,
            initial_length: DEFAULT_INITIAL_LENGTH,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            growth,
            seed: None,
        }
    }

    pub fn from_toml_str(src: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(src)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path)
            .map_err(|source| GameError::ConfigFile { path: path.to_owned(), source })?;
        Self::from_toml_str(&src)
            .map_err(|source| GameError::ConfigParse { path: path.to_owned(), source })
    }

    pub fn grid(&self) -> Grid {
        Grid {
            width: self.grid_width,
            height: self.grid_height,
            cell_width: self.cell_width,
            cell_height: self.cell_height,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GameError::InvalidConfiguration(msg));

        if self.grid_width <= 0 || self.grid_height <= 0 {
            return invalid(format!("grid must be at least 1x1, got {}x{}", self.grid_width, self.grid_height));
        }
        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return invalid(format!(
                "grid must be at most {}x{}, got {}x{}",
                MAX_GRID_SIDE, MAX_GRID_SIDE, self.grid_width, self.grid_height
            ));
        }
        if self.cell_width <= 0 || self.cell_height <= 0 {
            return invalid(format!("cell size must be positive, got {}x{}", self.cell_width, self.cell_height));
        }
        let surface_fits = self
            .grid()
            .surface_size()
            .map_or(false, |(w, h)| w.checked_add(2).is_some() && h.checked_add(2).is_some());
        if !surface_fits {
            return invalid(format!(
                "a {}x{} grid of {}x{} cells is too large to draw",
                self.grid_width, self.grid_height, self.cell_width, self.cell_height
            ));
        }
        if self.initial_length <= 0 {
            return invalid(format!("initial length must be at least 1, got {}", self.initial_length));
        }
        if self.initial_length > self.grid_width {
            return invalid(format!(
                "initial length {} does not fit a grid {} cells wide",
                self.initial_length, self.grid_width
            ));
        }
        if self.initial_length as usize >= self.grid().area() {
            return invalid(format!("initial length {} leaves no room for food", self.initial_length));
        }
        if self.growth > self.grid().area() {
            return invalid(format!("growth {} exceeds the {} cells of the grid", self.growth, self.grid().area()));
        }
        if self.tick_interval_ms == 0 {
            return invalid("tick interval must be at least 1 ms".to_string());
        }

        Ok(())
    }
}
