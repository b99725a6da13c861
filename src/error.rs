use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Every cell is covered by the snake, so there is nowhere to put food.
    #[error("no empty cell left for food")]
    ExhaustedGrid,

    #[error("terminal size {actual:?} is smaller than the playfield {needed:?} (columns, rows)")]
    TerminalTooSmall { needed: (u16, u16), actual: (u16, u16) },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("cannot read config file {}: {source}", .path.display())]
    ConfigFile { path: PathBuf, source: io::Error },

    #[error("cannot parse config file {}: {source}", .path.display())]
    ConfigParse { path: PathBuf, source: toml::de::Error },
}

pub type Result<T> = std::result::Result<T, GameError>;
