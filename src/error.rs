/// Error type shared by the config, store and terminal layers.
///
/// Movement and collection rules are total and never produce these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("level {id} is out of range (expected 1..={count})")]
    InvalidLevel { id: usize, count: usize },
    #[error("no levels configured")]
    NoLevels,
    #[error("map size {width}x{height} is invalid")]
    InvalidMapSize { width: usize, height: usize },
    #[error("spawn ({x}, {y}) lies outside the {width}x{height} map")]
    SpawnOutOfBounds { x: i32, y: i32, width: usize, height: usize },
    #[error("point_odds must be at least 1")]
    InvalidPointOdds,
    #[error("config.toml parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
