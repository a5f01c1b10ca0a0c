//! Error types for the tile mapper.
//!
//! The grid, solver, and animator never fail; errors only come from the
//! edges: reading configuration and reading or writing command logs.

use std::io;

#[derive(thiserror::Error, Debug)]
pub enum MapperError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type MapperResult<T> = Result<T, MapperError>;
