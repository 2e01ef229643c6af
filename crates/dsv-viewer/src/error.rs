//! The viewer's error taxonomy at the CLI boundary (spec.md §7).
//!
//! Every crate's leaf error converts into one of these variants; `main`
//! prints `Display` and exits 1 on any of them reaching the top.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("{0}")]
    Generic(String),
    #[error("out of memory: {0}")]
    Memory(String),
    #[error("file error: {0}")]
    FileIo(#[from] dsv_ingest::IngestError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("display error: {0}")]
    Display(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl From<dsv_config::ConfigError> for ViewerError {
    fn from(err: dsv_config::ConfigError) -> Self {
        ViewerError::InvalidArgs(err.to_string())
    }
}

/// `-d`/`--delimiter` must be exactly one ASCII byte; anything else is a
/// programmer/user input error, not an ingest failure.
pub fn parse_delimiter_arg(raw: &str) -> Result<u8, ViewerError> {
    let mut bytes = raw.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b), None) if b.is_ascii() => Ok(b),
        _ => Err(ViewerError::InvalidArgs(format!(
            "-d/--delimiter must be exactly one ASCII character, got {raw:?}"
        ))),
    }
}

pub fn not_a_file(path: &PathBuf) -> ViewerError {
    ViewerError::InvalidArgs(format!("{} is not a file", path.display()))
}
