//! Error types for the few operations that can fail.
//!
//! Nothing here is fatal to a running game: store errors are logged and the
//! run carries on, asset errors leave the handle in its fallback state.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not create data directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssetError {
    #[error("could not read sprite {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("sprite has no pixel rows")]
    Empty,
    #[error("loader thread went away before finishing")]
    Disconnected,
}
