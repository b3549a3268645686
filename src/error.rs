//! Error taxonomy for the engine.
//!
//! Library calls return this typed enum; the CLI wraps it (and everything
//! else fallible) in [`anyhow::Context`] before printing and exiting.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid database format: {0}")]
    InvalidFormat(String),

    #[error("unsupported database version: {0}")]
    VersionMismatch(u32),

    #[error("out of memory: {0}")]
    OutOfMemory(String),

    #[error("invalid WAV file {path}: {reason}")]
    InvalidWav { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
