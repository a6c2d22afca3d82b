//! Error types for udp-send-benchmark

use std::io;
use thiserror::Error;

/// Top-level application error
///
/// Transport errors inside the send loops never show up here; they are
/// converted into the shared cancellation signal instead.
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
