//! Error types for IPJournal.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid address format for {param}: '{value}'")]
    InvalidAddress { param: &'static str, value: String },

    #[error("Invalid mask length: {0}")]
    InvalidMask(String),

    #[error("Invalid time format for {bound}: '{value}'")]
    InvalidTime { bound: &'static str, value: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JournalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
