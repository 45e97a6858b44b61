//! Crate error type
//!
//! The simulation itself never fails; errors only come from the edges
//! (demo tags typed by a user, settings files).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown demo type '{0}'")]
    UnknownDemo(String),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
