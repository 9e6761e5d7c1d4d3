//! Session errors

use neurorisk_core::{ConfigError, PipelineError};
use neurorisk_store::StoreError;
use thiserror::Error;

use crate::frame::FrameError;

/// Errors surfaced by a [`Session`](crate::Session)
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("pipeline rejected input: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),

    #[error("bad frame: {0}")]
    Frame(#[from] FrameError),

    #[error("configuration could not be parsed: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
