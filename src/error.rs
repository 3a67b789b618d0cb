//! Error types and result alias for roofwatt.
//!
//! This module defines the core error type [`RoofwattError`] and the [`Result`] type alias
//! used throughout the crate. All public APIs that can fail return `Result<T>` for
//! consistent error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoofwattError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RoofwattError>;
