//! # Error Types
//!
//! This module defines error types used throughout the thermal-escpos library.

use thiserror::Error;

/// Main error type for conversion operations
#[derive(Debug, Error)]
pub enum ThermalError {
    /// Image decoding or rasterization failed (fatal for the conversion)
    #[error("Image error: {0}")]
    Image(String),

    /// Invalid command or parameter
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Malformed print-node tree or options JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
