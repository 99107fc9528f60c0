//! # AppError
//!
//! Centralized error handling for the board service.
//!
//! Missing threads/replies and wrong passwords are *not* errors here: they are
//! ordinary results and live in `outcome::Outcome`. What remains are the ways a
//! request can genuinely fail.

use thiserror::Error;

/// The primary error type for all ab-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation failure (e.g., empty text or missing delete password)
    #[error("validation error: {0}")]
    Validation(String),

    /// Infrastructure failure (e.g., store unreachable, query error)
    #[error("internal service error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// A specialized Result type for board service logic.
pub type Result<T> = std::result::Result<T, AppError>;
