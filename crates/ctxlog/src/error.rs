//! Error types for logger setup.

use thiserror::Error;

/// Errors raised while configuring logging.
///
/// Context binding itself never fails; these only surface from the
/// one-time setup paths.
#[derive(Debug, Error)]
pub enum CtxLogError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Initialization error.
    #[error("Initialization error: {0}")]
    Init(String),

    /// The process-wide standard logger was already installed or read.
    #[error("standard logger is already initialized")]
    StandardLoggerAlreadySet,
}

/// Result type for ctxlog setup operations.
pub type CtxLogResult<T> = Result<T, CtxLogError>;
