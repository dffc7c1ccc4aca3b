// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::matcher::PatternError;
use crate::strategy::CacheStrategy;

/// Matchpool error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Capacity value outside the accepted range (negative)
    #[error("cache capacity must be >= 0 or unbounded, got {value}")]
    InvalidCapacity { value: i64 },

    /// Execution stack bounds are zero or inverted
    #[error("invalid stack size limits: start={start}, max={max} (need 0 < start <= max)")]
    InvalidStackLimits { start: usize, max: usize },

    /// Strategy change attempted after the first cache operation
    #[error("cache strategy already locked to '{current}'")]
    StrategyLocked { current: CacheStrategy },

    /// Strategy name not recognized
    #[error("unsupported cache strategy '{0}' (expected 'thread-local' or 'global')")]
    UnknownStrategy(String),

    /// Configuration could not be parsed
    #[error("config error: {message}")]
    Config { message: String },

    /// Allocation failed while building pool infrastructure or scratch space
    #[error("out of memory allocating {what}")]
    OutOfMemory { what: &'static str },

    /// The matching engine failed to build or run a matcher
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Result type using matchpool Error
pub type Result<T> = std::result::Result<T, Error>;

/// Broad error classes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The external compile/create call failed; nothing was cached.
    Construction,
    /// Invalid argument or strategy-lock violation.
    Configuration,
    /// Allocation failure; the requested operation was not completed.
    OutOfMemory,
    /// A compiled matcher could not run with the scratch it was given.
    Execution,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from(self)
    }
}

impl From<&Error> for ErrorKind {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidCapacity { .. }
            | Error::InvalidStackLimits { .. }
            | Error::StrategyLocked { .. }
            | Error::UnknownStrategy(_)
            | Error::Config { .. } => ErrorKind::Configuration,
            Error::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            Error::Pattern(PatternError::InsufficientSlots { .. }) => ErrorKind::Execution,
            Error::Pattern(PatternError::InvalidRegex(_) | PatternError::InvalidPattern(_)) => {
                ErrorKind::Construction
            }
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
