//! Error types for the scrim scratch allocator.
//!
//! Only configuration problems are representable as error values.
//! Allocation exhaustion is fatal (`std::alloc::handle_alloc_error`)
//! and stack-discipline misuse is a debug-build assertion, so neither
//! appears here.

use std::error::Error;
use std::fmt;

/// Errors from reading or validating the process-wide configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured stack capacity is unusable.
    InvalidCapacity {
        /// The offending value, as supplied (e.g. the raw environment string).
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// The thread-local registry was initialised more than once.
    ///
    /// The registry's configuration is read exactly once; a second
    /// `init` call would silently diverge from the stacks already
    /// handed out, so it is rejected instead.
    AlreadyInitialized,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity { value, reason } => {
                write!(f, "invalid stack capacity '{value}': {reason}")
            }
            Self::AlreadyInitialized => {
                write!(f, "thread-local registry already initialised")
            }
        }
    }
}

impl Error for ConfigError {}
