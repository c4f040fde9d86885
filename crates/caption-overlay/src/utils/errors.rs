//! Error types for the overlay engine
//!
//! The per-frame path never fails: bad input degrades to "no caption shown".
//! Errors are reserved for configuration, store bookkeeping and the strict
//! loaders used by hosts.

use caption_core::CoreError;
use thiserror::Error;

/// Convenience result type for overlay operations
pub type Result<T> = core::result::Result<T, OverlayError>;

/// Overlay engine error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// Viewport or resolution dimensions that cannot be used for scaling
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Offending width
        width: f32,
        /// Offending height
        height: f32,
    },

    /// Configuration value outside its usable range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation not allowed in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Snapshot store refused another subscriber
    #[error("Subscriber limit reached: {limit}")]
    SubscriberLimit {
        /// Configured maximum
        limit: usize,
    },

    /// Unsubscribe with an id the store does not know
    #[error("Unknown subscription: {0}")]
    UnknownSubscription(usize),

    /// Error from caption-core
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl OverlayError {
    /// Create a configuration error
    pub fn invalid_config<T: core::fmt::Display>(message: T) -> Self {
        Self::InvalidConfig(format!("{message}"))
    }

    /// Create a state error
    pub fn invalid_state<T: core::fmt::Display>(message: T) -> Self {
        Self::InvalidState(format!("{message}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_convert() {
        let err: OverlayError = CoreError::UnsupportedFormat("4:3".into()).into();
        assert_eq!(err.to_string(), "Core error: Unsupported output format: 4:3");
    }

    #[test]
    fn messages_include_context() {
        assert_eq!(
            OverlayError::SubscriberLimit { limit: 2 }.to_string(),
            "Subscriber limit reached: 2"
        );
        assert_eq!(
            OverlayError::InvalidDimensions { width: 0.0, height: 10.0 }.to_string(),
            "Invalid dimensions: 0x10"
        );
    }
}
