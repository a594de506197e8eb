//! # Error Types
//!
//! This module defines error types used throughout the printy library.
//!
//! Decode and encode errors are deterministic and are never retried. Only
//! [`TransportError`] is produced after a bounded retry loop, and it carries
//! the number of attempts that were made.

use std::io;

use thiserror::Error;

/// Main error type for printy operations
#[derive(Debug, Error)]
pub enum PrintyError {
    /// The input image could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// Raster data violated a framing invariant (line length, width limits)
    #[error("Encode error: {0}")]
    Encode(String),

    /// Delivery to the printer failed after all attempts
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Neither a printer name nor a device path was given
    #[error("Invalid target: {0}")]
    Target(String),

    /// Unknown or invalid printer profile
    #[error("Profile error: {0}")]
    Profile(String),

    /// Profile file could not be parsed
    #[error("Profile JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Delivery failure after the retry policy gave up.
#[derive(Debug, Error)]
#[error("Transport failed after {attempts} attempt(s): {source}")]
pub struct TransportError {
    /// How many times the full job was submitted
    pub attempts: u32,

    /// The error from the last attempt
    #[source]
    pub source: io::Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_message() {
        let err = TransportError {
            attempts: 3,
            source: io::Error::new(io::ErrorKind::TimedOut, "printer busy"),
        };
        assert_eq!(
            err.to_string(),
            "Transport failed after 3 attempt(s): printer busy"
        );
    }

    #[test]
    fn test_transport_converts_to_printy_error() {
        let err: PrintyError = TransportError {
            attempts: 1,
            source: io::Error::other("queue rejected job"),
        }
        .into();
        assert!(matches!(err, PrintyError::Transport(TransportError { attempts: 1, .. })));
    }
}
