//! Typed TVmaze API failures.

use thiserror::Error;

/// Error reported by the TVmaze API itself.
///
/// Transport and decoding failures are not represented here; they surface
/// as plain `anyhow` errors with context. This type only covers the case
/// where the server answered with a non-success status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TvmazeError {
    /// Non-2xx HTTP response.
    #[error("TVmaze API error: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
}

impl TvmazeError {
    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Status { status } => *status,
        }
    }

    /// Extracts the HTTP status code from an error chain, if the chain
    /// contains a `TvmazeError`.
    #[must_use]
    pub fn status_of(err: &anyhow::Error) -> Option<u16> {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<Self>())
            .map(Self::status)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use anyhow::Context;

    use super::*;

    #[test]
    fn test_display_contains_status() {
        // Arrange
        let err = TvmazeError::Status { status: 500 };

        // Act & Assert
        assert_eq!(err.to_string(), "TVmaze API error: 500");
    }

    #[test]
    fn test_status_of_through_context() {
        // Arrange
        let result: anyhow::Result<()> =
            Err(TvmazeError::Status { status: 404 }).context("failed to fetch show 42");

        // Act
        let err = result.unwrap_err();

        // Assert
        assert_eq!(TvmazeError::status_of(&err), Some(404));
    }

    #[test]
    fn test_status_of_unrelated_error() {
        // Arrange
        let err = anyhow::anyhow!("connection refused");

        // Act & Assert
        assert_eq!(TvmazeError::status_of(&err), None);
    }
}
