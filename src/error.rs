//! Error types for the ivsurf library.
//!
//! Genuine failures (bad configuration, an unknown option kind, an expiry
//! label that cannot be parsed, a market-data source that cannot answer)
//! are reported as [`IvSurfError`]. An option price that simply has no
//! implied volatility is not an error; see
//! [`NotSolvable`](crate::implied::NotSolvable).

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, IvSurfError>;

/// Errors that can occur while pricing, fetching chains, or building surfaces.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IvSurfError {
    /// Input is invalid (e.g., unknown option kind, malformed expiry date,
    /// non-positive spot).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The market-data collaborator could not supply the requested data.
    #[error("data unavailable: {message}")]
    DataUnavailable { message: String },
}
