//! Error taxonomy for level synthesis.
//!
//! Only [`GenerationError`] ever reaches a caller of the orchestrator;
//! provider failures are absorbed by the procedural fallback, and healing
//! shortfalls surface as a report state, never as an error.

use thiserror::Error;

/// The external candidate provider failed
///
/// Always recovered locally: the orchestrator logs it and falls back to
/// the procedural generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider transport failure: {0}")]
    Transport(String),

    #[error("provider timed out after {0} ms")]
    Timeout(u64),

    #[error("candidate payload did not match the expected schema: {0}")]
    Schema(String),

    #[error("candidate grid is {got_width}x{got_height}, expected {want_width}x{want_height}")]
    Dimensions {
        got_width: usize,
        got_height: usize,
        want_width: usize,
        want_height: usize,
    },

    #[error("cell code {code} at ({x}, {y}) is not a known cell kind")]
    InvalidCell { code: u8, x: usize, y: usize },

    #[error("candidate room {index} is out of bounds or overlaps another room")]
    InvalidRoom { index: usize },

    #[error("candidate entity {index} lies outside the grid")]
    InvalidEntity { index: usize },
}

/// Rejected before any generation work begins
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid generation key: {0}")]
    InvalidKey(String),
}
