//! Error types.

/// Errors produced by this crate.
///
/// Dictionary operations themselves never fail; errors only arise when
/// converting untrusted input into the crate's types.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    /// A timestamp was NaN or infinite.
    #[error("timestamp must be a finite number of seconds, got {0}")]
    InvalidTimestamp(f64),
}

/// Convenience alias for results carrying an [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
