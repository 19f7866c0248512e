use thiserror::Error;

/// Errors the core reports synchronously, before any state change.
///
/// Fetch failures are deliberately absent: they are observable state
/// (`WeatherService::last_error`), not error returns.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The refresh target is empty or does not resolve to a known city.
    #[error("invalid refresh target: {reason}")]
    InvalidTarget { reason: String },

    /// A strict list accessor was called with an index past the end.
    #[error("index {index} is out of range for a list of {len} entries")]
    OutOfRange { index: usize, len: usize },
}
