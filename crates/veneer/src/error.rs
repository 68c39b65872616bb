use thiserror::Error;

/// Errors that can occur while buffering or injecting generated CSS.
///
/// Style generation itself is deterministic and infallible; the only
/// failure modes are configuration mistakes around the injection engine.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VeneerError {
    /// Injection was requested while not buffering and no flush
    /// environment (target + scheduler) is attached to the registry.
    #[error("cannot automatically buffer without a flush environment")]
    NoInjectionEnvironment,

    /// `start_buffering` was called while a buffering pass was already
    /// active. Double-buffering is a programmer error, not recoverable.
    #[error("cannot buffer while already buffering")]
    AlreadyBuffering,
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, VeneerError>;
