//! Common result and error types for the gatelift workspace.

/// The result type for operations that can only fail on an internal bug.
///
/// User-input problems are reported as structured elaboration errors and
/// diagnostics. `Err(InternalError)` means the elaborator or netlist broke one
/// of its own invariants (for example a flat-name index pointing at a deleted
/// net).
pub type GateliftResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in gatelift, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
