//! Error types for the one boundary where externally supplied integers
//! (e.g. an opponent's announced move) enter the system.

/// Failure to decode an integer move ID into a [`crate::mv::Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The ID was not in `[0, 96)`.
    OutOfRange(i32),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::OutOfRange(id) => write!(f, "move id {id} is out of range [0, 96)"),
        }
    }
}

impl std::error::Error for DecodeError {}
