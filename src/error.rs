//! Error types for lazytext.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for lazytext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for lazytext operations.
///
/// Load failures never surface here: they are recorded in the buffer's
/// load state and reported through [`emit_log`](crate::emit_log) instead.
#[derive(Debug)]
pub enum Error {
    /// I/O error while flushing or inspecting the source file.
    Io(io::Error),
    /// The file source does not exist.
    NotFound(PathBuf),
    /// The file source exists but is not a regular file.
    NotAFile(PathBuf),
    /// No encoding is known under the given label.
    UnknownEncoding(String),
    /// Character index outside `0..len`.
    IndexOutOfBounds { index: usize, len: usize },
    /// Range whose end precedes its start.
    InvalidRange { start: usize, end: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::NotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::NotAFile(path) => write!(f, "not a regular file: {}", path.display()),
            Self::UnknownEncoding(label) => write!(f, "unknown encoding label: {label:?}"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::InvalidRange { start, end } => {
                write!(f, "invalid range: end {end} is before start {start}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
