//! Load configuration.

use encoding_rs::{Encoding, UTF_8};

/// Default number of bytes read from the source per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Initial character capacity for stream sources, whose size is unknown.
pub const DEFAULT_STREAM_CAPACITY: usize = 1024;

/// Lower bound on the initial character capacity for file sources.
pub const MIN_FILE_CAPACITY: usize = 50;

/// Options controlling how a [`TextBuffer`](crate::TextBuffer) is loaded
/// and flushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Encoding used to decode on load and encode on flush.
    pub encoding: &'static Encoding,
    /// Bytes read from the source per chunk. Zero is treated as one.
    pub chunk_size: usize,
    /// Initial character capacity when loading from a stream.
    pub stream_capacity: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            chunk_size: DEFAULT_CHUNK_SIZE,
            stream_capacity: DEFAULT_STREAM_CAPACITY,
        }
    }
}

impl LoadOptions {
    /// Default options with the given encoding.
    #[must_use]
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }

    /// Set the encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the read chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the initial capacity used for stream sources.
    #[must_use]
    pub const fn with_stream_capacity(mut self, stream_capacity: usize) -> Self {
        self.stream_capacity = stream_capacity;
        self
    }

    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}
