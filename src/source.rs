//! Byte sources.
//!
//! A buffer reads its content from either a file path or a caller-provided
//! stream. Handles are released by drop, once, on every exit path.

use crate::codec::StreamDecoder;
use crate::error::{Error, Result};
use crate::options::DEFAULT_CHUNK_SIZE;
use encoding_rs::Encoding;
use std::fs;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Where a buffer's bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// A regular file, re-opened for writing on flush.
    File(PathBuf),
    /// A stream consumed during load. Cannot be flushed.
    Stream,
}

impl Source {
    /// The file path, if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stream => None,
        }
    }

    /// Whether this is a file source.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

/// Check that `path` exists and is a regular file, returning its length in
/// bytes.
pub fn ensure_regular_file(path: &Path) -> Result<u64> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(Error::Io(e)),
    };
    if !metadata.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }
    Ok(metadata.len())
}

/// Read `reader` to end in chunks of `chunk_size` bytes, handing each chunk
/// to `on_chunk`. Interrupted reads are retried.
///
/// Returns the total number of bytes read.
pub(crate) fn read_chunks<R, F>(mut reader: R, chunk_size: usize, mut on_chunk: F) -> io::Result<u64>
where
    R: Read,
    F: FnMut(&[u8]),
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        total += n as u64;
        on_chunk(&buf[..n]);
    }
}

/// Read a whole stream into a string, decoding with `encoding`.
///
/// Malformed input is replaced with `U+FFFD`; only read errors fail.
pub fn read_to_string<R: Read>(reader: R, encoding: &'static Encoding) -> io::Result<String> {
    let mut decoder = StreamDecoder::new(encoding);
    let mut text = String::new();
    read_chunks(reader, DEFAULT_CHUNK_SIZE, |chunk| {
        text.push_str(decoder.decode(chunk, false));
    })?;
    text.push_str(decoder.decode(&[], true));
    Ok(text)
}
