//! Load pipeline: read the source in chunks, decode, append.

use crate::codec::StreamDecoder;
use crate::options::{LoadOptions, MIN_FILE_CAPACITY};
use crate::source::read_chunks;
use crate::text::chars::{CharArray, lock};
use std::io::{self, Read};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Largest character capacity a `Vec<char>` can hold.
pub(crate) const MAX_CAPACITY: usize = isize::MAX as usize / std::mem::size_of::<char>();

/// Statistics recorded by a successful load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Bytes read from the source.
    pub bytes_read: u64,
    /// Characters decoded.
    pub chars_decoded: usize,
    /// Whether any malformed input was replaced with `U+FFFD`.
    pub substituted: bool,
    /// Wall-clock time spent reading and decoding.
    pub elapsed: Duration,
}

/// Initial character capacity for a load.
///
/// Streams have no known size and use `options.stream_capacity`. Files
/// guess one character per two bytes, clamped to
/// `MIN_FILE_CAPACITY..=MAX_CAPACITY`.
#[must_use]
pub(crate) fn initial_capacity(file_len: Option<u64>, options: &LoadOptions) -> usize {
    let Some(file_len) = file_len else {
        return options.stream_capacity;
    };
    let half = usize::try_from(file_len / 2).unwrap_or(MAX_CAPACITY);
    half.clamp(MIN_FILE_CAPACITY, MAX_CAPACITY)
}

/// Read `reader` to end, decoding into `content`.
///
/// The reader is consumed and dropped before this returns, on success or
/// error. On error `content` holds whatever was decoded so far.
pub(crate) fn decode_into<R: Read>(
    reader: R,
    options: &LoadOptions,
    content: &Mutex<CharArray>,
) -> io::Result<LoadStats> {
    let started = Instant::now();
    let mut decoder = StreamDecoder::new(options.encoding);

    let bytes_read = read_chunks(reader, options.effective_chunk_size(), |chunk| {
        let text = decoder.decode(chunk, false);
        if !text.is_empty() {
            lock(content).extend_from_str(text);
        }
    })?;

    let mut content = lock(content);
    content.extend_from_str(decoder.decode(&[], true));

    Ok(LoadStats {
        bytes_read,
        chars_decoded: content.len(),
        substituted: decoder.substituted(),
        elapsed: started.elapsed(),
    })
}
