//! Charset decoding and encoding.
//!
//! Decoding is streaming and substituting: malformed or unmappable input
//! becomes `U+FFFD` and never aborts a load. Partial multi-byte sequences are
//! carried across chunk boundaries. Byte-order marks are kept as `U+FEFF` so
//! that a load followed by a flush reproduces the original bytes.

use crate::error::{Error, Result};
use encoding_rs::{CoderResult, Decoder, Encoding, EncoderResult, UTF_16BE, UTF_16LE};

/// Byte written by [`encode`] for characters the encoding cannot represent.
pub const UNMAPPABLE_BYTE: u8 = b'?';

/// Look up an encoding by its WHATWG label (e.g. `"utf-8"`, `"latin1"`).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// Incremental decoder that substitutes bad input instead of failing.
pub struct StreamDecoder {
    decoder: Decoder,
    scratch: String,
    substituted: bool,
}

impl StreamDecoder {
    /// Create a decoder for `encoding`.
    #[must_use]
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder_without_bom_handling(),
            scratch: String::new(),
            substituted: false,
        }
    }

    /// Decode one chunk of input.
    ///
    /// Set `last` on the final call (an empty chunk is fine) so that a
    /// truncated trailing sequence is flushed as a replacement character.
    /// The returned text is only valid until the next call.
    pub fn decode(&mut self, bytes: &[u8], last: bool) -> &str {
        self.scratch.clear();
        let mut remaining = bytes;
        loop {
            let reserve = self
                .decoder
                .max_utf8_buffer_length(remaining.len())
                .unwrap_or(remaining.len().saturating_add(16));
            self.scratch.reserve(reserve);

            let (result, read, had_errors) =
                self.decoder
                    .decode_to_string(remaining, &mut self.scratch, last);
            self.substituted |= had_errors;
            remaining = &remaining[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => {}
            }
        }
        &self.scratch
    }

    /// Whether any input so far needed a replacement character.
    #[must_use]
    pub const fn substituted(&self) -> bool {
        self.substituted
    }
}

impl std::fmt::Debug for StreamDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDecoder")
            .field("encoding", &self.decoder.encoding().name())
            .field("substituted", &self.substituted)
            .finish_non_exhaustive()
    }
}

/// Encode `text` with `encoding`.
///
/// Characters the encoding cannot represent are written as
/// [`UNMAPPABLE_BYTE`]. UTF-16 is encoded as UTF-16 without a byte-order
/// mark (a leading `U+FEFF` in `text` is written like any other character).
#[must_use]
pub fn encode(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    if encoding == UTF_16LE {
        return text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    }
    if encoding == UTF_16BE {
        return text.encode_utf16().flat_map(u16::to_be_bytes).collect();
    }

    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut remaining = text;
    loop {
        let reserve = encoder
            .max_buffer_length_from_utf8_without_replacement(remaining.len())
            .unwrap_or(remaining.len().saturating_add(16));
        out.reserve(reserve);

        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(remaining, &mut out, true);
        remaining = &remaining[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => out.push(UNMAPPABLE_BYTE),
        }
    }
    out
}
