//! Fuzz target for stream decoding.
//!
//! Arbitrary bytes in any of a few encodings must load without panicking
//! and agree with a one-shot decode.

#![no_main]

use lazytext::encoding_rs::{SHIFT_JIS, UTF_8, UTF_16LE, WINDOWS_1252};
use lazytext::{LoadOptions, TextBuffer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, bytes)) = data.split_first() else {
        return;
    };
    let encoding = match selector % 4 {
        0 => UTF_8,
        1 => UTF_16LE,
        2 => WINDOWS_1252,
        _ => SHIFT_JIS,
    };
    let chunk = usize::from(selector / 4).max(1);

    let buffer =
        TextBuffer::from_reader_with_options(bytes, LoadOptions::new(encoding).with_chunk_size(chunk));
    let (expected, _) = encoding.decode_without_bom_handling(bytes);

    assert!(buffer.is_ready());
    assert_eq!(buffer.len(), expected.chars().count());
    assert_eq!(buffer, &*expected);
});
