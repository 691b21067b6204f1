//! Fuzz target for splicing.
//!
//! Applies an arbitrary sequence of edits to a buffer and to a plain
//! `Vec<char>`, then checks that both agree.

#![no_main]

use arbitrary::Arbitrary;
use lazytext::TextBuffer;
use lazytext::encoding_rs::UTF_8;
use lazytext::text::polynomial_hash;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ReplaceInput {
    initial: Vec<u8>,
    edits: Vec<Edit>,
}

#[derive(Arbitrary, Debug)]
struct Edit {
    start: u16,
    end: u16,
    replacement: String,
}

fuzz_target!(|input: ReplaceInput| {
    let buffer = TextBuffer::from_reader(&input.initial[..], UTF_8);
    let mut model: Vec<char> = String::from_utf8_lossy(&input.initial).chars().collect();

    for edit in input.edits.iter().take(64) {
        let start = usize::from(edit.start);
        let end = usize::from(edit.end);
        let result = buffer.replace(start, end, &edit.replacement);

        if end < start || end > model.len() {
            assert!(result.is_err());
            continue;
        }
        assert!(result.is_ok());
        let _removed: Vec<char> = model.splice(start..end, edit.replacement.chars()).collect();
        assert_eq!(buffer.len(), model.len());
    }

    let expected: String = model.iter().collect();
    assert_eq!(buffer.contents().as_deref(), Some(expected.as_str()));
    assert_eq!(buffer.content_hash(), polynomial_hash(&model));
});
