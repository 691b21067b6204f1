//! Scenario tests for loading, editing and flushing text buffers.
//!
//! Each test works on a real temporary file or an in-memory stream and
//! checks the observable behavior end to end.

use lazytext::encoding_rs::{SHIFT_JIS, UTF_8, UTF_16LE, WINDOWS_1252};
use lazytext::{Error, LoadOptions, LoadState, TextBuffer};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Once;
use tempfile::NamedTempFile;

fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

// ============================================================================
// Loading
// ============================================================================

mod loading {
    use super::*;

    #[test]
    fn ascii_file_utf8() {
        setup_test_logging();
        let file = temp_file(b"hello world");
        let buffer = TextBuffer::open(file.path()).unwrap();

        assert_eq!(buffer.len(), 11);
        assert_eq!(buffer.char_at(0).unwrap(), 'h');
        assert_eq!(buffer.sub_sequence(6, 11).unwrap().as_deref(), Some("world"));
        assert_eq!(buffer.path(), Some(file.path()));
    }

    #[test]
    fn invalid_utf8_stream_substitutes() {
        setup_test_logging();
        let buffer = TextBuffer::from_reader(&[0xFFu8][..], UTF_8);

        assert_eq!(buffer.load_state(), LoadState::Succeeded);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.char_at(0).unwrap(), char::REPLACEMENT_CHARACTER);
    }

    #[test]
    fn missing_file_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        let result = TextBuffer::open(&missing);
        assert!(matches!(result, Err(Error::NotFound(path)) if path == missing));
    }

    #[test]
    fn directory_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let result = TextBuffer::open(dir.path());
        assert!(matches!(result, Err(Error::NotAFile(_))));
    }

    #[test]
    fn empty_file() {
        let file = temp_file(b"");
        let buffer = TextBuffer::open(file.path()).unwrap();
        assert!(buffer.is_ready());
        assert!(buffer.is_empty());
        assert_eq!(buffer.contents().as_deref(), Some(""));
        assert_eq!(buffer.content_hash(), 0);
    }

    #[test]
    fn multibyte_sequences_across_chunks() {
        let text = "ünïcödé ✓ 日本語 🎉".repeat(200);
        let file = temp_file(text.as_bytes());
        let options = LoadOptions::default().with_chunk_size(7);
        let buffer = TextBuffer::open_with_options(file.path(), options).unwrap();

        assert_eq!(buffer.len(), text.chars().count());
        assert_eq!(buffer, text);
        assert!(!buffer.load_stats().unwrap().substituted);
    }

    #[test]
    fn larger_than_initial_capacity() {
        // Stream sources start at 1024 chars; force several reallocations.
        let text: String = ('a'..='z').cycle().take(50_000).collect();
        let buffer = TextBuffer::from_reader(text.as_bytes(), UTF_8);
        assert_eq!(buffer.len(), 50_000);
        assert_eq!(buffer.contents().unwrap(), text);
    }

    #[test]
    fn windows_1252_file() {
        let file = temp_file(b"na\xEFve caf\xE9 \x80");
        let buffer = TextBuffer::open_with_encoding(file.path(), WINDOWS_1252).unwrap();
        assert_eq!(buffer, "naïve café €");
    }

    #[test]
    fn shift_jis_label() {
        let file = temp_file(b"\x93\xfa\x96\x7b");
        let buffer = TextBuffer::open_with_label(file.path(), "shift_jis").unwrap();
        assert_eq!(buffer.encoding(), SHIFT_JIS);
        assert_eq!(buffer, "日本");
    }

    #[test]
    fn utf8_bom_is_kept() {
        let file = temp_file(b"\xEF\xBB\xBFhi");
        let buffer = TextBuffer::open(file.path()).unwrap();
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.char_at(0).unwrap(), '\u{FEFF}');
    }
}

// ============================================================================
// Editing
// ============================================================================

mod editing {
    use super::*;

    #[test]
    fn replace_grows() {
        let buffer = TextBuffer::from_reader(&b"hello world"[..], UTF_8);
        buffer.replace(6, 11, "there!!").unwrap();

        assert_eq!(buffer.len(), 13);
        assert_eq!(buffer.to_string(), "hello there!!");
    }

    #[test]
    fn replace_shrinks() {
        let buffer = TextBuffer::from_reader(&b"hello cruel world"[..], UTF_8);
        buffer.replace(5, 11, "").unwrap();
        assert_eq!(buffer, "hello world");
    }

    #[test]
    fn replace_same_length() {
        let buffer = TextBuffer::from_reader(&b"hello world"[..], UTF_8);
        buffer.replace(0, 5, "HOWDY").unwrap();
        assert_eq!(buffer, "HOWDY world");
        assert_eq!(buffer.len(), 11);
    }

    #[test]
    fn replace_at_boundaries() {
        let buffer = TextBuffer::from_reader(&b"middle"[..], UTF_8);
        buffer.replace(0, 0, "<").unwrap();
        let end = buffer.len();
        buffer.replace(end, end, ">").unwrap();
        assert_eq!(buffer, "<middle>");
    }

    #[test]
    fn replace_with_wide_chars() {
        let buffer = TextBuffer::from_reader("a-b".as_bytes(), UTF_8);
        buffer.replace(1, 2, "🎉🎉").unwrap();
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.char_at(2).unwrap(), '🎉');
        assert_eq!(buffer, "a🎉🎉b");
    }

    #[test]
    fn many_appends_preserve_prefix() {
        let buffer = TextBuffer::from_reader(&b"start:"[..], UTF_8);
        let mut expected = String::from("start:");
        for i in 0..500 {
            let piece = format!("{i},");
            let end = buffer.len();
            buffer.replace(end, end, &piece).unwrap();
            expected.push_str(&piece);
        }
        assert_eq!(buffer, expected);
    }

    #[test]
    fn usage_errors_are_reported() {
        let buffer = TextBuffer::from_reader(&b"abc"[..], UTF_8);
        assert!(matches!(buffer.char_at(10), Err(Error::IndexOutOfBounds { .. })));
        assert!(matches!(buffer.sub_sequence(3, 2), Err(Error::InvalidRange { .. })));
        assert!(matches!(buffer.replace(1, 0, ""), Err(Error::InvalidRange { .. })));
        assert_eq!(buffer, "abc");
    }

    #[test]
    fn error_messages() {
        let buffer = TextBuffer::from_reader(&b"hello world"[..], UTF_8);

        insta::assert_snapshot!(
            buffer.char_at(11).unwrap_err().to_string(),
            @"index 11 out of bounds for length 11"
        );
        insta::assert_snapshot!(
            buffer.sub_sequence(2, 1).unwrap_err().to_string(),
            @"invalid range: end 1 is before start 2"
        );
        insta::assert_snapshot!(
            TextBuffer::open_with_label("unused.txt", "bogus").unwrap_err().to_string(),
            @r#"unknown encoding label: "bogus""#
        );
    }
}

// ============================================================================
// Flushing
// ============================================================================

mod flushing {
    use super::*;

    fn reload(path: &Path, options: LoadOptions) -> TextBuffer {
        TextBuffer::open_with_options(path, options).expect("reload")
    }

    #[test]
    fn flush_then_reload_is_equal() {
        let file = temp_file(b"hello world");
        let buffer = TextBuffer::open(file.path()).unwrap();
        buffer.replace(6, 11, "there!!").unwrap();
        buffer.flush().unwrap();

        let reloaded = reload(file.path(), LoadOptions::default());
        assert_eq!(buffer, reloaded);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "hello there!!");
    }

    #[test]
    fn flush_truncates_longer_file() {
        let file = temp_file(b"a much longer original text");
        let buffer = TextBuffer::open(file.path()).unwrap();
        let len = buffer.len();
        buffer.replace(0, len, "short").unwrap();
        buffer.flush().unwrap();
        assert_eq!(fs::read(file.path()).unwrap(), b"short");
    }

    #[test]
    fn flush_utf16le_with_bom_roundtrip() {
        let original = b"\xFF\xFEh\0i\0";
        let file = temp_file(original);
        let options = LoadOptions::new(UTF_16LE);
        let buffer = reload(file.path(), options);
        assert_eq!(buffer, "\u{FEFF}hi");

        buffer.flush().unwrap();
        assert_eq!(fs::read(file.path()).unwrap(), original);
        assert_eq!(buffer, reload(file.path(), options));
    }

    #[test]
    fn flush_unmappable_writes_question_mark() {
        let file = temp_file(b"abc");
        let buffer = TextBuffer::open_with_encoding(file.path(), WINDOWS_1252).unwrap();
        buffer.replace(1, 2, "日").unwrap();
        buffer.flush().unwrap();
        assert_eq!(fs::read(file.path()).unwrap(), b"a?c");
    }

    #[test]
    fn flush_stream_buffer_is_noop() {
        let buffer = TextBuffer::from_reader(&b"stream"[..], UTF_8);
        buffer.replace(0, 6, "edited").unwrap();
        assert!(buffer.flush().is_ok());
    }

    #[test]
    fn flush_into_removed_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "content").unwrap();
        let buffer = TextBuffer::open(&path).unwrap();

        fs::remove_file(&path).unwrap();
        drop(dir);

        assert!(matches!(buffer.flush(), Err(Error::Io(_))));
        assert_eq!(buffer.load_state(), LoadState::Succeeded);
        assert_eq!(buffer, "content");
    }
}
