//! Lazily-loaded, mutable text buffer over a file or byte stream.
//!
//! This module provides [`TextBuffer`], a character-addressable view over
//! decoded text. The content is loaded once, on a worker thread, while the
//! constructor waits. Every operation that needs the content first passes
//! the readiness gate; a buffer whose load failed stays empty and answers
//! with fallback values instead of errors.

use crate::codec::{self, encoding_for_label};
use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use crate::options::LoadOptions;
use crate::source::{Source, ensure_regular_file};
use crate::text::chars::{CharArray, lock};
use crate::text::gate::{LoadGate, LoadState};
use crate::text::loader::{self, LoadStats};
use encoding_rs::Encoding;
use std::fmt;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread;

/// Name of the worker thread that performs the load.
const LOADER_THREAD_NAME: &str = "lazytext-load";

/// Text shown by `Display` for a buffer that did not load.
pub const NOT_LOADED: &str = "<text buffer not loaded>";

/// Mutable character sequence loaded from a file or stream.
///
/// Indices are `char` (Unicode scalar value) positions. All methods take
/// `&self`; content access is serialized by an internal lock, so a buffer
/// can be shared across threads behind an `Arc`.
///
/// # Examples
///
/// ```
/// use lazytext::TextBuffer;
/// use lazytext::encoding_rs::UTF_8;
///
/// let buffer = TextBuffer::from_reader(&b"hello world"[..], UTF_8);
/// assert_eq!(buffer.len(), 11);
/// assert_eq!(buffer.char_at(0)?, 'h');
///
/// buffer.replace(6, 11, "there!!")?;
/// assert_eq!(buffer.len(), 13);
/// assert_eq!(buffer.to_string(), "hello there!!");
/// # Ok::<(), lazytext::Error>(())
/// ```
pub struct TextBuffer {
    source: Source,
    options: LoadOptions,
    gate: LoadGate,
    content: Mutex<CharArray>,
    /// Published length; only written on load success and by `replace`.
    len: AtomicUsize,
    stats: OnceLock<LoadStats>,
}

impl TextBuffer {
    // ==================== Construction ====================

    /// Load a UTF-8 file.
    ///
    /// Fails if the path does not exist or is not a regular file. A read
    /// error during the load does not fail construction; it leaves the
    /// buffer in the [`LoadState::Failed`] state.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, LoadOptions::default())
    }

    /// Load a file with the given encoding.
    pub fn open_with_encoding(path: impl AsRef<Path>, encoding: &'static Encoding) -> Result<Self> {
        Self::open_with_options(path, LoadOptions::new(encoding))
    }

    /// Load a file with the encoding named by a WHATWG label such as
    /// `"utf-8"`, `"latin1"` or `"shift_jis"`.
    pub fn open_with_label(path: impl AsRef<Path>, label: &str) -> Result<Self> {
        let encoding = encoding_for_label(label)?;
        Self::open_with_encoding(path, encoding)
    }

    /// Load a file with custom options.
    pub fn open_with_options(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file_len = ensure_regular_file(path)?;
        let capacity = loader::initial_capacity(Some(file_len), &options);
        Ok(Self::load(
            Source::File(path.to_path_buf()),
            options,
            capacity,
            || File::open(path),
        ))
    }

    /// Load from a byte stream with the given encoding.
    ///
    /// The reader may be owned or borrowed (`&mut R`); it is dropped once
    /// the load finishes. A stream-backed buffer cannot be flushed.
    pub fn from_reader<R: Read + Send>(reader: R, encoding: &'static Encoding) -> Self {
        Self::from_reader_with_options(reader, LoadOptions::new(encoding))
    }

    /// Load from a byte stream with custom options.
    pub fn from_reader_with_options<R: Read + Send>(reader: R, options: LoadOptions) -> Self {
        let capacity = loader::initial_capacity(None, &options);
        Self::load(Source::Stream, options, capacity, move || Ok(reader))
    }

    /// Run the load on a scoped worker thread and wait for it.
    ///
    /// If the thread cannot be spawned the load runs inline. A panicking
    /// loader counts as a failed load.
    fn load<R, F>(source: Source, options: LoadOptions, capacity: usize, open: F) -> Self
    where
        R: Read,
        F: FnOnce() -> io::Result<R> + Send,
    {
        let buffer = Self {
            source,
            options,
            gate: LoadGate::new(),
            content: Mutex::new(CharArray::with_capacity(capacity)),
            len: AtomicUsize::new(0),
            stats: OnceLock::new(),
        };

        let open = Mutex::new(Some(open));
        let take_open = || open.lock().unwrap_or_else(PoisonError::into_inner).take();

        thread::scope(|scope| {
            let spawned = thread::Builder::new()
                .name(LOADER_THREAD_NAME.to_string())
                .spawn_scoped(scope, || {
                    if let Some(open) = take_open() {
                        buffer.run_load(open);
                    }
                });

            match spawned {
                Ok(handle) => {
                    if handle.join().is_err() {
                        buffer.abandon_load("loader thread panicked");
                    }
                }
                Err(e) => {
                    emit_log(
                        LogLevel::Warn,
                        &format!("could not spawn loader thread ({e}), loading inline"),
                    );
                    if let Some(open) = take_open() {
                        buffer.run_load(open);
                    }
                }
            }
        });

        // The readiness gate is the only path to the outcome.
        buffer.gate.wait();
        buffer
    }

    fn run_load<R, F>(&self, open: F)
    where
        R: Read,
        F: FnOnce() -> io::Result<R>,
    {
        let result =
            open().and_then(|reader| loader::decode_into(reader, &self.options, &self.content));

        match result {
            Ok(stats) => {
                {
                    let content = self.lock_content();
                    self.len.store(content.len(), Ordering::Release);
                }
                let _ = self.stats.set(stats);
                if stats.substituted {
                    emit_log(
                        LogLevel::Debug,
                        &format!(
                            "{}: malformed {} input replaced with U+FFFD",
                            self.describe_source(),
                            self.options.encoding.name()
                        ),
                    );
                }
                emit_log(
                    LogLevel::Debug,
                    &format!(
                        "{}: loaded {} chars from {} bytes in {:?}",
                        self.describe_source(),
                        stats.chars_decoded,
                        stats.bytes_read,
                        stats.elapsed
                    ),
                );
                self.gate.finish(true);
            }
            Err(e) => self.abandon_load(&e.to_string()),
        }
    }

    /// Mark the load failed and drop any partial content.
    fn abandon_load(&self, reason: &str) {
        *self.lock_content() = CharArray::default();
        self.len.store(0, Ordering::Release);
        if self.gate.finish(false) {
            emit_log(
                LogLevel::Error,
                &format!("{}: load failed: {reason}", self.describe_source()),
            );
        }
    }

    fn describe_source(&self) -> String {
        match &self.source {
            Source::File(path) => path.display().to_string(),
            Source::Stream => "<stream>".to_string(),
        }
    }

    fn lock_content(&self) -> MutexGuard<'_, CharArray> {
        lock(&self.content)
    }

    // ==================== Accessors ====================

    /// Wait for the load to finish; `true` if it succeeded.
    pub fn is_ready(&self) -> bool {
        self.gate.wait_ready()
    }

    /// Current load state, without waiting.
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.gate.state()
    }

    /// Statistics of the completed load, if it succeeded.
    pub fn load_stats(&self) -> Option<LoadStats> {
        if !self.is_ready() {
            return None;
        }
        self.stats.get().copied()
    }

    /// Where the content came from.
    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    /// The source file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.source.path()
    }

    /// Whether this buffer can be flushed back to a file.
    #[must_use]
    pub const fn is_file_backed(&self) -> bool {
        self.source.is_file()
    }

    /// The encoding used for load and flush.
    #[must_use]
    pub const fn encoding(&self) -> &'static Encoding {
        self.options.encoding
    }

    /// The options this buffer was loaded with.
    #[must_use]
    pub const fn options(&self) -> &LoadOptions {
        &self.options
    }

    // ==================== Reading ====================

    /// Number of characters; `0` if the load failed.
    ///
    /// Reads a published counter and does not take the content lock.
    pub fn len(&self) -> usize {
        if !self.is_ready() {
            return 0;
        }
        self.len.load(Ordering::Acquire)
    }

    /// Whether the buffer has no characters (or failed to load).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character at `index`.
    ///
    /// The index is checked against the current length before anything
    /// else, so an unloaded buffer rejects every index. `'\0'` is returned
    /// if the buffer is somehow in bounds but not ready.
    pub fn char_at(&self, index: usize) -> Result<char> {
        let len = self.len.load(Ordering::Acquire);
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        if !self.is_ready() {
            return Ok('\0');
        }
        let content = self.lock_content();
        content.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: content.len(),
        })
    }

    /// Copy of the characters in `start..end`.
    ///
    /// Returns `Ok(None)` if the buffer failed to load.
    pub fn sub_sequence(&self, start: usize, end: usize) -> Result<Option<String>> {
        if end < start {
            return Err(Error::InvalidRange { start, end });
        }
        if !self.is_ready() {
            return Ok(None);
        }
        let content = self.lock_content();
        if end > content.len() {
            return Err(Error::IndexOutOfBounds {
                index: end,
                len: content.len(),
            });
        }
        Ok(Some(content.slice_to_string(start, end)))
    }

    /// The whole content, or `None` if the buffer failed to load.
    pub fn contents(&self) -> Option<String> {
        if !self.is_ready() {
            return None;
        }
        Some(self.lock_content().as_slice().iter().collect())
    }

    fn snapshot(&self) -> Option<Vec<char>> {
        if !self.is_ready() {
            return None;
        }
        Some(self.lock_content().as_slice().to_vec())
    }

    // ==================== Editing ====================

    /// Replace the characters in `start..end` with `replacement`.
    ///
    /// The length changes by `replacement.chars().count() - (end - start)`.
    /// Does nothing if the buffer failed to load.
    pub fn replace(&self, start: usize, end: usize, replacement: &str) -> Result<()> {
        if end < start {
            return Err(Error::InvalidRange { start, end });
        }
        if !self.is_ready() {
            return Ok(());
        }
        let mut content = self.lock_content();
        if end > content.len() {
            return Err(Error::IndexOutOfBounds {
                index: end,
                len: content.len(),
            });
        }
        content.splice(start, end, replacement);
        self.len.store(content.len(), Ordering::Release);
        Ok(())
    }

    /// Write the current content to the source file, truncating it.
    ///
    /// Does nothing for stream-backed buffers or buffers that failed to
    /// load. The write is not atomic: a crash mid-write can leave the file
    /// truncated.
    pub fn flush(&self) -> Result<()> {
        let Source::File(path) = &self.source else {
            return Ok(());
        };
        if !self.is_ready() {
            return Ok(());
        }

        let content = self.lock_content();
        let text: String = content.as_slice().iter().collect();
        let bytes = codec::encode(self.options.encoding, &text);
        fs::write(path, &bytes)?;
        drop(content);

        emit_log(
            LogLevel::Debug,
            &format!("{}: flushed {} bytes", path.display(), bytes.len()),
        );
        Ok(())
    }

    // ==================== Hashing ====================

    /// Polynomial hash (`h = 31 * h + c`) of the content, memoized until the
    /// next `replace`. `0` if the buffer failed to load.
    pub fn content_hash(&self) -> u32 {
        if !self.is_ready() {
            return 0;
        }
        self.lock_content().content_hash()
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_ready() {
            return f.write_str(NOT_LOADED);
        }
        let content = self.lock_content();
        for ch in content.as_slice() {
            fmt::Write::write_char(f, *ch)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("source", &self.source)
            .field("encoding", &self.options.encoding.name())
            .field("state", &self.gate.state())
            .field("len", &self.len.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

/// Buffers are equal when both loaded and hold the same characters. A
/// buffer that failed to load is not equal to anything, itself included.
impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_ready() {
            return false;
        }
        if std::ptr::eq(self, other) {
            return true;
        }
        // Copy the other side first so two threads comparing a == b and
        // b == a never hold both locks.
        let Some(theirs) = other.snapshot() else {
            return false;
        };
        self.lock_content().as_slice() == theirs.as_slice()
    }
}

impl PartialEq<str> for TextBuffer {
    fn eq(&self, other: &str) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.lock_content()
            .as_slice()
            .iter()
            .copied()
            .eq(other.chars())
    }
}

impl PartialEq<&str> for TextBuffer {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for TextBuffer {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl Hash for TextBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.content_hash());
    }
}
