//! `lazytext` - lazily-loaded, mutable text buffers over files and streams
//!
//! A [`TextBuffer`] decodes a file or byte stream once, on a worker thread,
//! into a growable character array. It then supports random-access reads,
//! in-place splicing with automatic resizing, and flushing the current
//! content back to the originating file in the same encoding.
//!
//! # Example
//!
//! ```no_run
//! use lazytext::TextBuffer;
//!
//! let buffer = TextBuffer::open("notes.txt")?;
//! let end = buffer.len().min(5);
//! buffer.replace(0, end, "Hello")?;
//! buffer.flush()?;
//! # Ok::<(), lazytext::Error>(())
//! ```
//!
//! Load failures do not produce errors: the buffer records a failed
//! [`LoadState`] and reports through the log callback (see
//! [`set_log_callback`]) and `tracing`.

// Crate-level lint configuration
#![allow(clippy::module_name_repetitions)] // TextBuffer in text::buffer etc
#![allow(clippy::missing_errors_doc)] // Error cases are listed on Error
#![allow(clippy::missing_panics_doc)] // No public API panics
#![allow(clippy::must_use_candidate)] // Blocking queries are not pure
#![allow(clippy::doc_markdown)] // Allow technical names without backticks

pub mod codec;
pub mod error;
pub mod event;
pub mod options;
pub mod source;
pub mod text;

// Re-export core types at crate root
pub use error::{Error, Result};
pub use event::{LogLevel, clear_log_callback, emit_log, set_log_callback};
pub use options::LoadOptions;
pub use source::{Source, read_to_string};
pub use text::{LoadState, LoadStats, TextBuffer};

// Encodings are part of the public API.
pub use encoding_rs;
pub use encoding_rs::Encoding;
