//! Lazily-loaded character storage.
//!
//! Key types:
//!
//! - [`TextBuffer`]: the public buffer (read, replace, flush, equality, hash)
//! - [`LoadState`]: outcome of the one-shot load every operation waits on
//! - [`LoadStats`]: what a successful load read and decoded
//!
//! # Examples
//!
//! ```
//! use lazytext::{LoadState, TextBuffer};
//! use lazytext::encoding_rs::UTF_8;
//!
//! let buffer = TextBuffer::from_reader(&b"caf\xC3\xA9"[..], UTF_8);
//! assert_eq!(buffer.load_state(), LoadState::Succeeded);
//! assert_eq!(buffer.len(), 4);
//! assert_eq!(buffer.sub_sequence(2, 4)?.as_deref(), Some("fé"));
//! # Ok::<(), lazytext::Error>(())
//! ```

mod buffer;
mod chars;
mod gate;
mod loader;

pub use buffer::{NOT_LOADED, TextBuffer};
pub use chars::polynomial_hash;
pub use gate::LoadState;
pub use loader::LoadStats;
