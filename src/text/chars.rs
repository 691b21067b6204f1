//! Growable character array with a logical size cursor.
//!
//! The backing vector's length is the capacity; only the first `size`
//! characters are meaningful. Appends grow the backing by a factor of 1.75,
//! so a sequence of appends totalling `n` characters copies `O(n)` overall.
//! Splices that change the length reallocate to the exact new size.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Growth factor numerator/denominator: `capacity * 7 / 4`.
const GROWTH_NUMERATOR: usize = 7;
const GROWTH_DENOMINATOR: usize = 4;

/// Character storage backing a [`TextBuffer`](super::TextBuffer).
#[derive(Clone, Debug, Default)]
pub(crate) struct CharArray {
    /// Backing store. `backing.len()` is the capacity.
    backing: Vec<char>,
    /// Number of valid characters at the front of `backing`.
    size: usize,
    /// Memoized content hash, cleared on mutation.
    hash: Option<u32>,
}

impl CharArray {
    /// Create an empty array with room for `capacity` characters.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            backing: vec!['\0'; capacity],
            size: 0,
            hash: None,
        }
    }

    /// Number of valid characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Current capacity in characters.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.backing.len()
    }

    /// The valid characters.
    #[must_use]
    pub fn as_slice(&self) -> &[char] {
        &self.backing[..self.size]
    }

    /// Character at `index`, if it is below `len()`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<char> {
        self.as_slice().get(index).copied()
    }

    /// Copy `start..end` of the valid characters into a new string.
    ///
    /// Panics if the range is not within `len()`.
    #[must_use]
    pub fn slice_to_string(&self, start: usize, end: usize) -> String {
        self.as_slice()[start..end].iter().collect()
    }

    /// Grow the backing so that it holds at least `minimum` characters.
    ///
    /// The first `len()` characters keep their positions.
    pub fn ensure_capacity(&mut self, minimum: usize) {
        let capacity = self.backing.len();
        if capacity >= minimum {
            return;
        }
        let grown = capacity.saturating_mul(GROWTH_NUMERATOR) / GROWTH_DENOMINATOR;
        let new_capacity = grown.max(minimum);

        let mut backing = vec!['\0'; new_capacity];
        backing[..self.size].copy_from_slice(&self.backing[..self.size]);
        self.backing = backing;
    }

    /// Append characters at the end, growing as needed.
    pub fn extend_from_str(&mut self, text: &str) {
        let count = text.chars().count();
        if count == 0 {
            return;
        }
        let end = self.size + count;
        self.ensure_capacity(end);
        for (slot, ch) in self.backing[self.size..end].iter_mut().zip(text.chars()) {
            *slot = ch;
        }
        self.size = end;
        self.hash = None;
    }

    /// Replace `start..end` with `replacement`.
    ///
    /// Requires `start <= end <= len()`. When the length changes, the
    /// content is rebuilt into a backing of exactly the new size; otherwise
    /// the replacement is written in place.
    pub fn splice(&mut self, start: usize, end: usize, replacement: &str) {
        debug_assert!(start <= end && end <= self.size);

        let replacement: Vec<char> = replacement.chars().collect();
        let new_end = start + replacement.len();
        let new_size = self.size - (end - start) + replacement.len();

        if new_size == self.size {
            self.backing[start..end].copy_from_slice(&replacement);
        } else {
            let mut backing = Vec::with_capacity(new_size);
            backing.extend_from_slice(&self.backing[..start]);
            backing.extend_from_slice(&replacement);
            backing.extend_from_slice(&self.backing[end..self.size]);
            debug_assert_eq!(backing.len(), new_size);
            debug_assert_eq!(backing[new_end..].len(), self.size - end);
            self.backing = backing;
            self.size = new_size;
        }
        self.hash = None;
    }

    /// Polynomial hash `h = 31 * h + c` over the valid characters, memoized
    /// until the next mutation.
    pub fn content_hash(&mut self) -> u32 {
        if let Some(hash) = self.hash {
            return hash;
        }
        let hash = polynomial_hash(self.as_slice());
        self.hash = Some(hash);
        hash
    }
}

/// Lock `chars`, recovering from poisoning.
///
/// Every mutation leaves the array consistent before it can panic, so a
/// poisoned lock still guards valid content.
pub(crate) fn lock(chars: &Mutex<CharArray>) -> MutexGuard<'_, CharArray> {
    chars.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Polynomial rolling hash over `chars` with wrapping arithmetic.
#[must_use]
pub fn polynomial_hash(chars: &[char]) -> u32 {
    chars
        .iter()
        .fold(0u32, |h, &c| h.wrapping_mul(31).wrapping_add(u32::from(c)))
}
