//! Single-pass byte sequences for field values
//!
//! Field values travel as one-shot byte streams rather than materialized
//! arrays, so an adapter may hand out large values without buffering them.
//!
//! - `ByteSequence`: the contract (`has_next` / `next_byte`)
//! - `ByteCursor`: cursor over an owned buffer, the common case
//! - `IterSequence`: pull-based sequence over any byte iterator
//!
//! Sequences cannot be reset or cloned. Reading moves the position forward
//! and reading past the end returns `SequenceExhausted`.

use std::fmt;
use std::iter::Peekable;

use crate::error::SequenceExhausted;

/// Ordered, finite, read-once sequence of bytes
pub trait ByteSequence: Send {
    /// True iff at least one more byte remains
    fn has_next(&mut self) -> bool;

    /// Return the next byte and advance
    ///
    /// # Errors
    ///
    /// Returns `SequenceExhausted` when no bytes remain.
    fn next_byte(&mut self) -> Result<u8, SequenceExhausted>;

    /// Consume every remaining byte
    ///
    /// # Errors
    ///
    /// Returns `SequenceExhausted` if `has_next` reported a byte that
    /// `next_byte` then failed to deliver.
    fn try_drain(&mut self) -> Result<Vec<u8>, SequenceExhausted> {
        let mut out = Vec::new();
        while self.has_next() {
            out.push(self.next_byte()?);
        }
        Ok(out)
    }

    /// Consume every remaining byte, keeping what was read before any failure
    ///
    /// Only for sequences known to be well behaved, such as cursors handed
    /// out by an adapter. Untrusted input goes through `try_drain`.
    fn drain(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        while self.has_next() {
            match self.next_byte() {
                Ok(b) => out.push(b),
                Err(_) => break,
            }
        }
        out
    }
}

impl fmt::Debug for dyn ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteSequence { .. }")
    }
}

/// Cursor over an owned byte buffer
#[derive(Debug, PartialEq, Eq)]
pub struct ByteCursor {
    bytes: Vec<u8>,
    pos: usize,
}

impl ByteCursor {
    /// Create a cursor positioned at the first byte
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        ByteCursor {
            bytes: bytes.into(),
            pos: 0,
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Bytes already consumed
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl ByteSequence for ByteCursor {
    #[inline]
    fn has_next(&mut self) -> bool {
        self.pos < self.bytes.len()
    }

    #[inline]
    fn next_byte(&mut self) -> Result<u8, SequenceExhausted> {
        match self.bytes.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(b)
            }
            None => Err(SequenceExhausted { consumed: self.pos }),
        }
    }

    fn drain(&mut self) -> Vec<u8> {
        let rest = self.bytes[self.pos..].to_vec();
        self.pos = self.bytes.len();
        rest
    }
}

impl Iterator for ByteCursor {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.next_byte().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl From<Vec<u8>> for ByteCursor {
    fn from(bytes: Vec<u8>) -> Self {
        ByteCursor::new(bytes)
    }
}

impl From<&[u8]> for ByteCursor {
    fn from(bytes: &[u8]) -> Self {
        ByteCursor::new(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for ByteCursor {
    fn from(bytes: [u8; N]) -> Self {
        ByteCursor::new(bytes.to_vec())
    }
}

impl From<&str> for ByteCursor {
    fn from(s: &str) -> Self {
        ByteCursor::new(s.as_bytes().to_vec())
    }
}

/// Pull-based sequence over a byte iterator
///
/// Bytes are produced on demand; `has_next` peeks one byte ahead.
pub struct IterSequence<I: Iterator<Item = u8>> {
    inner: Peekable<I>,
    consumed: usize,
}

impl<I: Iterator<Item = u8>> IterSequence<I> {
    /// Wrap an iterator
    pub fn new(iter: I) -> Self {
        IterSequence {
            inner: iter.peekable(),
            consumed: 0,
        }
    }
}

impl<I> ByteSequence for IterSequence<I>
where
    I: Iterator<Item = u8> + Send,
{
    fn has_next(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    fn next_byte(&mut self) -> Result<u8, SequenceExhausted> {
        match self.inner.next() {
            Some(b) => {
                self.consumed += 1;
                Ok(b)
            }
            None => Err(SequenceExhausted {
                consumed: self.consumed,
            }),
        }
    }
}

impl<I: Iterator<Item = u8>> fmt::Debug for IterSequence<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterSequence")
            .field("consumed", &self.consumed)
            .finish_non_exhaustive()
    }
}
