// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern cache keys.
//!
//! A key is (pattern value, compile options, acceleration flag). The hash is
//! computed once with [`sparse_hash`](crate::hash::sparse_hash) and stored on
//! the key; equality always falls through to a full comparison of the
//! pattern value.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::hash::{avoid_sentinel, sparse_hash};

bitflags::bitflags! {
    /// Compile options understood by the bundled engine.
    ///
    /// Unknown bits are retained so that callers can pass through option
    /// masks from other engines; they still participate in key equality.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompileOptions: u32 {
        /// Case-insensitive matching.
        const CASELESS = 1 << 0;
        /// `^` and `$` match at line boundaries.
        const MULTILINE = 1 << 1;
        /// `.` matches newlines.
        const DOTALL = 1 << 2;
        /// Ignore whitespace and `#` comments in the pattern.
        const EXTENDED = 1 << 3;
        /// Treat the pattern as a literal string.
        const LITERAL = 1 << 4;
        /// Disable Unicode-aware classes.
        const ASCII = 1 << 5;
    }
}

/// The pattern value of a key: text or raw bytes.
///
/// Text and bytes with identical content are different patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSource {
    Text(Arc<str>),
    Bytes(Arc<[u8]>),
}

impl PatternSource {
    /// Raw bytes of the pattern (UTF-8 for text).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PatternSource::Text(s) => s.as_bytes(),
            PatternSource::Bytes(b) => b,
        }
    }

    /// Pattern length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// The pattern as text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PatternSource::Text(s) => Some(s),
            PatternSource::Bytes(b) => std::str::from_utf8(b).ok(),
        }
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, PatternSource::Bytes(_))
    }
}

impl From<&str> for PatternSource {
    fn from(s: &str) -> Self {
        PatternSource::Text(Arc::from(s))
    }
}

impl From<String> for PatternSource {
    fn from(s: String) -> Self {
        PatternSource::Text(Arc::from(s))
    }
}

impl From<&[u8]> for PatternSource {
    fn from(b: &[u8]) -> Self {
        PatternSource::Bytes(Arc::from(b))
    }
}

impl From<Vec<u8>> for PatternSource {
    fn from(b: Vec<u8>) -> Self {
        PatternSource::Bytes(Arc::from(b))
    }
}

impl fmt::Display for PatternSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSource::Text(s) => write!(f, "{:?}", s),
            PatternSource::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
        }
    }
}

/// Composite pattern cache key with a precomputed hash.
#[derive(Debug, Clone)]
pub struct PatternKey {
    pattern: PatternSource,
    options: CompileOptions,
    accelerate: bool,
    hash: u64,
}

impl PatternKey {
    /// Build a key and compute its hash.
    pub fn new(
        pattern: impl Into<PatternSource>,
        options: CompileOptions,
        accelerate: bool,
    ) -> Self {
        let pattern = pattern.into();
        let hash = key_hash(&pattern, options, accelerate);
        Self {
            pattern,
            options,
            accelerate,
            hash,
        }
    }

    pub fn pattern(&self) -> &PatternSource {
        &self.pattern
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Whether accelerated (literal fast-path) matchers may be used.
    pub fn accelerate(&self) -> bool {
        self.accelerate
    }

    /// The cached hash value.
    pub fn hash_value(&self) -> u64 {
        self.hash
    }
}

/// Combine the sparse pattern hash with options and acceleration flag.
fn key_hash(pattern: &PatternSource, options: CompileOptions, accelerate: bool) -> u64 {
    let base = sparse_hash(pattern.as_bytes());
    // Bytes sources set the top bit; equality still decides.
    let tag = u64::from(pattern.is_bytes()) << 63;
    avoid_sentinel(base ^ (u64::from(options.bits()) << 1) ^ u64::from(accelerate) ^ tag)
}

impl PartialEq for PatternKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.options == other.options
            && self.accelerate == other.accelerate
            && self.pattern == other.pattern
    }
}

impl Eq for PatternKey {}

impl Hash for PatternKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PatternKey(pattern={}, options={:#x}, accelerate={})",
            self.pattern,
            self.options.bits(),
            self.accelerate
        )
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
