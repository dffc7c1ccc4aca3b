// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sparse content hash for pattern keys.
//!
//! Samples at most ~8 bytes of the input at a power-of-two stride and mixes
//! them with FNV-1a, then folds in the length. Hashing cost is independent of
//! pattern length, which keeps key construction cheap for long patterns.
//!
//! This is a pre-filter only. Distinct inputs that agree on every sampled
//! byte and on `len >> 5` collide, so callers must confirm equality.

/// FNV-1a 64-bit offset basis.
pub const FNV64_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
pub const FNV64_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Reserved value that [`sparse_hash`] never returns.
pub const INVALID_HASH: u64 = u64::MAX;

/// Substitute for a natural result equal to [`INVALID_HASH`].
pub const ALTERNATE_HASH: u64 = u64::MAX - 1;

/// Upper bound on `len / stride` before the stride stops doubling.
const MAX_SAMPLES: usize = 8;

/// Stride for a given input length: starts at 2, doubles while more than
/// [`MAX_SAMPLES`] positions would be visited.
pub fn sparse_stride(len: usize) -> usize {
    let mut stride: usize = 2;
    while len / stride > MAX_SAMPLES {
        match stride.checked_mul(2) {
            Some(next) => stride = next,
            None => break,
        }
    }
    stride
}

/// Hash `bytes` by sampling positions `stride-1, 2*stride-1, ...`.
pub fn sparse_hash(bytes: &[u8]) -> u64 {
    let len = bytes.len();
    let mut hash = FNV64_OFFSET;

    if len > 1 {
        let stride = sparse_stride(len);
        for &byte in bytes.iter().skip(stride - 1).step_by(stride) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV64_PRIME);
        }
    }

    hash ^= (len >> 5) as u64;
    avoid_sentinel(hash)
}

/// Hash the UTF-8 encoding of `text`.
pub fn sparse_hash_str(text: &str) -> u64 {
    sparse_hash(text.as_bytes())
}

/// Replace [`INVALID_HASH`] with [`ALTERNATE_HASH`].
#[inline]
pub fn avoid_sentinel(hash: u64) -> u64 {
    if hash == INVALID_HASH {
        ALTERNATE_HASH
    } else {
        hash
    }
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
