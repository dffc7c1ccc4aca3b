// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern cache capacity.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

/// Capacity of a pattern cache.
///
/// `Bounded(0)` disables caching entirely; `Unbounded` disables eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "LimitRepr")]
pub enum CacheLimit {
    Bounded(usize),
    Unbounded,
}

impl CacheLimit {
    /// Whether entries may be stored at all.
    pub fn allows_caching(self) -> bool {
        self != CacheLimit::Bounded(0)
    }

    /// The numeric bound, `None` when unbounded.
    pub fn bound(self) -> Option<usize> {
        match self {
            CacheLimit::Bounded(n) => Some(n),
            CacheLimit::Unbounded => None,
        }
    }

    /// Whether a cache holding `len` entries must evict before inserting.
    pub fn is_full(self, len: usize) -> bool {
        match self {
            CacheLimit::Bounded(n) => len >= n,
            CacheLimit::Unbounded => false,
        }
    }

    /// Whether a cache holding `len` entries is over this limit.
    pub fn is_exceeded_by(self, len: usize) -> bool {
        match self {
            CacheLimit::Bounded(n) => len > n,
            CacheLimit::Unbounded => false,
        }
    }
}

impl From<usize> for CacheLimit {
    fn from(n: usize) -> Self {
        CacheLimit::Bounded(n)
    }
}

impl From<Option<usize>> for CacheLimit {
    fn from(n: Option<usize>) -> Self {
        n.map_or(CacheLimit::Unbounded, CacheLimit::Bounded)
    }
}

impl TryFrom<i64> for CacheLimit {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .map(CacheLimit::Bounded)
            .map_err(|_| Error::InvalidCapacity { value })
    }
}

impl FromStr for CacheLimit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "none" | "unbounded" => Ok(CacheLimit::Unbounded),
            _ => {
                let value: i64 = trimmed.parse().map_err(|_| Error::Config {
                    message: format!("invalid cache limit '{}'", s),
                })?;
                CacheLimit::try_from(value)
            }
        }
    }
}

impl fmt::Display for CacheLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheLimit::Bounded(n) => write!(f, "{}", n),
            CacheLimit::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Config representation: an integer or the string "unbounded"/"none".
#[derive(Deserialize)]
#[serde(untagged)]
enum LimitRepr {
    Int(i64),
    Text(String),
}

impl TryFrom<LimitRepr> for CacheLimit {
    type Error = Error;

    fn try_from(repr: LimitRepr) -> Result<Self, Self::Error> {
        match repr {
            LimitRepr::Int(n) => CacheLimit::try_from(n),
            LimitRepr::Text(s) => s.parse(),
        }
    }
}

#[cfg(test)]
#[path = "limit_tests.rs"]
mod tests;
