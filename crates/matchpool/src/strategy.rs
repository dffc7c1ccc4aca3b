// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cache strategy selection and locking.
//!
//! The strategy decides whether caches are confined to each thread or shared
//! by the whole process. It may be changed freely until the first cache
//! operation; after that it is locked, since swapping backing structures
//! under concurrent traffic would strand resources in the old backing.

use std::fmt;
use std::str::FromStr;

use parking_lot::Mutex;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Where cached patterns and pooled scratch objects live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum CacheStrategy {
    /// Each thread owns its caches; no locking.
    ThreadConfined,
    /// One set of caches shared by all threads, guarded by mutexes.
    Shared,
}

impl CacheStrategy {
    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            CacheStrategy::ThreadConfined => "thread-local",
            CacheStrategy::Shared => "global",
        }
    }

    /// Default strategy from the process environment.
    pub fn from_env() -> Self {
        if crate::env::shared_cache_requested() {
            CacheStrategy::Shared
        } else {
            CacheStrategy::ThreadConfined
        }
    }
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "thread-local" | "thread-confined" => Ok(CacheStrategy::ThreadConfined),
            "global" | "shared" => Ok(CacheStrategy::Shared),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

impl TryFrom<String> for CacheStrategy {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[derive(Debug)]
struct StrategyState {
    strategy: CacheStrategy,
    locked: bool,
}

/// Outcome of [`StrategyCoordinator::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyChange {
    /// Requested strategy was already active.
    Unchanged,
    /// Strategy switched from the contained previous value.
    Switched { from: CacheStrategy },
}

/// Holds the active strategy and whether it is locked.
#[derive(Debug)]
pub struct StrategyCoordinator {
    state: Mutex<StrategyState>,
}

impl StrategyCoordinator {
    pub fn new(strategy: CacheStrategy) -> Self {
        Self {
            state: Mutex::new(StrategyState {
                strategy,
                locked: false,
            }),
        }
    }

    /// Current strategy. Does not lock it.
    pub fn get(&self) -> CacheStrategy {
        self.state.lock().strategy
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }

    /// Change the strategy.
    ///
    /// Setting the active strategy always succeeds. Changing it after the
    /// lock fails with [`Error::StrategyLocked`].
    pub fn set(&self, desired: CacheStrategy) -> Result<StrategyChange> {
        let mut state = self.state.lock();
        if state.strategy == desired {
            return Ok(StrategyChange::Unchanged);
        }
        if state.locked {
            return Err(Error::StrategyLocked {
                current: state.strategy,
            });
        }
        let from = state.strategy;
        state.strategy = desired;
        tracing::debug!(%from, to = %desired, "cache strategy changed");
        Ok(StrategyChange::Switched { from })
    }

    /// Lock the strategy (first real traffic) and return it.
    pub fn lock_in(&self) -> CacheStrategy {
        let mut state = self.state.lock();
        if !state.locked {
            state.locked = true;
            tracing::debug!(strategy = %state.strategy, "cache strategy locked");
        }
        state.strategy
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
