// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Thread-confined cache state.
//!
//! Every thread lazily gets one [`ThreadCacheState`] per process state that
//! touches it. States live in a thread-local map keyed by the owner's id and
//! are dropped when the thread exits. An owner that is torn down flips its
//! `alive` flag; stale entries are purged the next time the thread registers
//! a new state and are never handed out again.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rustc_hash::FxHashMap;

use crate::config::TierLimits;
use crate::context::ContextPool;
use crate::matcher::SharedPattern;
use crate::pattern_cache::LocalPatternCache;
use crate::pool::ResourcePool;
use crate::scratch::{ExecStack, MatchBuffer};

/// Caches owned by one thread for one process state.
#[derive(Debug)]
pub struct ThreadCacheState {
    pub patterns: LocalPatternCache<SharedPattern>,
    pub buffers: ResourcePool<MatchBuffer>,
    pub stacks: ResourcePool<ExecStack>,
    pub contexts: ContextPool,
    alive: Arc<AtomicBool>,
}

impl ThreadCacheState {
    pub fn new(limits: TierLimits, alive: Arc<AtomicBool>) -> Self {
        Self {
            patterns: LocalPatternCache::new(limits.patterns),
            buffers: ResourcePool::new(limits.match_buffers),
            stacks: ResourcePool::new(limits.stacks),
            contexts: ContextPool::new(),
            alive,
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Drop every cached pattern, buffer, stack and context.
    pub fn clear(&mut self) {
        self.patterns.clear();
        self.buffers.clear();
        self.stacks.clear();
        self.contexts.clear();
    }
}

impl Drop for ThreadCacheState {
    fn drop(&mut self) {
        tracing::trace!(
            patterns = self.patterns.len(),
            buffers = self.buffers.len(),
            stacks = self.stacks.len(),
            "releasing thread cache state"
        );
    }
}

thread_local! {
    static THREAD_STATES: RefCell<FxHashMap<u64, ThreadCacheState>> =
        RefCell::new(FxHashMap::default());
}

/// Run `f` on this thread's state for `owner`, creating it with `init`.
///
/// Returns `None` when thread-local storage is unavailable (thread exit)
/// or the registry is already borrowed further up the stack.
pub fn with_state<R>(
    owner: u64,
    init: impl FnOnce() -> ThreadCacheState,
    f: impl FnOnce(&mut ThreadCacheState) -> R,
) -> Option<R> {
    THREAD_STATES
        .try_with(|states| {
            let mut states = states.try_borrow_mut().ok()?;
            if !states.contains_key(&owner) {
                states.retain(|_, state| state.is_alive());
                states.insert(owner, init());
            }
            states.get_mut(&owner).map(f)
        })
        .ok()
        .flatten()
}

/// Run `f` on this thread's state for `owner` only if it already exists.
pub fn with_existing<R>(owner: u64, f: impl FnOnce(&mut ThreadCacheState) -> R) -> Option<R> {
    THREAD_STATES
        .try_with(|states| {
            let mut states = states.try_borrow_mut().ok()?;
            states.get_mut(&owner).map(f)
        })
        .ok()
        .flatten()
}

/// Remove this thread's state for `owner`.
pub fn remove(owner: u64) {
    let removed = THREAD_STATES
        .try_with(|states| {
            states
                .try_borrow_mut()
                .ok()
                .and_then(|mut states| states.remove(&owner))
        })
        .ok()
        .flatten();
    // Dropped outside the registry borrow.
    drop(removed);
}

/// Number of states registered on this thread.
pub fn registered() -> usize {
    THREAD_STATES
        .try_with(|states| states.try_borrow().map(|s| s.len()).unwrap_or(0))
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "thread_state_tests.rs"]
mod tests;
