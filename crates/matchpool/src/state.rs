// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process-level cache state.
//!
//! [`ProcessCacheState`] owns the strategy coordinator, the shared caches and
//! the settings new thread states start from. Every operation dispatches on
//! the active strategy: thread-local traffic goes to the calling thread's
//! [`ThreadCacheState`], global traffic to the mutex-guarded shared caches.
//!
//! Pattern compilation, acquisition, release and execution lock the
//! strategy. Capacity changes, clears and introspection do not.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::config::{CacheConfig, TierLimits};
use crate::context::{ContextKind, MatchContext};
use crate::error::{Error, Result};
use crate::key::{CompileOptions, PatternKey, PatternSource};
use crate::limit::CacheLimit;
use crate::matcher::{CompiledPattern, PatternMatch, SharedPattern};
use crate::pattern_cache::{CacheStats, SharedPatternCache};
use crate::pool::SharedPool;
use crate::scratch::{ExecStack, MatchBuffer, StackLimits};
use crate::strategy::{CacheStrategy, StrategyChange, StrategyCoordinator};
use crate::thread_state::{self, ThreadCacheState};

static NEXT_STATE_ID: AtomicU64 = AtomicU64::new(1);

static GLOBAL: OnceLock<ProcessCacheState> = OnceLock::new();

/// Root of the caching subsystem.
#[derive(Debug)]
pub struct ProcessCacheState {
    id: u64,
    alive: Arc<AtomicBool>,
    thread_limits: TierLimits,
    coordinator: StrategyCoordinator,
    patterns: SharedPatternCache<SharedPattern>,
    buffers: SharedPool<MatchBuffer>,
    stacks: SharedPool<ExecStack>,
    stack_limits: Mutex<StackLimits>,
    context_cache: AtomicBool,
}

impl ProcessCacheState {
    /// Build a state from validated configuration.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let stack_limits = config.stack_limits()?;
        Ok(Self::with_stack_limits(&config, stack_limits))
    }

    fn with_stack_limits(config: &CacheConfig, stack_limits: StackLimits) -> Self {
        let global = config.global_limits();
        let strategy = config.initial_strategy();
        tracing::debug!(%strategy, "initializing cache state");
        Self {
            id: NEXT_STATE_ID.fetch_add(1, Ordering::Relaxed),
            alive: Arc::new(AtomicBool::new(true)),
            thread_limits: config.thread_limits(),
            coordinator: StrategyCoordinator::new(strategy),
            patterns: SharedPatternCache::new(global.patterns),
            buffers: SharedPool::new(global.match_buffers),
            stacks: SharedPool::new(global.stacks),
            stack_limits: Mutex::new(stack_limits),
            context_cache: AtomicBool::new(config.context_cache),
        }
    }

    /// The process-wide instance, configured from the environment on first
    /// use.
    pub fn global() -> &'static ProcessCacheState {
        GLOBAL.get_or_init(|| {
            let config = CacheConfig::from_env();
            let limits = config.stack_limits().unwrap_or_default();
            Self::with_stack_limits(&config, limits)
        })
    }

    fn new_thread_state(&self) -> ThreadCacheState {
        ThreadCacheState::new(self.thread_limits, self.alive.clone())
    }

    /// Run `f` on the calling thread's state, creating it if needed.
    fn with_local<R>(&self, f: impl FnOnce(&mut ThreadCacheState) -> R) -> Option<R> {
        thread_state::with_state(self.id, || self.new_thread_state(), f)
    }

    // Patterns

    /// Return the cached matcher for `key`, running `compile` on a miss.
    ///
    /// Errors from `compile` are returned unchanged and nothing is cached.
    pub fn get_or_compile_pattern<E>(
        &self,
        key: &PatternKey,
        compile: impl FnOnce() -> std::result::Result<SharedPattern, E>,
    ) -> std::result::Result<SharedPattern, E> {
        match self.coordinator.lock_in() {
            CacheStrategy::Shared => self.patterns.get_or_compile(key, compile),
            CacheStrategy::ThreadConfined => {
                if let Some(Some(hit)) = self.with_local(|state| state.patterns.lookup(key)) {
                    return Ok(hit);
                }
                // The registry is not borrowed while compiling.
                let compiled = compile()?;
                self.with_local(|state| {
                    state.patterns.insert(key.clone(), compiled.clone());
                });
                Ok(compiled)
            }
        }
    }

    /// Compile `source` through the pattern cache.
    pub fn compile(
        &self,
        source: impl Into<PatternSource>,
        options: CompileOptions,
        accelerate: bool,
    ) -> Result<SharedPattern> {
        let key = PatternKey::new(source, options, accelerate);
        self.get_or_compile_pattern(&key, || {
            tracing::debug!(%key, "compiling pattern");
            CompiledPattern::compile(key.pattern(), options, accelerate)
                .map(Arc::new)
                .map_err(Error::from)
        })
    }

    pub fn set_pattern_cache_capacity(&self, limit: CacheLimit) {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.patterns.set_capacity(limit),
            CacheStrategy::ThreadConfined => {
                self.with_local(|state| state.patterns.set_capacity(limit));
            }
        }
    }

    pub fn pattern_cache_capacity(&self) -> CacheLimit {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.patterns.capacity(),
            CacheStrategy::ThreadConfined => self
                .with_local(|state| state.patterns.capacity())
                .unwrap_or(self.thread_limits.patterns),
        }
    }

    pub fn pattern_cache_len(&self) -> usize {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.patterns.len(),
            CacheStrategy::ThreadConfined => {
                thread_state::with_existing(self.id, |state| state.patterns.len()).unwrap_or(0)
            }
        }
    }

    pub fn pattern_cache_stats(&self) -> CacheStats {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.patterns.stats(),
            CacheStrategy::ThreadConfined => {
                thread_state::with_existing(self.id, |state| state.patterns.stats())
                    .unwrap_or_default()
            }
        }
    }

    pub fn clear_pattern_cache(&self) {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.patterns.clear(),
            CacheStrategy::ThreadConfined => {
                thread_state::with_existing(self.id, |state| state.patterns.clear());
            }
        }
    }

    // Match buffers

    /// A match buffer with at least `min_slots` slots.
    pub fn acquire_scratch(&self, min_slots: usize) -> Result<MatchBuffer> {
        self.acquire_buffer(min_slots, None)
    }

    /// A match buffer with at least `min_slots` slots for running `pattern`.
    ///
    /// If a buffer of `min_slots` cannot be allocated, one sized to the
    /// pattern's own slot count is tried before giving up.
    pub fn acquire_scratch_for(
        &self,
        pattern: &CompiledPattern,
        min_slots: usize,
    ) -> Result<MatchBuffer> {
        self.acquire_buffer(min_slots, Some(pattern.capture_slots()))
    }

    fn acquire_buffer(&self, min_slots: usize, declared: Option<usize>) -> Result<MatchBuffer> {
        let min_slots = min_slots.max(1);
        let fits = |buffer: &MatchBuffer| buffer.fits(min_slots);
        let pooled = match self.coordinator.lock_in() {
            CacheStrategy::Shared => self.buffers.take(fits),
            CacheStrategy::ThreadConfined => self.with_local(|s| s.buffers.take(fits)).flatten(),
        };
        if let Some(buffer) = pooled {
            return Ok(buffer);
        }
        match (MatchBuffer::try_with_slots(min_slots), declared) {
            (Err(_), Some(slots)) if slots < min_slots => {
                tracing::debug!(min_slots, slots, "falling back to the pattern's slot count");
                MatchBuffer::try_with_slots(slots)
            }
            (result, _) => result,
        }
    }

    /// Return a buffer for reuse. Dropped if the pool has no room.
    pub fn release_scratch(&self, mut buffer: MatchBuffer) {
        buffer.reset();
        match self.coordinator.lock_in() {
            CacheStrategy::Shared => drop(self.buffers.put(buffer)),
            CacheStrategy::ThreadConfined => {
                let mut buffer = Some(buffer);
                self.with_local(|state| {
                    if let Some(buffer) = buffer.take() {
                        drop(state.buffers.put(buffer));
                    }
                });
            }
        }
    }

    pub fn set_scratch_cache_capacity(&self, capacity: usize) {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.buffers.set_capacity(capacity),
            CacheStrategy::ThreadConfined => {
                self.with_local(|state| state.buffers.set_capacity(capacity));
            }
        }
    }

    pub fn scratch_cache_capacity(&self) -> usize {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.buffers.capacity(),
            CacheStrategy::ThreadConfined => self
                .with_local(|state| state.buffers.capacity())
                .unwrap_or(self.thread_limits.match_buffers),
        }
    }

    pub fn scratch_cache_len(&self) -> usize {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.buffers.len(),
            CacheStrategy::ThreadConfined => {
                thread_state::with_existing(self.id, |state| state.buffers.len()).unwrap_or(0)
            }
        }
    }

    pub fn clear_scratch_cache(&self) {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.buffers.clear(),
            CacheStrategy::ThreadConfined => {
                thread_state::with_existing(self.id, |state| state.buffers.clear());
            }
        }
    }

    // Execution stacks

    /// A pooled execution stack built under the current limits, or a new one.
    pub fn acquire_stack(&self) -> Result<ExecStack> {
        let limits = self.stack_size_limits();
        let fits = |stack: &ExecStack| stack.limits() == limits;
        let pooled = match self.coordinator.lock_in() {
            CacheStrategy::Shared => self.stacks.take(fits),
            CacheStrategy::ThreadConfined => self.with_local(|s| s.stacks.take(fits)).flatten(),
        };
        match pooled {
            Some(stack) => Ok(stack),
            None => ExecStack::try_new(limits),
        }
    }

    /// Return a stack for reuse. Dropped if the pool has no room or the
    /// stack was built under limits that are no longer current.
    pub fn release_stack(&self, mut stack: ExecStack) {
        let strategy = self.coordinator.lock_in();
        if stack.limits() != self.stack_size_limits() {
            tracing::trace!(id = stack.id(), "dropping stack built under old limits");
            return;
        }
        stack.reset();
        match strategy {
            CacheStrategy::Shared => drop(self.stacks.put(stack)),
            CacheStrategy::ThreadConfined => {
                let mut stack = Some(stack);
                self.with_local(|state| {
                    if let Some(stack) = stack.take() {
                        drop(state.stacks.put(stack));
                    }
                });
            }
        }
    }

    pub fn set_stack_cache_capacity(&self, capacity: usize) {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.stacks.set_capacity(capacity),
            CacheStrategy::ThreadConfined => {
                self.with_local(|state| state.stacks.set_capacity(capacity));
            }
        }
    }

    pub fn stack_cache_capacity(&self) -> usize {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.stacks.capacity(),
            CacheStrategy::ThreadConfined => self
                .with_local(|state| state.stacks.capacity())
                .unwrap_or(self.thread_limits.stacks),
        }
    }

    pub fn stack_cache_len(&self) -> usize {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.stacks.len(),
            CacheStrategy::ThreadConfined => {
                thread_state::with_existing(self.id, |state| state.stacks.len()).unwrap_or(0)
            }
        }
    }

    pub fn clear_stack_cache(&self) {
        match self.coordinator.get() {
            CacheStrategy::Shared => self.stacks.clear(),
            CacheStrategy::ThreadConfined => {
                thread_state::with_existing(self.id, |state| state.stacks.clear());
            }
        }
    }

    /// Change execution stack sizes and free every pooled stack.
    ///
    /// Stacks pooled on other threads under the old limits are never handed
    /// out again, and stacks checked out now are dropped on release.
    pub fn set_stack_size_limits(&self, start: usize, max: usize) -> Result<()> {
        let limits = StackLimits::new(start, max)?;
        *self.stack_limits.lock() = limits;
        self.stacks.clear();
        thread_state::with_existing(self.id, |state| state.stacks.clear());
        tracing::debug!(start, max, "stack size limits changed");
        Ok(())
    }

    pub fn stack_size_limits(&self) -> StackLimits {
        *self.stack_limits.lock()
    }

    // Strategy

    pub fn get_cache_strategy(&self) -> CacheStrategy {
        self.coordinator.get()
    }

    /// Change the strategy. Switching empties the previous backing.
    pub fn set_cache_strategy(&self, strategy: CacheStrategy) -> Result<()> {
        if let StrategyChange::Switched { from } = self.coordinator.set(strategy)? {
            match from {
                CacheStrategy::Shared => {
                    self.patterns.clear();
                    self.buffers.clear();
                    self.stacks.clear();
                }
                CacheStrategy::ThreadConfined => thread_state::remove(self.id),
            }
        }
        Ok(())
    }

    /// Change the strategy by name (`thread-local` or `global`).
    pub fn set_cache_strategy_name(&self, name: &str) -> Result<()> {
        self.set_cache_strategy(name.parse()?)
    }

    pub fn is_strategy_locked(&self) -> bool {
        self.coordinator.is_locked()
    }

    // Match contexts

    /// Lend this thread's reusable context of `kind` to `f`.
    ///
    /// The context is reset afterwards; an attached execution stack is
    /// released to the stack pool.
    pub fn with_match_context<R>(
        &self,
        kind: ContextKind,
        f: impl FnOnce(&mut MatchContext) -> R,
    ) -> R {
        let enabled = self.context_cache_enabled();
        let mut context = self
            .with_local(|state| state.contexts.checkout(kind, enabled))
            .unwrap_or_else(|| MatchContext::new(kind));
        let result = f(&mut context);

        let mut context = Some(context);
        let detached = self
            .with_local(|state| {
                context
                    .take()
                    .and_then(|c| state.contexts.checkin(c, enabled))
            })
            .flatten();
        let stack = detached.or_else(|| context.and_then(|mut c| c.reset()));
        if let Some(stack) = stack {
            self.release_stack(stack);
        }
        result
    }

    pub fn set_context_cache_enabled(&self, enabled: bool) {
        self.context_cache.store(enabled, Ordering::Relaxed);
        if !enabled {
            thread_state::with_existing(self.id, |state| state.contexts.clear());
        }
    }

    pub fn context_cache_enabled(&self) -> bool {
        self.context_cache.load(Ordering::Relaxed)
    }

    // Execution

    /// First match of `pattern` in `subject` using pooled scratch.
    pub fn search(
        &self,
        pattern: &CompiledPattern,
        subject: &[u8],
        offset_limit: Option<usize>,
    ) -> Result<Option<PatternMatch>> {
        let mut buffer = self.acquire_scratch_for(pattern, pattern.capture_slots())?;
        let kind = context_kind(offset_limit);
        let found = self.with_match_context(kind, |context| {
            context.set_offset_limit(offset_limit);
            pattern.execute(subject, &mut buffer, context)
        });
        self.release_scratch(buffer);
        Ok(found?)
    }

    /// Every match of `pattern` in `subject`, staged on a pooled stack.
    pub fn find_all(
        &self,
        pattern: &CompiledPattern,
        subject: &[u8],
        offset_limit: Option<usize>,
    ) -> Result<Vec<PatternMatch>> {
        let stack = self.acquire_stack()?;
        let kind = context_kind(offset_limit);
        let found = self.with_match_context(kind, |context| {
            context.set_offset_limit(offset_limit);
            context.attach_stack(stack);
            pattern.find_all(subject, context)
        });
        Ok(found)
    }

    /// Clear the pattern cache and both scratch pools.
    pub fn clear_all(&self) {
        self.clear_pattern_cache();
        self.clear_scratch_cache();
        self.clear_stack_cache();
    }
}

fn context_kind(offset_limit: Option<usize>) -> ContextKind {
    match offset_limit {
        Some(_) => ContextKind::OffsetLimited,
        None => ContextKind::Standard,
    }
}

impl Drop for ProcessCacheState {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
        thread_state::remove(self.id);
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
