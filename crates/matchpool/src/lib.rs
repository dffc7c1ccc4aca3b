// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Caching and pooling for compiled pattern matchers.
//!
//! Compiled patterns are cached by (source, options, acceleration flag) with
//! FIFO eviction; match buffers and execution stacks are pooled for reuse.
//! Caches are either confined to each thread or shared by the process, as
//! chosen by the cache strategy, which locks on first use.
//!
//! The free functions operate on [`ProcessCacheState::global`].

pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod hash;
pub mod key;
pub mod limit;
pub mod matcher;
pub mod pattern_cache;
pub mod pool;
pub mod scratch;
pub mod state;
pub mod strategy;
pub mod thread_state;

pub use config::CacheConfig;
pub use context::{ContextKind, MatchContext};
pub use error::{Error, ErrorKind, Result};
pub use key::{CompileOptions, PatternKey, PatternSource};
pub use limit::CacheLimit;
pub use matcher::{CompiledPattern, PatternError, PatternMatch, SharedPattern};
pub use pattern_cache::CacheStats;
pub use scratch::{ExecStack, MatchBuffer, StackLimits};
pub use state::ProcessCacheState;
pub use strategy::CacheStrategy;

fn global() -> &'static ProcessCacheState {
    ProcessCacheState::global()
}

/// Return the cached matcher for `key`, running `compile` on a miss.
pub fn get_or_compile_pattern<E>(
    key: &PatternKey,
    compile: impl FnOnce() -> std::result::Result<SharedPattern, E>,
) -> std::result::Result<SharedPattern, E> {
    global().get_or_compile_pattern(key, compile)
}

/// Compile `source` through the global pattern cache.
pub fn compile(
    source: impl Into<PatternSource>,
    options: CompileOptions,
    accelerate: bool,
) -> Result<SharedPattern> {
    global().compile(source, options, accelerate)
}

pub fn set_pattern_cache_capacity(limit: CacheLimit) {
    global().set_pattern_cache_capacity(limit);
}

pub fn pattern_cache_capacity() -> CacheLimit {
    global().pattern_cache_capacity()
}

pub fn pattern_cache_len() -> usize {
    global().pattern_cache_len()
}

pub fn pattern_cache_stats() -> CacheStats {
    global().pattern_cache_stats()
}

pub fn clear_pattern_cache() {
    global().clear_pattern_cache();
}

pub fn acquire_scratch(min_slots: usize) -> Result<MatchBuffer> {
    global().acquire_scratch(min_slots)
}

pub fn acquire_scratch_for(pattern: &CompiledPattern, min_slots: usize) -> Result<MatchBuffer> {
    global().acquire_scratch_for(pattern, min_slots)
}

pub fn release_scratch(buffer: MatchBuffer) {
    global().release_scratch(buffer);
}

pub fn set_scratch_cache_capacity(capacity: usize) {
    global().set_scratch_cache_capacity(capacity);
}

pub fn scratch_cache_capacity() -> usize {
    global().scratch_cache_capacity()
}

pub fn scratch_cache_len() -> usize {
    global().scratch_cache_len()
}

pub fn clear_scratch_cache() {
    global().clear_scratch_cache();
}

pub fn acquire_stack() -> Result<ExecStack> {
    global().acquire_stack()
}

pub fn release_stack(stack: ExecStack) {
    global().release_stack(stack);
}

pub fn set_stack_cache_capacity(capacity: usize) {
    global().set_stack_cache_capacity(capacity);
}

pub fn stack_cache_capacity() -> usize {
    global().stack_cache_capacity()
}

pub fn stack_cache_len() -> usize {
    global().stack_cache_len()
}

pub fn clear_stack_cache() {
    global().clear_stack_cache();
}

pub fn set_stack_size_limits(start: usize, max: usize) -> Result<()> {
    global().set_stack_size_limits(start, max)
}

pub fn stack_size_limits() -> StackLimits {
    global().stack_size_limits()
}

pub fn get_cache_strategy() -> CacheStrategy {
    global().get_cache_strategy()
}

pub fn set_cache_strategy(strategy: CacheStrategy) -> Result<()> {
    global().set_cache_strategy(strategy)
}

pub fn set_cache_strategy_name(name: &str) -> Result<()> {
    global().set_cache_strategy_name(name)
}

pub fn is_strategy_locked() -> bool {
    global().is_strategy_locked()
}

pub fn with_match_context<R>(kind: ContextKind, f: impl FnOnce(&mut MatchContext) -> R) -> R {
    global().with_match_context(kind, f)
}

pub fn set_context_cache_enabled(enabled: bool) {
    global().set_context_cache_enabled(enabled);
}

pub fn context_cache_enabled() -> bool {
    global().context_cache_enabled()
}

/// First match of `pattern` in `subject`, using pooled scratch.
pub fn search(
    pattern: &CompiledPattern,
    subject: &[u8],
    offset_limit: Option<usize>,
) -> Result<Option<PatternMatch>> {
    global().search(pattern, subject, offset_limit)
}

pub fn find_all(
    pattern: &CompiledPattern,
    subject: &[u8],
    offset_limit: Option<usize>,
) -> Result<Vec<PatternMatch>> {
    global().find_all(pattern, subject, offset_limit)
}

/// Clear the pattern cache and both scratch pools.
pub fn clear_all() {
    global().clear_all();
}
