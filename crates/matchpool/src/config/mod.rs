// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cache configuration.
//!
//! Parsed from TOML:
//!
//! ```toml
//! strategy = "global"
//! context_cache = true
//!
//! [thread]
//! patterns = 32
//! match_buffers = 8
//! stacks = 4
//!
//! [global]
//! patterns = "unbounded"
//!
//! [stack]
//! start_size = 32768
//! max_size = 1048576
//! ```
//!
//! Every key is optional; missing values fall back to [`defaults`].

pub mod defaults;

use serde::Deserialize;

use crate::env;
use crate::error::{Error, Result};
use crate::limit::CacheLimit;
use crate::scratch::StackLimits;
use crate::strategy::CacheStrategy;

/// Top-level cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Initial strategy. `None` defers to the environment.
    pub strategy: Option<CacheStrategy>,

    /// Reuse match contexts per thread.
    pub context_cache: bool,

    /// Capacities applied to each thread under the thread-local strategy.
    pub thread: TierConfig,

    /// Capacities of the process-wide caches under the global strategy.
    pub global: TierConfig,

    /// Execution stack sizing.
    pub stack: StackConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            strategy: None,
            context_cache: true,
            thread: TierConfig::default(),
            global: TierConfig::default(),
            stack: StackConfig::default(),
        }
    }
}

/// Optional capacity overrides for one tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierConfig {
    pub patterns: Option<CacheLimit>,
    pub match_buffers: Option<usize>,
    pub stacks: Option<usize>,
}

/// Execution stack sizes in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfig {
    pub start_size: usize,
    pub max_size: usize,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            start_size: defaults::stack::START_SIZE,
            max_size: defaults::stack::MAX_SIZE,
        }
    }
}

/// Capacities for one tier with defaults filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub patterns: CacheLimit,
    pub match_buffers: usize,
    pub stacks: usize,
}

impl CacheConfig {
    /// Parse and validate TOML configuration.
    pub fn parse(content: &str) -> Result<Self> {
        let config: CacheConfig = toml::from_str(content).map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
        config.stack_limits()?;
        Ok(config)
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(env::var);
        config
    }

    /// Overlay environment values read through `lookup`.
    ///
    /// Only variables that are set override the current values.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(env::names::MATCHPOOL_CACHE_GLOBAL) {
            self.strategy = Some(if env::is_truthy(Some(&value)) {
                CacheStrategy::Shared
            } else {
                CacheStrategy::ThreadConfined
            });
        }
        if let Some(value) = lookup(env::names::MATCHPOOL_CONTEXT_CACHE) {
            self.context_cache = env::is_truthy(Some(&value));
        }
    }

    /// The strategy to start with.
    pub fn initial_strategy(&self) -> CacheStrategy {
        self.strategy.unwrap_or_else(CacheStrategy::from_env)
    }

    /// Per-thread capacities.
    pub fn thread_limits(&self) -> TierLimits {
        TierLimits {
            patterns: self
                .thread
                .patterns
                .unwrap_or(CacheLimit::Bounded(defaults::pattern::THREAD_LIMIT)),
            match_buffers: self
                .thread
                .match_buffers
                .unwrap_or(defaults::match_buffer::THREAD_CAPACITY),
            stacks: self
                .thread
                .stacks
                .unwrap_or(defaults::stack::THREAD_CAPACITY),
        }
    }

    /// Process-wide capacities.
    pub fn global_limits(&self) -> TierLimits {
        TierLimits {
            patterns: self
                .global
                .patterns
                .unwrap_or(CacheLimit::Bounded(defaults::pattern::GLOBAL_LIMIT)),
            match_buffers: self
                .global
                .match_buffers
                .unwrap_or(defaults::match_buffer::GLOBAL_CAPACITY),
            stacks: self
                .global
                .stacks
                .unwrap_or(defaults::stack::GLOBAL_CAPACITY),
        }
    }

    /// Validated execution stack limits.
    pub fn stack_limits(&self) -> Result<StackLimits> {
        StackLimits::new(self.stack.start_size, self.stack.max_size)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
