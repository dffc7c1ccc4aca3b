// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use yare::parameterized;

#[test]
fn empty_config_uses_defaults() {
    let config = CacheConfig::parse("").unwrap();
    assert_eq!(config, CacheConfig::default());
    assert!(config.context_cache);

    let thread = config.thread_limits();
    assert_eq!(thread.patterns, CacheLimit::Bounded(32));
    assert_eq!(thread.match_buffers, 8);
    assert_eq!(thread.stacks, 4);

    let global = config.global_limits();
    assert_eq!(global.patterns, CacheLimit::Bounded(128));
    assert_eq!(global.match_buffers, 32);
    assert_eq!(global.stacks, 16);

    let stack = config.stack_limits().unwrap();
    assert_eq!(stack.start(), 32 * 1024);
    assert_eq!(stack.max(), 1024 * 1024);
}

#[test]
fn parses_full_config() {
    let config = CacheConfig::parse(
        r#"
strategy = "global"
context_cache = false

[thread]
patterns = 4
match_buffers = 2

[global]
patterns = "unbounded"
stacks = 0

[stack]
start_size = 1024
max_size = 4096
"#,
    )
    .unwrap();

    assert_eq!(config.strategy, Some(CacheStrategy::Shared));
    assert_eq!(config.initial_strategy(), CacheStrategy::Shared);
    assert!(!config.context_cache);
    assert_eq!(config.thread_limits().patterns, CacheLimit::Bounded(4));
    assert_eq!(config.thread_limits().match_buffers, 2);
    assert_eq!(config.thread_limits().stacks, 4);
    assert_eq!(config.global_limits().patterns, CacheLimit::Unbounded);
    assert_eq!(config.global_limits().stacks, 0);
    assert_eq!(config.stack_limits().unwrap().max(), 4096);
}

#[parameterized(
    unknown_key = { "flavor = 1" },
    unknown_tier_key = { "[thread]\nentries = 1" },
    negative_capacity = { "[thread]\npatterns = -1" },
    bad_capacity_text = { "[global]\npatterns = \"lots\"" },
    bad_strategy = { "strategy = \"per-core\"" },
    inverted_stack = { "[stack]\nstart_size = 10\nmax_size = 5" },
    zero_stack = { "[stack]\nstart_size = 0" },
)]
fn rejects_invalid_config(content: &str) {
    let err = CacheConfig::parse(content).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
}

#[test]
fn env_overlay_sets_strategy_and_context_cache() {
    let mut config = CacheConfig::default();
    config.apply_env(|name| match name {
        "MATCHPOOL_CACHE_GLOBAL" => Some("1".to_string()),
        "MATCHPOOL_CONTEXT_CACHE" => Some("no".to_string()),
        _ => None,
    });
    assert_eq!(config.strategy, Some(CacheStrategy::Shared));
    assert!(!config.context_cache);
}

#[test]
fn env_overlay_falsy_global_selects_thread_local() {
    let mut config = CacheConfig {
        strategy: Some(CacheStrategy::Shared),
        ..CacheConfig::default()
    };
    config.apply_env(|name| (name == "MATCHPOOL_CACHE_GLOBAL").then(|| "false".to_string()));
    assert_eq!(config.strategy, Some(CacheStrategy::ThreadConfined));
}

#[test]
fn env_overlay_ignores_unset_variables() {
    let mut config = CacheConfig {
        strategy: Some(CacheStrategy::Shared),
        context_cache: false,
        ..CacheConfig::default()
    };
    config.apply_env(|_| None);
    assert_eq!(config.strategy, Some(CacheStrategy::Shared));
    assert!(!config.context_cache);
}
