// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable access.
//!
//! Variable names are generated by `build.rs` so that tests and docs share
//! a single source of truth.

/// Generated environment variable names.
pub mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

/// Read an environment variable, treating unset and non-unicode values alike.
pub fn var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Interpret an environment flag value.
///
/// Empty values and values starting with `0`, `f`, `F`, `n` or `N` are false;
/// anything else is true. `None` means the variable is unset.
pub fn is_truthy(value: Option<&str>) -> bool {
    let Some(first) = value.and_then(|v| v.chars().next()) else {
        return false;
    };
    !matches!(first, '0' | 'f' | 'F' | 'n' | 'N')
}

/// Read a boolean flag, returning `None` when the variable is unset.
pub fn flag(name: &str) -> Option<bool> {
    var(name).map(|v| is_truthy(Some(&v)))
}

/// Whether the environment asks for the shared cache strategy by default.
pub fn shared_cache_requested() -> bool {
    flag(names::MATCHPOOL_CACHE_GLOBAL).unwrap_or(false)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
