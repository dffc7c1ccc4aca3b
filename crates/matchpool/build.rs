// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Build script that generates env var name constants for `env.rs`.

// Build scripts panic on failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest = Path::new(&out_dir).join("env_names.rs");

    let contents = r#"
/// Environment variable: selects the shared (global) cache strategy when truthy.
pub const MATCHPOOL_CACHE_GLOBAL: &str = "MATCHPOOL_CACHE_GLOBAL";
/// Environment variable: disables per-thread match context reuse when falsy.
pub const MATCHPOOL_CONTEXT_CACHE: &str = "MATCHPOOL_CONTEXT_CACHE";
/// Environment variable: configures tracing log filter.
pub const MATCHPOOL_LOG: &str = "MATCHPOOL_LOG";
"#;

    fs::write(dest, contents).expect("failed to write env_names.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
