// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use yare::parameterized;

#[test]
fn names_cache_global_is_correct() {
    assert_eq!(names::MATCHPOOL_CACHE_GLOBAL, "MATCHPOOL_CACHE_GLOBAL");
}

#[test]
fn names_context_cache_is_correct() {
    assert_eq!(names::MATCHPOOL_CONTEXT_CACHE, "MATCHPOOL_CONTEXT_CACHE");
}

#[test]
fn names_log_is_correct() {
    assert_eq!(names::MATCHPOOL_LOG, "MATCHPOOL_LOG");
}

#[parameterized(
    unset = { None, false },
    empty = { Some(""), false },
    zero = { Some("0"), false },
    false_lower = { Some("false"), false },
    false_upper = { Some("FALSE"), false },
    no = { Some("no"), false },
    no_upper = { Some("No"), false },
    one = { Some("1"), true },
    yes = { Some("yes"), true },
    true_word = { Some("true"), true },
    on = { Some("on"), true },
)]
fn truthy_flag_values(value: Option<&str>, expected: bool) {
    assert_eq!(is_truthy(value), expected);
}

#[test]
fn unset_flag_reads_as_none() {
    assert_eq!(flag("MATCHPOOL_TEST_SURELY_UNSET_VARIABLE"), None);
}
