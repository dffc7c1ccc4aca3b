// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn strategy_locked_display_names_current_strategy() {
    let err = Error::StrategyLocked {
        current: CacheStrategy::Shared,
    };
    assert_eq!(err.to_string(), "cache strategy already locked to 'global'");
}

#[test]
fn invalid_stack_limits_display() {
    let err = Error::InvalidStackLimits { start: 8, max: 4 };
    assert!(err.to_string().contains("start=8, max=4"));
}

#[test]
fn pattern_error_is_transparent() {
    let err = Error::from(PatternError::InvalidPattern("bad".into()));
    assert_eq!(err.to_string(), "invalid pattern: bad");
}

#[parameterized(
    capacity = { Error::InvalidCapacity { value: -1 }, ErrorKind::Configuration },
    stack = { Error::InvalidStackLimits { start: 0, max: 1 }, ErrorKind::Configuration },
    locked = { Error::StrategyLocked { current: CacheStrategy::ThreadConfined }, ErrorKind::Configuration },
    unknown = { Error::UnknownStrategy("x".into()), ErrorKind::Configuration },
    config = { Error::Config { message: "x".into() }, ErrorKind::Configuration },
    oom = { Error::OutOfMemory { what: "ledger" }, ErrorKind::OutOfMemory },
    pattern = { Error::Pattern(PatternError::InvalidPattern("x".into())), ErrorKind::Construction },
    slots = { Error::Pattern(PatternError::InsufficientSlots { required: 3, available: 1 }), ErrorKind::Execution },
)]
fn error_kind_mapping(err: Error, expected: ErrorKind) {
    assert_eq!(err.kind(), expected);
}
