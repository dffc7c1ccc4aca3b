// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::context::ContextKind;
use crate::scratch::{ExecStack, StackLimits};
use yare::parameterized;

fn compile(pattern: &str, options: CompileOptions, accelerate: bool) -> CompiledPattern {
    CompiledPattern::compile(&PatternSource::from(pattern), options, accelerate).unwrap()
}

fn context() -> MatchContext {
    MatchContext::new(ContextKind::Standard)
}

fn run(pattern: &CompiledPattern, subject: &str) -> Option<PatternMatch> {
    let mut buffer = MatchBuffer::try_with_slots(pattern.capture_slots()).unwrap();
    pattern
        .execute(subject.as_bytes(), &mut buffer, &mut context())
        .unwrap()
}

/// Tier selection when acceleration is requested.
mod matcher_selection {
    use super::*;

    #[parameterized(
        plain = { "FIXME", CompileOptions::empty(), "literal" },
        bang_is_not_meta = { "panic!", CompileOptions::empty(), "literal" },
        alternation = { "TODO|FIXME|XXX", CompileOptions::empty(), "multi-literal" },
        escaped = { r"\.unwrap\(\)", CompileOptions::empty(), "regex" },
        word_boundary = { r"\bunsafe\b", CompileOptions::empty(), "regex" },
        class = { "[abc]", CompileOptions::empty(), "regex" },
        anchor = { "^start", CompileOptions::empty(), "regex" },
        alternation_with_meta = { r"foo|\d+", CompileOptions::empty(), "regex" },
        empty_alternative = { "foo|", CompileOptions::empty(), "regex" },
        literal_flag = { "a.b", CompileOptions::LITERAL, "literal" },
        caseless = { "FIXME", CompileOptions::CASELESS, "regex" },
        extended = { "a b", CompileOptions::EXTENDED, "regex" },
    )]
    fn accelerated_tier(pattern: &str, options: CompileOptions, tier: &str) {
        assert_eq!(compile(pattern, options, true).tier(), tier);
    }

    #[test]
    fn without_acceleration_everything_is_regex() {
        assert_eq!(compile("FIXME", CompileOptions::empty(), false).tier(), "regex");
        assert_eq!(compile("a|b", CompileOptions::empty(), false).tier(), "regex");
    }
}

#[test]
fn invalid_regex_is_an_error() {
    let err = CompiledPattern::compile(&PatternSource::from("(unclosed"), CompileOptions::empty(), false)
        .unwrap_err();
    assert!(matches!(err, PatternError::InvalidRegex(_)));
}

#[test]
fn non_utf8_bytes_need_literal_flag() {
    let source = PatternSource::from(vec![0xff, 0x00]);
    let err = CompiledPattern::compile(&source, CompileOptions::empty(), false).unwrap_err();
    assert!(matches!(err, PatternError::InvalidPattern(_)));

    let pattern = CompiledPattern::compile(&source, CompileOptions::LITERAL, false).unwrap();
    let mut buffer = MatchBuffer::try_with_slots(1).unwrap();
    let found = pattern
        .execute(&[1, 0xff, 0x00, 2], &mut buffer, &mut context())
        .unwrap();
    assert_eq!(found, Some(PatternMatch { start: 1, end: 3 }));
}

#[parameterized(
    literal = { true },
    regex = { false },
)]
fn finds_leftmost_match(accelerate: bool) {
    let pattern = compile("hello", CompileOptions::empty(), accelerate);
    assert_eq!(
        run(&pattern, "say hello hello"),
        Some(PatternMatch { start: 4, end: 9 })
    );
    assert_eq!(run(&pattern, "goodbye"), None);
}

#[test]
fn multi_literal_prefers_first_alternative() {
    let pattern = compile("ab|abc", CompileOptions::empty(), true);
    assert_eq!(run(&pattern, "xabc"), Some(PatternMatch { start: 1, end: 3 }));
}

#[test]
fn caseless_option_applies() {
    let pattern = compile("hello", CompileOptions::CASELESS, true);
    assert_eq!(run(&pattern, "HeLLo"), Some(PatternMatch { start: 0, end: 5 }));
}

#[test]
fn literal_option_escapes_metacharacters() {
    let pattern = compile("a.c", CompileOptions::LITERAL, false);
    assert_eq!(run(&pattern, "abc"), None);
    assert_eq!(run(&pattern, "xa.c"), Some(PatternMatch { start: 1, end: 4 }));
}

#[test]
fn captures_fill_buffer_slots() {
    let pattern = compile(r"(\w+)@(\w+)", CompileOptions::empty(), false);
    assert_eq!(pattern.capture_slots(), 3);

    let mut buffer = MatchBuffer::try_with_slots(3).unwrap();
    let found = pattern
        .execute(b"mail bob@example now", &mut buffer, &mut context())
        .unwrap();
    assert_eq!(found, Some(PatternMatch { start: 5, end: 16 }));
    assert_eq!(buffer.get(0), Some(5..16));
    assert_eq!(buffer.get(1), Some(5..8));
    assert_eq!(buffer.get(2), Some(9..16));
}

#[test]
fn small_buffer_is_rejected() {
    let pattern = compile(r"(a)(b)", CompileOptions::empty(), false);
    let mut buffer = MatchBuffer::try_with_slots(1).unwrap();
    let err = pattern
        .execute(b"ab", &mut buffer, &mut context())
        .unwrap_err();
    assert!(matches!(
        err,
        PatternError::InsufficientSlots {
            required: 3,
            available: 1
        }
    ));
}

#[parameterized(
    literal = { true },
    regex = { false },
)]
fn offset_limit_bounds_start(accelerate: bool) {
    let pattern = compile("needle", CompileOptions::empty(), accelerate);
    let mut buffer = MatchBuffer::try_with_slots(1).unwrap();
    let mut ctx = MatchContext::new(ContextKind::OffsetLimited);

    ctx.set_offset_limit(Some(3));
    let subject = b"hay needle";
    assert_eq!(pattern.execute(subject, &mut buffer, &mut ctx).unwrap(), None);
    assert_eq!(buffer.get(0), None);

    ctx.set_offset_limit(Some(4));
    assert_eq!(
        pattern.execute(subject, &mut buffer, &mut ctx).unwrap(),
        Some(PatternMatch { start: 4, end: 10 })
    );
}

#[test]
fn find_all_without_stack_collects_everything() {
    let pattern = compile("TODO|FIXME", CompileOptions::empty(), true);
    let matches = pattern.find_all(b"TODO x FIXME y TODO", &mut context());
    assert_eq!(
        matches,
        vec![
            PatternMatch { start: 0, end: 4 },
            PatternMatch { start: 7, end: 12 },
            PatternMatch { start: 15, end: 19 },
        ]
    );
}

#[test]
fn find_all_respects_offset_limit() {
    let pattern = compile("a", CompileOptions::empty(), false);
    let mut ctx = context();
    ctx.set_offset_limit(Some(2));
    let matches = pattern.find_all(b"aaaa", &mut ctx);
    assert_eq!(matches.len(), 3);
}

#[test]
fn find_all_flushes_a_full_stack() {
    let frame = std::mem::size_of::<std::ops::Range<usize>>();
    let limits = StackLimits::new(frame, frame * 2).unwrap();
    let mut ctx = context();
    ctx.attach_stack(ExecStack::try_new(limits).unwrap());

    let pattern = compile("x", CompileOptions::empty(), true);
    assert_eq!(pattern.find_all(b"x-x", &mut ctx).len(), 2);

    let matches = pattern.find_all(b"xxxxx", &mut ctx);
    let starts: Vec<_> = matches.iter().map(|m| m.start).collect();
    assert_eq!(starts, [0, 1, 2, 3, 4]);
    assert!(ctx.stack_mut().unwrap().is_empty());
}
