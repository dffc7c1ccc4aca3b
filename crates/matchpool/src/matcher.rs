// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled pattern matchers with automatic optimization.
//!
//! When acceleration is requested, patterns are classified into tiers:
//! - Plain literal: `memchr::memmem`
//! - Pure alternation of literals: `aho-corasick`
//! - Everything else: `regex::bytes`
//!
//! Without acceleration every pattern goes through the regex tier.

use std::borrow::Cow;
use std::sync::Arc;

use aho_corasick::{AhoCorasick, MatchKind};
use memchr::memmem::Finder;
use regex::bytes::{Regex, RegexBuilder};

use crate::context::MatchContext;
use crate::key::{CompileOptions, PatternSource};
use crate::scratch::{ExecStack, MatchBuffer};

/// Cached handle to a compiled pattern.
pub type SharedPattern = Arc<CompiledPattern>;

/// A compiled pattern optimized for its structure.
#[derive(Debug)]
pub enum CompiledPattern {
    /// Single literal string (fastest).
    Literal(LiteralMatcher),
    /// Multiple literal strings (Aho-Corasick).
    MultiLiteral(MultiLiteralMatcher),
    /// Full regex (most flexible).
    Regex(RegexMatcher),
}

/// Matcher for single literal strings using SIMD-optimized memchr.
#[derive(Debug)]
pub struct LiteralMatcher {
    len: usize,
    finder: Finder<'static>,
}

/// Matcher for multiple literal strings using Aho-Corasick automaton.
#[derive(Debug)]
pub struct MultiLiteralMatcher {
    automaton: AhoCorasick,
}

/// Matcher for complex regex patterns.
#[derive(Debug)]
pub struct RegexMatcher {
    regex: Regex,
}

/// A match found in a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Byte offset where match starts.
    pub start: usize,
    /// Byte offset where match ends.
    pub end: usize,
}

/// Error during pattern compilation or execution.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("match buffer too small: pattern needs {required} slots, buffer has {available}")]
    InsufficientSlots { required: usize, available: usize },
}

impl CompiledPattern {
    /// Compile a pattern into an optimized matcher.
    pub fn compile(
        source: &PatternSource,
        options: CompileOptions,
        accelerate: bool,
    ) -> Result<Self, PatternError> {
        let literal_flag = options.contains(CompileOptions::LITERAL);
        let fast_path = accelerate
            && !options.intersects(CompileOptions::CASELESS | CompileOptions::EXTENDED);

        if fast_path && !source.is_empty() {
            if literal_flag {
                return Ok(CompiledPattern::Literal(LiteralMatcher::new(
                    source.as_bytes(),
                )));
            }
            if let Ok(text) = std::str::from_utf8(source.as_bytes()) {
                if is_literal(text) {
                    return Ok(CompiledPattern::Literal(LiteralMatcher::new(
                        text.as_bytes(),
                    )));
                }
                if let Some(literals) = extract_alternation_literals(text) {
                    return Ok(CompiledPattern::MultiLiteral(MultiLiteralMatcher::new(
                        &literals,
                    )?));
                }
            }
        }

        Ok(CompiledPattern::Regex(RegexMatcher::new(source, options)?))
    }

    /// Number of capture slots a match buffer needs (group 0 included).
    pub fn capture_slots(&self) -> usize {
        match self {
            CompiledPattern::Literal(_) | CompiledPattern::MultiLiteral(_) => 1,
            CompiledPattern::Regex(m) => m.regex.captures_len(),
        }
    }

    /// Tier name, for diagnostics.
    pub fn tier(&self) -> &'static str {
        match self {
            CompiledPattern::Literal(_) => "literal",
            CompiledPattern::MultiLiteral(_) => "multi-literal",
            CompiledPattern::Regex(_) => "regex",
        }
    }

    /// Find the leftmost match, recording capture spans in `buffer`.
    ///
    /// A match starting past the context's offset limit is no match.
    pub fn execute(
        &self,
        subject: &[u8],
        buffer: &mut MatchBuffer,
        context: &mut MatchContext,
    ) -> Result<Option<PatternMatch>, PatternError> {
        let required = self.capture_slots();
        if !buffer.fits(required) {
            return Err(PatternError::InsufficientSlots {
                required,
                available: buffer.capacity(),
            });
        }
        buffer.reset();

        let found = match self {
            CompiledPattern::Literal(m) => m.find(subject),
            CompiledPattern::MultiLiteral(m) => m.find(subject),
            CompiledPattern::Regex(m) => {
                return Ok(m.captures_into(subject, buffer, context));
            }
        };
        let found = found.filter(|m| context.allows_start(m.start));
        if let Some(m) = &found {
            buffer.set(0, Some(m.start..m.end));
        }
        Ok(found)
    }

    /// Find all non-overlapping matches.
    ///
    /// When the context has an execution stack attached, matches are staged
    /// on it and flushed to the result each time it fills. The stack bounds
    /// the staging area, not the number of matches.
    pub fn find_all(&self, subject: &[u8], context: &mut MatchContext) -> Vec<PatternMatch> {
        let limit = context.offset_limit();
        let within = move |m: &PatternMatch| limit.is_none_or(|l| m.start <= l);
        let matches: Box<dyn Iterator<Item = PatternMatch> + '_> = match self {
            CompiledPattern::Literal(m) => Box::new(m.find_iter(subject)),
            CompiledPattern::MultiLiteral(m) => Box::new(m.find_iter(subject)),
            CompiledPattern::Regex(m) => Box::new(m.find_iter(subject)),
        };
        let matches = matches.take_while(within);

        let Some(stack) = context.stack_mut() else {
            return matches.collect();
        };
        stack.reset();
        let mut found = Vec::new();
        for m in matches {
            if !stack.push(m.start..m.end) {
                flush(stack, &mut found);
                stack.push(m.start..m.end);
            }
        }
        flush(stack, &mut found);
        found
    }
}

fn flush(stack: &mut ExecStack, out: &mut Vec<PatternMatch>) {
    out.extend(stack.drain().map(|r| PatternMatch {
        start: r.start,
        end: r.end,
    }));
}

/// Check if pattern is a plain literal (no regex metacharacters).
fn is_literal(pattern: &str) -> bool {
    !pattern.chars().any(|c| {
        matches!(
            c,
            '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|'
        )
    })
}

/// Extract literals from patterns like "foo|bar|baz".
///
/// Returns None unless every alternative is a non-empty literal.
fn extract_alternation_literals(pattern: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = pattern.split('|').collect();
    if parts.len() < 2 {
        return None;
    }
    if parts.iter().any(|part| part.is_empty() || !is_literal(part)) {
        return None;
    }
    Some(parts)
}

impl LiteralMatcher {
    pub fn new(needle: &[u8]) -> Self {
        Self {
            len: needle.len(),
            finder: Finder::new(needle).into_owned(),
        }
    }

    fn find(&self, subject: &[u8]) -> Option<PatternMatch> {
        self.finder.find(subject).map(|start| PatternMatch {
            start,
            end: start + self.len,
        })
    }

    fn find_iter<'a>(&'a self, subject: &'a [u8]) -> impl Iterator<Item = PatternMatch> + 'a {
        self.finder
            .find_iter(subject)
            .map(move |start| PatternMatch {
                start,
                end: start + self.len,
            })
    }
}

impl MultiLiteralMatcher {
    /// Leftmost-first semantics, matching regex alternation order.
    pub fn new(patterns: &[&str]) -> Result<Self, PatternError> {
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(patterns)
            .map_err(|e| PatternError::InvalidPattern(format!("aho-corasick error: {}", e)))?;
        Ok(Self { automaton })
    }

    fn find(&self, subject: &[u8]) -> Option<PatternMatch> {
        self.automaton.find(subject).map(|m| PatternMatch {
            start: m.start(),
            end: m.end(),
        })
    }

    fn find_iter<'a>(&'a self, subject: &'a [u8]) -> impl Iterator<Item = PatternMatch> + 'a {
        self.automaton.find_iter(subject).map(|m| PatternMatch {
            start: m.start(),
            end: m.end(),
        })
    }
}

impl RegexMatcher {
    pub fn new(source: &PatternSource, options: CompileOptions) -> Result<Self, PatternError> {
        let (pattern, byte_escaped) = regex_source(source, options)?;
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(options.contains(CompileOptions::CASELESS))
            .multi_line(options.contains(CompileOptions::MULTILINE))
            .dot_matches_new_line(options.contains(CompileOptions::DOTALL))
            .ignore_whitespace(options.contains(CompileOptions::EXTENDED))
            .unicode(!byte_escaped && !options.contains(CompileOptions::ASCII))
            .build()?;
        Ok(Self { regex })
    }

    fn captures_into(
        &self,
        subject: &[u8],
        buffer: &mut MatchBuffer,
        context: &MatchContext,
    ) -> Option<PatternMatch> {
        let mut locations = self.regex.capture_locations();
        let m = self.regex.captures_read(&mut locations, subject)?;
        if !context.allows_start(m.start()) {
            return None;
        }
        for index in 0..locations.len() {
            buffer.set(index, locations.get(index).map(|(s, e)| s..e));
        }
        Some(PatternMatch {
            start: m.start(),
            end: m.end(),
        })
    }

    fn find_iter<'a>(&'a self, subject: &'a [u8]) -> impl Iterator<Item = PatternMatch> + 'a {
        self.regex.find_iter(subject).map(|m| PatternMatch {
            start: m.start(),
            end: m.end(),
        })
    }
}

/// Regex source text for a pattern, and whether bytes were hex-escaped.
///
/// Literal patterns are escaped. Non-UTF-8 byte patterns are only accepted
/// with [`CompileOptions::LITERAL`].
fn regex_source(
    source: &PatternSource,
    options: CompileOptions,
) -> Result<(Cow<'_, str>, bool), PatternError> {
    let literal = options.contains(CompileOptions::LITERAL);
    match std::str::from_utf8(source.as_bytes()) {
        Ok(text) if literal => Ok((Cow::Owned(regex::escape(text)), false)),
        Ok(text) => Ok((Cow::Borrowed(text), false)),
        Err(_) if literal => Ok((Cow::Owned(escape_bytes(source.as_bytes())), true)),
        Err(_) => Err(PatternError::InvalidPattern(
            "byte pattern is not valid UTF-8".to_string(),
        )),
    }
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for &b in bytes {
        if b.is_ascii_alphanumeric() {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("\\x{:02X}", b));
        }
    }
    out
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
