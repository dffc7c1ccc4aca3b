// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-thread reusable match contexts.
//!
//! A thread keeps at most one context of each [`ContextKind`]. A context is
//! checked out for the duration of one execution and reset on check-in: the
//! attached execution stack is detached and handed back to the caller, and
//! the offset limit is cleared. While a context is checked out its slot is
//! empty, so nested use on the same thread gets a fresh temporary context.

use crate::scratch::ExecStack;

/// Which reusable context slot to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// Plain execution.
    Standard,
    /// Execution that may carry an offset limit.
    OffsetLimited,
}

/// Execution parameters lent to the matching engine.
#[derive(Debug)]
pub struct MatchContext {
    kind: ContextKind,
    offset_limit: Option<usize>,
    stack: Option<ExecStack>,
}

impl MatchContext {
    pub fn new(kind: ContextKind) -> Self {
        Self {
            kind,
            offset_limit: None,
            stack: None,
        }
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Latest byte offset at which a match may start.
    pub fn offset_limit(&self) -> Option<usize> {
        self.offset_limit
    }

    pub fn set_offset_limit(&mut self, limit: Option<usize>) {
        self.offset_limit = limit;
    }

    /// Whether a match starting at `start` is within the offset limit.
    pub fn allows_start(&self, start: usize) -> bool {
        self.offset_limit.is_none_or(|limit| start <= limit)
    }

    /// Attach an execution stack, returning any previously attached one.
    pub fn attach_stack(&mut self, stack: ExecStack) -> Option<ExecStack> {
        self.stack.replace(stack)
    }

    pub fn detach_stack(&mut self) -> Option<ExecStack> {
        self.stack.take()
    }

    pub fn stack_mut(&mut self) -> Option<&mut ExecStack> {
        self.stack.as_mut()
    }

    pub fn has_stack(&self) -> bool {
        self.stack.is_some()
    }

    /// Restore the context to its freshly created state.
    ///
    /// Returns the detached stack, if any.
    pub fn reset(&mut self) -> Option<ExecStack> {
        self.offset_limit = None;
        self.detach_stack()
    }
}

/// The two context slots owned by one thread.
#[derive(Debug, Default)]
pub struct ContextPool {
    standard: Option<MatchContext>,
    offset_limited: Option<MatchContext>,
}

impl ContextPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: ContextKind) -> &mut Option<MatchContext> {
        match kind {
            ContextKind::Standard => &mut self.standard,
            ContextKind::OffsetLimited => &mut self.offset_limited,
        }
    }

    /// Take the cached context of `kind`, or build a new one.
    ///
    /// With `enabled` false any cached context is dropped and a fresh one is
    /// returned.
    pub fn checkout(&mut self, kind: ContextKind, enabled: bool) -> MatchContext {
        let cached = self.slot(kind).take();
        match cached {
            Some(context) if enabled => context,
            _ => MatchContext::new(kind),
        }
    }

    /// Reset `context` and keep it for reuse when its slot is vacant.
    ///
    /// Returns the stack that was attached to the context.
    pub fn checkin(&mut self, mut context: MatchContext, enabled: bool) -> Option<ExecStack> {
        let stack = context.reset();
        if enabled {
            let slot = self.slot(context.kind());
            if slot.is_none() {
                *slot = Some(context);
            }
        }
        stack
    }

    /// Whether a context of `kind` is cached.
    pub fn is_cached(&self, kind: ContextKind) -> bool {
        match kind {
            ContextKind::Standard => self.standard.is_some(),
            ContextKind::OffsetLimited => self.offset_limited.is_some(),
        }
    }

    pub fn clear(&mut self) {
        self.standard = None;
        self.offset_limited = None;
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
