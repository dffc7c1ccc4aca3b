// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reusable execution scratch objects.
//!
//! - [`MatchBuffer`]: capture-slot storage filled by one execution.
//! - [`ExecStack`]: bounded work area used while collecting many matches.

use std::mem::size_of;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::defaults;
use crate::error::{Error, Result};

static NEXT_SCRATCH_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_SCRATCH_ID.fetch_add(1, Ordering::Relaxed)
}

/// Capture-slot buffer.
///
/// Capacity is the number of slots (group 0 plus capture groups). A buffer
/// can serve any pattern that needs no more slots than it has.
#[derive(Debug)]
pub struct MatchBuffer {
    id: u64,
    slots: Vec<Option<(usize, usize)>>,
}

impl MatchBuffer {
    /// Allocate a buffer with exactly `slots` slots (at least one).
    pub fn try_with_slots(slots: usize) -> Result<Self> {
        let slots = slots.max(1);
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(slots)
            .map_err(|_| Error::OutOfMemory {
                what: "match buffer",
            })?;
        storage.resize(slots, None);
        Ok(Self {
            id: next_id(),
            slots: storage,
        })
    }

    /// Unique identity, stable for the lifetime of the buffer.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of capture slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Whether this buffer can serve a pattern needing `required` slots.
    pub fn fits(&self, required: usize) -> bool {
        self.capacity() >= required.max(1)
    }

    /// Clear all slots.
    pub fn reset(&mut self) {
        self.slots.fill(None);
    }

    /// Record the span of slot `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, span: Option<Range<usize>>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = span.map(|r| (r.start, r.end));
        }
    }

    /// The span recorded for slot `index`.
    pub fn get(&self, index: usize) -> Option<Range<usize>> {
        self.slots
            .get(index)
            .copied()
            .flatten()
            .map(|(start, end)| start..end)
    }

    /// Iterate over all slots.
    pub fn spans(&self) -> impl Iterator<Item = Option<Range<usize>>> + '_ {
        self.slots.iter().map(|s| s.map(|(start, end)| start..end))
    }
}

/// Start and maximum sizes, in bytes, for execution stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackLimits {
    start: usize,
    max: usize,
}

impl StackLimits {
    /// Validate and build limits: both non-zero, `start <= max`.
    pub fn new(start: usize, max: usize) -> Result<Self> {
        if start == 0 || max == 0 || start > max {
            return Err(Error::InvalidStackLimits { start, max });
        }
        Ok(Self { start, max })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for StackLimits {
    fn default() -> Self {
        Self {
            start: defaults::stack::START_SIZE,
            max: defaults::stack::MAX_SIZE,
        }
    }
}

/// Growable work area with a hard upper bound.
///
/// Stages match spans while a pattern is run across a subject. The initial
/// allocation comes from [`StackLimits::start`]; [`StackLimits::max`] caps
/// how many frames it holds before the caller must drain it.
#[derive(Debug)]
pub struct ExecStack {
    id: u64,
    limits: StackLimits,
    frames: Vec<Range<usize>>,
}

const FRAME_SIZE: usize = size_of::<Range<usize>>();

impl ExecStack {
    pub fn try_new(limits: StackLimits) -> Result<Self> {
        let mut frames = Vec::new();
        frames
            .try_reserve_exact(limits.start / FRAME_SIZE)
            .map_err(|_| Error::OutOfMemory {
                what: "execution stack",
            })?;
        Ok(Self {
            id: next_id(),
            limits,
            frames,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The limits this stack was created under.
    pub fn limits(&self) -> StackLimits {
        self.limits
    }

    /// Maximum number of frames the stack may hold.
    pub fn max_frames(&self) -> usize {
        (self.limits.max / FRAME_SIZE).max(1)
    }

    /// Push a frame. Returns `false` when the stack is exhausted.
    pub fn push(&mut self, span: Range<usize>) -> bool {
        if self.frames.len() >= self.max_frames() {
            return false;
        }
        self.frames.push(span);
        true
    }

    pub fn frames(&self) -> &[Range<usize>] {
        &self.frames
    }

    /// Move the frames out, leaving the stack empty with its allocation.
    pub fn drain(&mut self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.frames.drain(..)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn reset(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
#[path = "scratch_tests.rs"]
mod tests;
