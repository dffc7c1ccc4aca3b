// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized default values for configuration.
//!
//! Thread-confined caches are small because every thread gets its own;
//! shared caches are sized for the whole process.

/// Compiled-pattern cache capacities.
pub mod pattern {
    /// Entries per thread under the thread-confined strategy (32).
    pub const THREAD_LIMIT: usize = 32;

    /// Entries process-wide under the shared strategy (128).
    pub const GLOBAL_LIMIT: usize = 128;
}

/// Match buffer pool capacities.
pub mod match_buffer {
    /// Pooled buffers per thread (8).
    pub const THREAD_CAPACITY: usize = 8;

    /// Pooled buffers process-wide (32).
    pub const GLOBAL_CAPACITY: usize = 32;
}

/// Execution stack pool capacities and sizing.
pub mod stack {
    /// Pooled stacks per thread (4).
    pub const THREAD_CAPACITY: usize = 4;

    /// Pooled stacks process-wide (16).
    pub const GLOBAL_CAPACITY: usize = 16;

    /// Initial stack allocation in bytes (32 KiB).
    pub const START_SIZE: usize = 32 * 1024;

    /// Maximum stack size in bytes (1 MiB).
    pub const MAX_SIZE: usize = 1024 * 1024;
}
