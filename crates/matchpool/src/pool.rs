// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded free lists of reusable scratch objects.
//!
//! [`ResourcePool`] is a singly linked list stored in an index-stable arena.
//! Released objects are pushed at the head; overflow is evicted from the
//! tail, which approximates keeping the most recently released objects.
//! Acquisition scans from the head for the first object that satisfies the
//! caller's predicate (capacity at least the requirement), not an exact fit.

use parking_lot::Mutex;

#[derive(Debug)]
struct Node<T> {
    item: Option<T>,
    next: Option<usize>,
}

/// Capacity-bounded free list.
#[derive(Debug)]
pub struct ResourcePool<T> {
    nodes: Vec<Node<T>>,
    /// Arena slots available for reuse.
    vacant: Vec<usize>,
    head: Option<usize>,
    len: usize,
    capacity: usize,
}

impl<T> ResourcePool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::new(),
            vacant: Vec::new(),
            head: None,
            len: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Unlink and return the first pooled item satisfying `fits`.
    ///
    /// When nothing fits and the pool is at capacity, the tail is evicted so
    /// that the caller's fresh object has room when it is released.
    pub fn take(&mut self, mut fits: impl FnMut(&T) -> bool) -> Option<T> {
        if self.capacity == 0 {
            return None;
        }

        let mut prev: Option<usize> = None;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            let next = node.next;
            if node.item.as_ref().is_some_and(&mut fits) {
                self.unlink(prev, index);
                return self.release_slot(index);
            }
            prev = cursor;
            cursor = next;
        }

        if self.len >= self.capacity {
            self.evict_tail();
        }
        None
    }

    /// Return an item to the pool.
    ///
    /// Returns the item back when it could not be pooled (capacity zero or
    /// arena allocation failure) so the caller decides how to dispose of it.
    pub fn put(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }

        let index = match self.vacant.pop() {
            Some(index) => {
                self.nodes[index] = Node {
                    item: Some(item),
                    next: self.head,
                };
                index
            }
            None => {
                if self.nodes.try_reserve(1).is_err() {
                    tracing::debug!("scratch pool node allocation failed, dropping item");
                    return Some(item);
                }
                self.nodes.push(Node {
                    item: Some(item),
                    next: self.head,
                });
                self.nodes.len() - 1
            }
        };
        self.head = Some(index);
        self.len += 1;

        while self.len > self.capacity {
            self.evict_tail();
        }
        None
    }

    /// Change capacity, evicting from the tail down to the new bound.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.len > self.capacity {
            self.evict_tail();
        }
    }

    /// Drop every pooled item.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.vacant.clear();
        self.head = None;
        self.len = 0;
    }

    /// Pooled items from head (most recently released) to tail.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let index = cursor?;
            let node = &self.nodes[index];
            cursor = node.next;
            node.item.as_ref()
        })
    }

    /// Walk to the end of the list and drop the last item.
    fn evict_tail(&mut self) {
        let Some(mut index) = self.head else {
            return;
        };
        let mut prev = None;
        while let Some(next) = self.nodes[index].next {
            prev = Some(index);
            index = next;
        }
        self.unlink(prev, index);
        drop(self.release_slot(index));
        tracing::trace!(remaining = self.len, "evicted pooled scratch object");
    }

    fn unlink(&mut self, prev: Option<usize>, index: usize) {
        let next = self.nodes[index].next.take();
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
    }

    fn release_slot(&mut self, index: usize) -> Option<T> {
        let item = self.nodes[index].item.take();
        self.vacant.push(index);
        self.len = self.len.saturating_sub(1);
        item
    }
}

/// A [`ResourcePool`] behind its own lock, for the shared strategy.
#[derive(Debug)]
pub struct SharedPool<T> {
    inner: Mutex<ResourcePool<T>>,
}

impl<T> SharedPool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(ResourcePool::new(capacity)),
        }
    }

    pub fn take(&self, fits: impl FnMut(&T) -> bool) -> Option<T> {
        self.inner.lock().take(fits)
    }

    pub fn put(&self, item: T) -> Option<T> {
        self.inner.lock().put(item)
    }

    pub fn set_capacity(&self, capacity: usize) {
        self.inner.lock().set_capacity(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
