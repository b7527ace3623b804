// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scriptorium History: a bounded, linear snapshot history.
//!
//! [`History`] keeps whole copies of a state value. Every recorded edit pushes a new snapshot and
//! discards any redo future; once the capacity is reached the oldest snapshot is evicted.
//! Snapshots are cheap when the state shares its heavy parts, for example trees held behind
//! `Arc` and copied on write.
//!
//! Edits run through [`History::apply`] on a copy of the current snapshot, so a failed edit never
//! leaves a half-applied state behind.
//!
//! ```
//! use scriptorium_history::{Applied, History};
//!
//! let mut history = History::new(vec![1, 2, 3]);
//! let applied = history
//!     .apply(|v| -> Result<usize, ()> {
//!         v.push(4);
//!         Ok(v.len())
//!     })
//!     .unwrap();
//! assert_eq!(applied, Applied { output: 4, recorded: true });
//! assert_eq!(history.current(), &[1, 2, 3, 4]);
//!
//! // A failed edit changes nothing.
//! let failed = history.apply(|v| -> Result<(), &str> {
//!     v.clear();
//!     Err("refused")
//! });
//! assert_eq!(failed, Err("refused"));
//! assert_eq!(history.len(), 2);
//!
//! assert_eq!(history.undo(), Some(&vec![1, 2, 3]));
//! assert!(history.can_redo());
//! assert_eq!(history.redo(), Some(&vec![1, 2, 3, 4]));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::VecDeque;
use tracing::{debug, trace};

/// Number of snapshots kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 40;

/// Outcome of a successful [`History::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Applied<R> {
    /// Whatever the mutator returned.
    pub output: R,
    /// Whether the edit changed the state and was pushed as a new snapshot.
    pub recorded: bool,
}

/// A bounded stack of snapshots with a cursor marking the active one.
///
/// There is always at least one snapshot, so [`History::current`] never fails.
#[derive(Clone, Debug)]
pub struct History<T> {
    snapshots: VecDeque<T>,
    current: usize,
    capacity: usize,
}

impl<T: Clone + PartialEq> History<T> {
    /// Create a history holding `initial`, with [`DEFAULT_CAPACITY`].
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_CAPACITY)
    }

    /// Create a history holding `initial` that keeps at most `capacity` snapshots.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut snapshots = VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY));
        snapshots.push_back(initial);
        Self {
            snapshots,
            current: 0,
            capacity,
        }
    }

    /// The active snapshot.
    pub fn current(&self) -> &T {
        &self.snapshots[self.current]
    }

    /// Position of the active snapshot, from 0 (oldest kept) to `len() - 1`.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of snapshots kept, including the active one.
    #[allow(
        clippy::len_without_is_empty,
        reason = "A history always holds at least one snapshot."
    )]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Maximum number of snapshots kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if there is an older snapshot to return to.
    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    /// Returns true if an undone snapshot can be restored.
    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.snapshots.len()
    }

    /// Run `mutate` on a copy of the current snapshot and record the result.
    ///
    /// If `mutate` fails, the copy is dropped and the error returned; the history is unchanged.
    /// An edit that leaves the state equal to the current one is not recorded, and the redo
    /// future survives it.
    pub fn apply<R, E>(
        &mut self,
        mutate: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<Applied<R>, E> {
        let mut next = self.current().clone();
        let output = mutate(&mut next)?;
        Ok(Applied {
            output,
            recorded: self.record(next),
        })
    }

    /// Push `state` as the new active snapshot, discarding the redo future.
    ///
    /// States equal to the current snapshot are ignored; returns whether `state` was recorded.
    pub fn record(&mut self, state: T) -> bool {
        if state == *self.current() {
            trace!(current = self.current, "history: unchanged state not recorded");
            return false;
        }
        self.snapshots.truncate(self.current + 1);
        self.snapshots.push_back(state);
        if self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
        self.current = self.snapshots.len() - 1;
        debug!(
            current = self.current,
            len = self.snapshots.len(),
            "history: recorded snapshot"
        );
        true
    }

    /// Step back one snapshot and return it, or `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        debug!(current = self.current, "history: undo");
        Some(self.current())
    }

    /// Step forward one snapshot and return it, or `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        debug!(current = self.current, "history: redo");
        Some(self.current())
    }

    /// Forget every snapshot except the active one.
    pub fn clear(&mut self) {
        self.snapshots.truncate(self.current + 1);
        self.snapshots.drain(..self.current);
        self.current = 0;
    }
}
