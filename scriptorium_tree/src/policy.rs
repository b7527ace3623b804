// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edit policy flags.

bitflags::bitflags! {
    /// Policies applied by structural edits ([`TreeStore::move_node`] and
    /// [`TreeStore::delete_node`]).
    ///
    /// The default enables both.
    ///
    /// [`TreeStore::move_node`]: crate::TreeStore::move_node
    /// [`TreeStore::delete_node`]: crate::TreeStore::delete_node
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EditPolicy: u8 {
        /// Shrink-wrap the ancestors of every parent whose children changed.
        const AUTO_RESIZE       = 0b0000_0001;
        /// Remove non-root ancestors left without children, cascading upward.
        const AUTO_DELETE_EMPTY = 0b0000_0010;
    }
}

impl Default for EditPolicy {
    fn default() -> Self {
        Self::AUTO_RESIZE | Self::AUTO_DELETE_EMPTY
    }
}

impl EditPolicy {
    /// Returns true if ancestors are shrink-wrapped after structural edits.
    pub fn auto_resize(self) -> bool {
        self.contains(Self::AUTO_RESIZE)
    }

    /// Returns true if emptied ancestors are pruned after structural edits.
    pub fn auto_delete_empty(self) -> bool {
        self.contains(Self::AUTO_DELETE_EMPTY)
    }
}
