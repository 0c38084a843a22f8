//! Selected-item set.
//!
//! The canvas mirrors membership onto each item's `selected` flag; this set
//! is the source of truth for group operations.

use crate::item::ItemId;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: HashSet<ItemId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns true if `id` was not already selected.
    pub fn insert(&mut self, id: ItemId) -> bool {
        self.selected.insert(id)
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        self.selected.remove(&id)
    }

    /// Flip membership of `id`. Returns the new membership.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Replace the selection with exactly `id`.
    pub fn select_only(&mut self, id: ItemId) {
        self.selected.clear();
        self.selected.insert(id);
    }

    /// Replace the selection with `ids`.
    pub fn replace<I: IntoIterator<Item = ItemId>>(&mut self, ids: I) {
        self.selected = ids.into_iter().collect();
    }

    pub fn extend<I: IntoIterator<Item = ItemId>>(&mut self, ids: I) {
        self.selected.extend(ids);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// True when `id` is selected together with at least one other item.
    pub fn is_multi_member(&self, id: ItemId) -> bool {
        self.selected.len() > 1 && self.selected.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.selected.iter().copied()
    }

    pub fn snapshot(&self) -> HashSet<ItemId> {
        self.selected.clone()
    }

    /// Keep only ids accepted by `keep`.
    pub fn retain<F: FnMut(ItemId) -> bool>(&mut self, mut keep: F) {
        self.selected.retain(|id| keep(*id));
    }
}
