//! Keyed list mutations shared by both pagination engines.
//!
//! Every primitive locates items through a caller-supplied key extractor and
//! never relies on identity. Lookups act on the first matching item only.

use std::{collections::HashSet, hash::Hash};

use derive_more::derive::{Deref, From};

/// Ordered list of items with keyed mutation primitives.
///
/// # Methods
///
/// - `prepend` / `append`: insert unconditionally at the head / tail.
/// - `merge`: append only the items whose key is not present yet.
/// - `insert_after`: insert right after the item with the target key, or at the tail.
/// - `insert_after_group`: insert after the contiguous group that starts at the target key.
/// - `remove`: drop the item with the target key.
/// - `update`: replace the item with the target key by `updater(item)`.
#[derive(Debug, Clone, PartialEq, Eq, Deref, From)]
pub struct KeyedList<T> {
    items: Vec<T>,
}

impl<T> Default for KeyedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> KeyedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replaces the whole list, dropping the previous items.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Appends every item unconditionally.
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
    }

    #[inline]
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    #[inline]
    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Appends the items of `new_items` whose key is not already present.
    ///
    /// Existing items are never overwritten, and duplicates inside
    /// `new_items` are collapsed to their first occurrence. Returns the number
    /// of items actually added.
    pub fn merge<K, F>(&mut self, new_items: impl IntoIterator<Item = T>, key_fn: F) -> usize
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        let mut seen: HashSet<K> = self.items.iter().map(&key_fn).collect();
        let before = self.items.len();

        for item in new_items {
            if seen.insert(key_fn(&item)) {
                self.items.push(item);
            }
        }

        self.items.len() - before
    }

    pub fn insert_after<K, F>(&mut self, item: T, target_key: &K, key_fn: F)
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        match self.position(target_key, key_fn) {
            Some(index) => self.items.insert(index + 1, item),
            None => self.items.push(item),
        }
    }

    /// Inserts `item` after the group that starts at `target_key`.
    ///
    /// The group runs from the item after the target up to and including the
    /// first item for which `is_group_end` holds, or to the end of the list.
    /// Appends when the target is absent.
    pub fn insert_after_group<K, F, G>(&mut self, item: T, target_key: &K, key_fn: F, is_group_end: G)
    where
        K: PartialEq,
        F: Fn(&T) -> K,
        G: Fn(&T) -> bool,
    {
        let Some(target) = self.position(target_key, key_fn) else {
            self.items.push(item);
            return;
        };

        // Right after the group terminator, or the tail.
        let insert_at = self.items[target + 1..]
            .iter()
            .position(&is_group_end)
            .map_or(self.items.len(), |offset| target + offset + 2);

        self.items.insert(insert_at, item);
    }

    /// Removes the first item with `target_key`, returning it.
    pub fn remove<K, F>(&mut self, target_key: &K, key_fn: F) -> Option<T>
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        self.position(target_key, key_fn)
            .map(|index| self.items.remove(index))
    }

    /// Replaces the first item with `target_key` by `updater(item)`.
    /// Returns whether an item was found.
    pub fn update<K, F, U>(&mut self, target_key: &K, key_fn: F, updater: U) -> bool
    where
        K: PartialEq,
        F: Fn(&T) -> K,
        U: FnOnce(T) -> T,
    {
        let Some(index) = self.position(target_key, key_fn) else {
            return false;
        };

        // Move the item out through the tail so no placeholder value is needed.
        let item = self.items.swap_remove(index);
        self.items.push(updater(item));
        let last = self.items.len() - 1;
        self.items.swap(index, last);

        true
    }

    fn position<K, F>(&self, target_key: &K, key_fn: F) -> Option<usize>
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        self.items.iter().position(|item| key_fn(item) == *target_key)
    }
}

impl<T> FromIterator<T> for KeyedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

// region:    --- Tests


// endregion: --- Tests
