#![forbid(unsafe_code)]

//! Unbounded list with the collapsed event policy.
//!
//! [`SimpleList`] is the lighter sibling of [`BoundedList`]: no capacity
//! window, free growth and shrink, and a **collapsed** notification
//! contract — an operation touching exactly one element reports the precise
//! action with indices, an operation touching more than one reports a single
//! bare `Reset` (consumers treat the whole list as potentially changed), and
//! an operation touching nothing reports nothing at all.
//!
//! Notably, an `overwrite` spanning the replace and append zones with more
//! than one total element collapses to ONE `Reset` — unlike
//! [`BoundedList::overwrite`], which emits a Replace/Add pair. The two
//! contracts coexist on purpose; see [`EventPolicy`].
//!
//! This is the row container the table is composed from.
//!
//! [`BoundedList`]: crate::bounded::BoundedList
//! [`BoundedList::overwrite`]: crate::bounded::BoundedList::overwrite

use std::rc::Rc;

use gridlist_core::{
    Broadcast, CollectionError, EventPolicy, ListAttribute, ListChange, Result, Subscription,
};

/// An unbounded, change-notifying sequence with collapsed events.
pub struct SimpleList<T> {
    items: Vec<T>,
    factory: Rc<dyn Fn(usize) -> T>,
    changes: Broadcast<ListChange<T>>,
    attributes: Broadcast<ListAttribute>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for SimpleList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleList").field("items", &self.items).finish()
    }
}

/// Content equality, ignoring subscriptions and factories.
impl<T: PartialEq> PartialEq for SimpleList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

/// Independent copy: identical content, fresh subscriptions.
impl<T: Clone> Clone for SimpleList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            factory: Rc::clone(&self.factory),
            changes: Broadcast::new(),
            attributes: Broadcast::new(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> SimpleList<T> {
    /// Create an empty list with the given default-item factory.
    #[must_use]
    pub fn new(factory: impl Fn(usize) -> T + 'static) -> Self {
        Self::with_items(factory, Vec::new())
    }

    /// Create a list from explicit initial content.
    #[must_use]
    pub fn with_items(factory: impl Fn(usize) -> T + 'static, items: Vec<T>) -> Self {
        Self {
            items,
            factory: Rc::new(factory),
            changes: Broadcast::new(),
            attributes: Broadcast::new(),
        }
    }

    pub(crate) fn from_shared_factory(factory: Rc<dyn Fn(usize) -> T>, items: Vec<T>) -> Self {
        Self {
            items,
            factory,
            changes: Broadcast::new(),
            attributes: Broadcast::new(),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item at `index`.
    pub fn get(&self, index: usize) -> Result<&T> {
        self.check_index(index)?;
        Ok(&self.items[index])
    }

    /// A cloned snapshot of `[index, index + count)`.
    pub fn get_range(&self, index: usize, count: usize) -> Result<Vec<T>> {
        self.check_window(index, count)?;
        Ok(self.items[index..index + count].to_vec())
    }

    /// The whole content as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Whether `item` occurs in the list (by equality).
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Index of the first occurrence of `item`, if any.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|x| x == item)
    }

    /// Subscribe to structural change events.
    pub fn subscribe_changes(&self, f: impl Fn(&ListChange<T>) + 'static) -> Subscription {
        self.changes.subscribe(f)
    }

    /// Subscribe to attribute (count / indexer) events.
    pub fn subscribe_attributes(&self, f: impl Fn(&ListAttribute) + 'static) -> Subscription {
        self.attributes.subscribe(f)
    }

    // ========================================================================
    // Mutations (collapsed policy)
    // ========================================================================

    /// Replace the item at `index`: one `Replace`.
    pub fn set(&mut self, index: usize, item: T) -> Result<()> {
        self.set_range(index, vec![item])
    }

    /// Replace `[index, index + items.len())` in place. One element emits the
    /// `Replace`; more collapse to `Reset`.
    pub fn set_range(&mut self, index: usize, items: Vec<T>) -> Result<()> {
        self.check_window(index, items.len())?;
        if items.is_empty() {
            return Ok(());
        }
        let old: Vec<T> = self.items[index..index + items.len()].to_vec();
        self.items[index..index + items.len()].clone_from_slice(&items);
        self.commit(ListChange::replaced(index, old, items), false);
        Ok(())
    }

    /// Append one item.
    pub fn add(&mut self, item: T) {
        let index = self.items.len();
        // Cannot fail: appending at the current length.
        let _ = self.insert_range(index, vec![item]);
    }

    /// Append several items.
    pub fn add_range(&mut self, items: Vec<T>) {
        let index = self.items.len();
        let _ = self.insert_range(index, items);
    }

    /// Insert one item at `index` (`index == len` appends).
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        self.insert_range(index, vec![item])
    }

    /// Insert several items starting at `index`.
    pub fn insert_range(&mut self, index: usize, items: Vec<T>) -> Result<()> {
        self.check_insert_index(index)?;
        if items.is_empty() {
            return Ok(());
        }
        self.items.splice(index..index, items.iter().cloned());
        self.commit(ListChange::added(index, items), true);
        Ok(())
    }

    /// Replace in range, append beyond range.
    ///
    /// With more than one total element touched this collapses to ONE
    /// `Reset`, even when the write spans both zones.
    pub fn overwrite(&mut self, index: usize, items: Vec<T>) -> Result<()> {
        self.check_insert_index(index)?;
        if items.is_empty() {
            return Ok(());
        }
        let replace_count = items.len().min(self.items.len() - index);
        let append_count = items.len() - replace_count;

        if items.len() == 1 {
            // Exactly one element: the precise action survives collapse.
            if replace_count == 1 {
                return self.set_range(index, items);
            }
            return self.insert_range(index, items);
        }

        let mut items = items;
        let appended = items.split_off(replace_count);
        self.items[index..index + replace_count].clone_from_slice(&items);
        self.items.extend(appended);
        self.commit_reset(append_count > 0);
        Ok(())
    }

    /// Relocate one item: one `Move`.
    pub fn move_item(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        self.move_range(old_index, new_index, 1)
    }

    /// Relocate a block of `count` items to start at `new_index`. A single
    /// element emits the `Move`; more collapse to `Reset`; zero is silent.
    pub fn move_range(&mut self, old_index: usize, new_index: usize, count: usize) -> Result<()> {
        self.check_window(old_index, count)?;
        self.check_window(new_index, count)?;
        if count == 0 {
            return Ok(());
        }
        let block: Vec<T> = self.items.drain(old_index..old_index + count).collect();
        self.items.splice(new_index..new_index, block.iter().cloned());
        self.commit(ListChange::moved(old_index, new_index, block), false);
        Ok(())
    }

    /// Remove the first occurrence of `item` by equality.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(index) = self.index_of(item) else {
            return false;
        };
        let _ = self.remove_at(index);
        true
    }

    /// Remove the item at `index`, returning it: one `Remove`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        let item = self.items.remove(index);
        self.commit(ListChange::removed(index, vec![item.clone()]), true);
        Ok(item)
    }

    /// Remove `[index, index + count)`.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        self.check_window(index, count)?;
        if count == 0 {
            return Ok(());
        }
        let removed: Vec<T> = self.items.drain(index..index + count).collect();
        self.commit(ListChange::removed(index, removed), true);
        Ok(())
    }

    /// Grow with factory items or shrink from the tail to exactly
    /// `new_length`; silent when unchanged.
    pub fn adjust(&mut self, new_length: usize) {
        let len = self.items.len();
        if new_length > len {
            let grown: Vec<T> = (len..new_length).map(|i| (self.factory)(i)).collect();
            self.items.extend(grown.iter().cloned());
            self.commit(ListChange::added(len, grown), true);
        } else if new_length < len {
            let removed: Vec<T> = self.items.drain(new_length..).collect();
            self.commit(ListChange::removed(new_length, removed), true);
        }
    }

    /// Grow to `new_length` if currently shorter; otherwise a silent no-op.
    pub fn adjust_if_short(&mut self, new_length: usize) {
        if self.items.len() < new_length {
            self.adjust(new_length);
        }
    }

    /// Shrink to `new_length` if currently longer; otherwise a silent no-op.
    pub fn adjust_if_long(&mut self, new_length: usize) {
        if self.items.len() > new_length {
            self.adjust(new_length);
        }
    }

    /// Remove everything.
    ///
    /// Always emits one `Reset`, even when the list was already empty. This
    /// mirrors the bounded list's clear quirk.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit_reset(true);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn commit(&mut self, change: ListChange<T>, count_changed: bool) {
        if let Some(event) = EventPolicy::Collapsed.apply(change) {
            self.changes.emit(&event);
            if count_changed {
                self.attributes.emit(&ListAttribute::Count);
            }
            self.attributes.emit(&ListAttribute::Indexer);
        }
    }

    fn commit_reset(&mut self, count_changed: bool) {
        self.changes.emit(&ListChange::reset());
        if count_changed {
            self.attributes.emit(&ListAttribute::Count);
        }
        self.attributes.emit(&ListAttribute::Indexer);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(CollectionError::range(
                "index",
                index,
                0,
                self.items.len().saturating_sub(1),
            ));
        }
        Ok(())
    }

    fn check_insert_index(&self, index: usize) -> Result<()> {
        if index > self.items.len() {
            return Err(CollectionError::range("index", index, 0, self.items.len()));
        }
        Ok(())
    }

    fn check_window(&self, index: usize, count: usize) -> Result<()> {
        let end = index
            .checked_add(count)
            .ok_or_else(|| CollectionError::range("count", count, 0, self.items.len()))?;
        if end > self.items.len() {
            return Err(CollectionError::range(
                "count",
                count,
                0,
                self.items.len().saturating_sub(index),
            ));
        }
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a SimpleList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
