#![forbid(unsafe_code)]

//! Capacity-bounded list with precise structural-change events.
//!
//! [`BoundedList`] owns an ordered sequence whose length is pinned to a
//! `[min_capacity, max_capacity]` window. Every committed mutation is
//! reported through its change broadcast as the **precise** action — one
//! `Add` carrying all added items, one `Replace` carrying both sides, and so
//! on — never collapsed to a bare `Reset` (with the single deliberate
//! exception of [`BoundedList::clear`], which always fires `Reset`).
//!
//! # Invariants
//!
//! 1. `min_capacity <= len() <= max_capacity` after every public operation.
//! 2. Every operation is all-or-nothing: errors are raised before any
//!    mutation, so a failed call leaves the list untouched.
//! 3. Event flow per mutation: mutate, per-element strategy hooks, matching
//!    handler chain, structural event, attribute events.
//! 4. `clear()` emits exactly one `Reset` even when nothing changed.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `Configuration` | `min_capacity > max_capacity` | no instance produced |
//! | `Range` | index/count/length outside the legal window | list untouched |
//! | Re-entrant handler | handler mutates this list during dispatch | forbidden by contract |

use std::rc::Rc;

use gridlist_core::{
    Broadcast, CollectionError, ListAttribute, ListChange, Result, Subscription,
};
use tracing::debug;

use crate::hooks::{DispatchMode, HookKind, ListHooks, MutationHooks, NoopHooks};

/// Configuration for a [`BoundedList`]: capacity window and default-item
/// factory.
///
/// The factory must produce a usable value for any absolute index; it backs
/// construction fill, `clear`, and `adjust_length` growth.
pub struct BoundedConfig<T> {
    /// Smallest legal length.
    pub min_capacity: usize,
    /// Largest legal length.
    pub max_capacity: usize,
    /// Default-item factory, keyed by absolute index.
    pub factory: Rc<dyn Fn(usize) -> T>,
}

// Manual Clone: shares the factory.
impl<T> Clone for BoundedConfig<T> {
    fn clone(&self) -> Self {
        Self {
            min_capacity: self.min_capacity,
            max_capacity: self.max_capacity,
            factory: Rc::clone(&self.factory),
        }
    }
}

impl<T> std::fmt::Debug for BoundedConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedConfig")
            .field("min_capacity", &self.min_capacity)
            .field("max_capacity", &self.max_capacity)
            .finish_non_exhaustive()
    }
}

impl<T> BoundedConfig<T> {
    /// Create a configuration from bounds and a factory closure.
    #[must_use]
    pub fn new(
        min_capacity: usize,
        max_capacity: usize,
        factory: impl Fn(usize) -> T + 'static,
    ) -> Self {
        Self {
            min_capacity,
            max_capacity,
            factory: Rc::new(factory),
        }
    }

    fn check(&self) -> Result<()> {
        if self.min_capacity > self.max_capacity {
            return Err(CollectionError::Configuration(format!(
                "min_capacity {} > max_capacity {}",
                self.min_capacity, self.max_capacity
            )));
        }
        Ok(())
    }
}

/// A capacity-bounded, change-notifying sequence with precise events.
pub struct BoundedList<T> {
    items: Vec<T>,
    config: BoundedConfig<T>,
    changes: Broadcast<ListChange<T>>,
    attributes: Broadcast<ListAttribute>,
    hooks: MutationHooks<T>,
    strategy: Box<dyn ListHooks<T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for BoundedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedList")
            .field("items", &self.items)
            .field("min_capacity", &self.config.min_capacity)
            .field("max_capacity", &self.config.max_capacity)
            .finish()
    }
}

/// Content equality: same length, pairwise-equal elements, independent of
/// capacity configuration.
impl<T: PartialEq> PartialEq for BoundedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

/// Independent copy: identical content, fresh subscriptions, empty hook
/// chains, no strategy (strategies do not clone).
impl<T: Clone> Clone for BoundedList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            config: self.config.clone(),
            changes: Broadcast::new(),
            attributes: Broadcast::new(),
            hooks: MutationHooks::new(),
            strategy: Box::new(NoopHooks),
        }
    }
}

impl<T: Clone + PartialEq + 'static> BoundedList<T> {
    /// Create a list holding `min_capacity` factory-produced items.
    pub fn new(config: BoundedConfig<T>) -> Result<Self> {
        config.check()?;
        let items = (0..config.min_capacity).map(|i| (config.factory)(i)).collect();
        Ok(Self::assemble(items, config))
    }

    /// Create a list from explicit initial content.
    ///
    /// Fails with `Range` when `items.len()` is outside the capacity window;
    /// no instance is produced.
    pub fn with_items(config: BoundedConfig<T>, items: Vec<T>) -> Result<Self> {
        config.check()?;
        if items.len() < config.min_capacity || items.len() > config.max_capacity {
            return Err(CollectionError::range(
                "length",
                items.len(),
                config.min_capacity,
                config.max_capacity,
            ));
        }
        Ok(Self::assemble(items, config))
    }

    fn assemble(items: Vec<T>, config: BoundedConfig<T>) -> Self {
        Self {
            items,
            config,
            changes: Broadcast::new(),
            attributes: Broadcast::new(),
            hooks: MutationHooks::new(),
            strategy: Box::new(NoopHooks),
        }
    }

    /// Install a per-element mutation strategy (builder style).
    #[must_use]
    pub fn with_strategy(mut self, strategy: Box<dyn ListHooks<T>>) -> Self {
        self.strategy = strategy;
        self
    }

    // ========================================================================
    // Reads (no events, no hooks)
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

    /// Smallest legal length.
    #[must_use]
    pub fn min_capacity(&self) -> usize {
        self.config.min_capacity
    }

    /// Largest legal length.
    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.config.max_capacity
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

    /// Clone the whole content into `dest` starting at `dest_start`.
    pub fn copy_to(&self, dest: &mut [T], dest_start: usize) -> Result<()> {
        let needed = dest_start
            .checked_add(self.items.len())
            .ok_or_else(|| CollectionError::range("index", dest_start, 0, dest.len()))?;
        if needed > dest.len() {
            return Err(CollectionError::range(
                "index",
                dest_start,
                0,
                dest.len().saturating_sub(self.items.len()),
            ));
        }
        dest[dest_start..needed].clone_from_slice(&self.items);
        Ok(())
    }

    // ========================================================================
    // Subscriptions and hooks
    // ========================================================================

    /// Subscribe to structural change events.
    pub fn subscribe_changes(&self, f: impl Fn(&ListChange<T>) + 'static) -> Subscription {
        self.changes.subscribe(f)
    }

    /// Subscribe to attribute (count / indexer) events.
    pub fn subscribe_attributes(&self, f: impl Fn(&ListAttribute) + 'static) -> Subscription {
        self.attributes.subscribe(f)
    }

    /// Register a handler on the chain for `kind` firing in `mode`.
    pub fn register_hook(
        &mut self,
        kind: HookKind,
        mode: DispatchMode,
        handler: impl FnMut(&ListChange<T>) + 'static,
    ) {
        self.hooks.register(kind, mode, handler);
    }

    /// Enable or disable one hook chain.
    pub fn set_hook_enabled(&mut self, kind: HookKind, mode: DispatchMode, enabled: bool) {
        self.hooks.set_enabled(kind, mode, enabled);
    }

    // ========================================================================
    // Mutations (precise policy)
    // ========================================================================

    /// Replace the item at `index`. Emits one `Replace` plus an `Indexer`
    /// attribute event (length unchanged, so no `Count`).
    pub fn set(&mut self, index: usize, item: T) -> Result<()> {
        self.check_index(index)?;
        let new = item.clone();
        let old = std::mem::replace(&mut self.items[index], item);
        self.commit(
            DispatchMode::Caller,
            ListChange::replaced(index, vec![old], vec![new]),
            false,
        );
        Ok(())
    }

    /// Append one item.
    pub fn add(&mut self, item: T) -> Result<()> {
        let index = self.items.len();
        self.insert_range(index, vec![item])
    }

    /// Append several items. Emits ONE `Add` carrying all of them.
    pub fn add_range(&mut self, items: Vec<T>) -> Result<()> {
        let index = self.items.len();
        self.insert_range(index, items)
    }

    /// Insert one item at `index` (`index == len` appends).
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        self.insert_range(index, vec![item])
    }

    /// Insert several items starting at `index`. Emits ONE `Add` carrying
    /// all of them; an empty batch emits nothing.
    pub fn insert_range(&mut self, index: usize, items: Vec<T>) -> Result<()> {
        self.check_insert_index(index)?;
        self.check_growth(items.len())?;
        if items.is_empty() {
            return Ok(());
        }
        self.items.splice(index..index, items.iter().cloned());
        self.commit(DispatchMode::Caller, ListChange::added(index, items), true);
        Ok(())
    }

    /// Replace in range, append beyond range.
    ///
    /// Items landing inside the current length replace in place; items
    /// beyond it are appended. A write spanning both zones emits TWO events
    /// in sequence — `Replace` for the prefix, then `Add` for the suffix —
    /// never a combined event and never a `Reset`.
    pub fn overwrite(&mut self, index: usize, items: Vec<T>) -> Result<()> {
        self.check_insert_index(index)?;
        let replace_count = items.len().min(self.items.len() - index);
        let append_count = items.len() - replace_count;
        self.check_growth(append_count)?;
        if items.is_empty() {
            return Ok(());
        }

        let mut items = items;
        let appended: Vec<T> = items.split_off(replace_count);
        let replacing = items;

        if !replacing.is_empty() {
            let old: Vec<T> = self.items[index..index + replace_count].to_vec();
            self.items[index..index + replace_count].clone_from_slice(&replacing);
            self.commit(
                DispatchMode::Caller,
                ListChange::replaced(index, old, replacing),
                false,
            );
        }
        if !appended.is_empty() {
            let at = self.items.len();
            self.items.extend(appended.iter().cloned());
            self.commit(DispatchMode::Caller, ListChange::added(at, appended), true);
        }
        Ok(())
    }

    /// Relocate one item.
    pub fn move_item(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        self.move_range(old_index, new_index, 1)
    }

    /// Relocate a contiguous block of `count` items to start at `new_index`.
    ///
    /// Emits one `Move` for any `count >= 1`, including identity moves
    /// (`old_index == new_index`); `count == 0` emits nothing.
    pub fn move_range(&mut self, old_index: usize, new_index: usize, count: usize) -> Result<()> {
        self.check_window(old_index, count)?;
        self.check_window(new_index, count)?;
        if count == 0 {
            return Ok(());
        }
        let block: Vec<T> = self.items.drain(old_index..old_index + count).collect();
        self.items.splice(new_index..new_index, block.iter().cloned());
        self.commit(
            DispatchMode::Caller,
            ListChange::moved(old_index, new_index, block),
            false,
        );
        Ok(())
    }

    /// Remove the first occurrence of `item` by equality. Returns whether it
    /// was found; emits `Remove` only when it was.
    pub fn remove(&mut self, item: &T) -> Result<bool> {
        let Some(index) = self.index_of(item) else {
            return Ok(false);
        };
        self.remove_at(index)?;
        Ok(true)
    }

    /// Remove the item at `index`, returning it.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        self.check_floor(1)?;
        let item = self.items.remove(index);
        self.commit(
            DispatchMode::Caller,
            ListChange::removed(index, vec![item.clone()]),
            true,
        );
        Ok(item)
    }

    /// Remove `[index, index + count)`. Emits one `Remove` listing all
    /// removed items; an empty range emits nothing.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        self.check_window(index, count)?;
        self.check_floor(count)?;
        if count == 0 {
            return Ok(());
        }
        let removed: Vec<T> = self.items.drain(index..index + count).collect();
        self.commit(DispatchMode::Caller, ListChange::removed(index, removed), true);
        Ok(())
    }

    /// Grow with factory items or shrink from the tail to exactly
    /// `new_length`. No event when the length already matches.
    pub fn adjust_length(&mut self, new_length: usize) -> Result<()> {
        if new_length < self.config.min_capacity || new_length > self.config.max_capacity {
            return Err(CollectionError::range(
                "length",
                new_length,
                self.config.min_capacity,
                self.config.max_capacity,
            ));
        }
        let len = self.items.len();
        if new_length == len {
            return Ok(());
        }
        if new_length > len {
            self.grow_to(new_length);
        } else {
            let removed: Vec<T> = self.items.drain(new_length..).collect();
            self.commit(
                DispatchMode::Caller,
                ListChange::removed(new_length, removed),
                true,
            );
        }
        Ok(())
    }

    /// Grow to `new_length` if currently shorter; otherwise a silent no-op.
    pub fn adjust_length_if_short(&mut self, new_length: usize) -> Result<()> {
        if self.items.len() >= new_length {
            return Ok(());
        }
        if new_length > self.config.max_capacity {
            return Err(CollectionError::range(
                "length",
                new_length,
                self.config.min_capacity,
                self.config.max_capacity,
            ));
        }
        self.grow_to(new_length);
        Ok(())
    }

    /// Shrink to `new_length` if currently longer; otherwise a silent no-op.
    pub fn adjust_length_if_long(&mut self, new_length: usize) -> Result<()> {
        if self.items.len() <= new_length {
            return Ok(());
        }
        if new_length < self.config.min_capacity {
            return Err(CollectionError::range(
                "length",
                new_length,
                self.config.min_capacity,
                self.config.max_capacity,
            ));
        }
        let removed: Vec<T> = self.items.drain(new_length..).collect();
        self.commit(
            DispatchMode::Caller,
            ListChange::removed(new_length, removed),
            true,
        );
        Ok(())
    }

    /// Reset to exactly `min_capacity` factory items.
    ///
    /// Always emits one `Reset` — even when the content did not actually
    /// change. This is a deliberate exception to the no-event-on-no-op rule.
    pub fn clear(&mut self) {
        self.items = (0..self.config.min_capacity)
            .map(|i| (self.config.factory)(i))
            .collect();
        debug!(
            min_capacity = self.config.min_capacity,
            "bounded list cleared to minimum capacity"
        );
        self.commit(DispatchMode::Internal, ListChange::reset(), true);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Factory-backed growth; dispatches on the Internal chain.
    fn grow_to(&mut self, new_length: usize) {
        let start = self.items.len();
        let grown: Vec<T> = (start..new_length).map(|i| (self.config.factory)(i)).collect();
        self.items.extend(grown.iter().cloned());
        self.commit(DispatchMode::Internal, ListChange::added(start, grown), true);
    }

    /// Committed-mutation tail: strategy hooks, chain, structural event,
    /// attribute events — in that order.
    fn commit(&mut self, mode: DispatchMode, change: ListChange<T>, count_changed: bool) {
        self.invoke_strategy(&change);
        self.hooks.fire(mode, &change);
        self.changes.emit(&change);
        if count_changed {
            self.attributes.emit(&ListAttribute::Count);
        }
        self.attributes.emit(&ListAttribute::Indexer);
    }

    /// Invoke the strategy once per logical element touched.
    fn invoke_strategy(&mut self, change: &ListChange<T>) {
        use gridlist_core::ChangeAction::*;
        match change.action {
            Replace => {
                let index = change.old_index.unwrap_or(0);
                for (i, (old, new)) in
                    change.old_items.iter().zip(&change.new_items).enumerate()
                {
                    self.strategy.on_set(index + i, old, new);
                }
            }
            Add => {
                let index = change.new_index.unwrap_or(0);
                for (i, item) in change.new_items.iter().enumerate() {
                    self.strategy.on_insert(index + i, item);
                }
            }
            Remove => {
                let index = change.old_index.unwrap_or(0);
                for (i, item) in change.old_items.iter().enumerate() {
                    self.strategy.on_remove(index + i, item);
                }
            }
            Move => {
                let (old, new) = (
                    change.old_index.unwrap_or(0),
                    change.new_index.unwrap_or(0),
                );
                for i in 0..change.new_items.len() {
                    self.strategy.on_move(old + i, new + i);
                }
            }
            Reset => self.strategy.on_clear(),
        }
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

    fn check_growth(&self, added: usize) -> Result<()> {
        let target = self.items.len() + added;
        if target > self.config.max_capacity {
            return Err(CollectionError::range(
                "length",
                target,
                self.config.min_capacity,
                self.config.max_capacity,
            ));
        }
        Ok(())
    }

    fn check_floor(&self, removed: usize) -> Result<()> {
        let target = self.items.len().saturating_sub(removed);
        if removed > self.items.len() || target < self.config.min_capacity {
            return Err(CollectionError::range(
                "length",
                target,
                self.config.min_capacity,
                self.config.max_capacity,
            ));
        }
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a BoundedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlist_core::ChangeAction;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn list(min: usize, max: usize) -> BoundedList<String> {
        BoundedList::new(BoundedConfig::new(min, max, |i| format!("d{i}"))).unwrap()
    }

    fn record_changes(
        list: &BoundedList<String>,
    ) -> (Rc<RefCell<Vec<ListChange<String>>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let sub = list.subscribe_changes(move |c| l.borrow_mut().push(c.clone()));
        (log, sub)
    }

    #[test]
    fn construction_fills_to_minimum() {
        let l = list(3, 10);
        assert_eq!(l.as_slice(), ["d0", "d1", "d2"]);
    }

    #[test]
    fn bad_bounds_rejected() {
        let err = BoundedList::new(BoundedConfig::new(5, 2, |_| 0)).unwrap_err();
        assert!(matches!(err, CollectionError::Configuration(_)));
    }

    #[test]
    fn oversized_initial_content_rejected() {
        // min=5, max=10, 11 items: one past the ceiling.
        let items: Vec<String> = (0..11).map(|i| i.to_string()).collect();
        let err =
            BoundedList::with_items(BoundedConfig::new(5, 10, |i| format!("d{i}")), items)
                .unwrap_err();
        assert!(matches!(err, CollectionError::Range { .. }));
    }

    #[test]
    fn add_emits_single_add_at_previous_length() {
        let mut l = list(0, 10);
        let (log, _sub) = record_changes(&l);
        l.add("a".into()).unwrap();

        assert_eq!(l.len(), 1);
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, ChangeAction::Add);
        assert_eq!(log[0].new_index, Some(0));
        assert_eq!(log[0].new_items, vec!["a".to_string()]);
    }

    #[test]
    fn add_range_is_one_event_not_reset() {
        let mut l = list(0, 10);
        let (log, _sub) = record_changes(&l);
        l.add_range(vec!["a".into(), "b".into()]).unwrap();

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, ChangeAction::Add);
        assert_eq!(log[0].new_items.len(), 2);
        assert_eq!(log[0].new_index, Some(0));
    }

    #[test]
    fn empty_insert_range_emits_nothing() {
        let mut l = list(0, 10);
        let (log, _sub) = record_changes(&l);
        l.insert_range(0, vec![]).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn insert_at_len_appends_beyond_len_fails() {
        let mut l = list(0, 10);
        l.insert(0, "a".into()).unwrap();
        l.insert(1, "b".into()).unwrap();
        assert!(l.insert(3, "c".into()).is_err());
        assert_eq!(l.as_slice(), ["a", "b"]);
    }

    #[test]
    fn capacity_ceiling_enforced_atomically() {
        let mut l = list(0, 2);
        l.add_range(vec!["a".into(), "b".into()]).unwrap();
        let (log, _sub) = record_changes(&l);
        assert!(l.add("c".into()).is_err());
        assert_eq!(l.len(), 2);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn set_emits_replace_and_indexer_only() {
        let mut l = list(1, 10);
        let (log, _sub) = record_changes(&l);
        let attrs = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&attrs);
        let _asub = l.subscribe_attributes(move |attr| a.borrow_mut().push(*attr));

        l.set(0, "x".into()).unwrap();
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, ChangeAction::Replace);
        assert_eq!(log[0].old_items, vec!["d0".to_string()]);
        assert_eq!(log[0].new_items, vec!["x".to_string()]);
        assert_eq!(*attrs.borrow(), vec![ListAttribute::Indexer]);
    }

    #[test]
    fn overwrite_spanning_emits_replace_then_add() {
        let mut l = list(0, 10);
        l.add_range(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        let (log, _sub) = record_changes(&l);

        l.overwrite(2, vec!["C".into(), "D".into(), "E".into()]).unwrap();
        assert_eq!(l.as_slice(), ["a", "b", "C", "D", "E"]);

        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].action, ChangeAction::Replace);
        assert_eq!(log[0].old_items, vec!["c".to_string()]);
        assert_eq!(log[0].new_items, vec!["C".to_string()]);
        assert_eq!(log[1].action, ChangeAction::Add);
        assert_eq!(log[1].new_index, Some(3));
        assert_eq!(
            log[1].new_items,
            vec!["D".to_string(), "E".to_string()]
        );
    }

    #[test]
    fn overwrite_fully_in_range_is_one_replace() {
        let mut l = list(0, 10);
        l.add_range(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        let (log, _sub) = record_changes(&l);
        l.overwrite(0, vec!["A".into(), "B".into()]).unwrap();

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, ChangeAction::Replace);
    }

    #[test]
    fn overwrite_capacity_checked_before_any_mutation() {
        let mut l = list(0, 3);
        l.add_range(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        let (log, _sub) = record_changes(&l);
        // Prefix would fit, the appended suffix would not.
        assert!(l.overwrite(2, vec!["C".into(), "D".into()]).is_err());
        assert_eq!(l.as_slice(), ["a", "b", "c"]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn move_fires_even_for_identity() {
        let mut l = list(0, 10);
        l.add_range(vec!["a".into(), "b".into()]).unwrap();
        let (log, _sub) = record_changes(&l);

        l.move_item(1, 1).unwrap();
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, ChangeAction::Move);
        assert_eq!(log[0].old_index, Some(1));
        assert_eq!(log[0].new_index, Some(1));
    }

    #[test]
    fn move_count_zero_is_silent() {
        let mut l = list(0, 10);
        l.add_range(vec!["a".into(), "b".into()]).unwrap();
        let (log, _sub) = record_changes(&l);
        l.move_range(0, 2, 0).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn move_range_relocates_block() {
        let mut l = list(0, 10);
        l.add_range(vec!["a".into(), "b".into(), "c".into(), "d".into()]).unwrap();
        l.move_range(0, 2, 2).unwrap();
        assert_eq!(l.as_slice(), ["c", "d", "a", "b"]);
    }

    #[test]
    fn remove_by_equality_first_occurrence() {
        let mut l = list(0, 10);
        l.add_range(vec!["a".into(), "b".into(), "a".into()]).unwrap();
        let (log, _sub) = record_changes(&l);

        assert!(l.remove(&"a".to_string()).unwrap());
        assert_eq!(l.as_slice(), ["b", "a"]);
        assert_eq!(log.borrow().len(), 1);

        assert!(!l.remove(&"zzz".to_string()).unwrap());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn remove_below_floor_rejected() {
        let mut l = list(2, 10);
        assert!(l.remove_at(0).is_err());
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn remove_range_one_event_all_items() {
        let mut l = list(0, 10);
        l.add_range(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        let (log, _sub) = record_changes(&l);
        l.remove_range(1, 2).unwrap();

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, ChangeAction::Remove);
        assert_eq!(log[0].old_index, Some(1));
        assert_eq!(log[0].old_items, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn adjust_length_idempotent() {
        let mut l = list(0, 10);
        let (log, _sub) = record_changes(&l);

        l.adjust_length(4).unwrap();
        assert_eq!(l.len(), 4);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0].action, ChangeAction::Add);

        l.adjust_length(4).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn adjust_length_out_of_window_rejected() {
        let mut l = list(2, 5);
        assert!(l.adjust_length(1).is_err());
        assert!(l.adjust_length(6).is_err());
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn adjust_if_short_only_grows() {
        let mut l = list(0, 10);
        l.add_range(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        let (log, _sub) = record_changes(&l);

        l.adjust_length_if_short(2).unwrap();
        assert_eq!(l.len(), 3);
        assert!(log.borrow().is_empty());

        l.adjust_length_if_short(5).unwrap();
        assert_eq!(l.len(), 5);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn clear_always_fires_reset() {
        let mut l = list(0, 10);
        let (log, _sub) = record_changes(&l);

        // Already empty at minimum capacity; Reset fires anyway.
        l.clear();
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0].action, ChangeAction::Reset);

        l.clear();
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn clear_restores_minimum_content() {
        let mut l = list(2, 10);
        l.add_range(vec!["x".into(), "y".into()]).unwrap();
        l.clear();
        assert_eq!(l.as_slice(), ["d0", "d1"]);
    }

    #[test]
    fn content_equality_ignores_capacity() {
        let mut a = list(0, 10);
        let mut b = list(0, 99);
        a.add("x".into()).unwrap();
        b.add("x".into()).unwrap();
        assert_eq!(a, b);

        b.add("y".into()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn clone_has_fresh_subscriptions() {
        let mut l = list(0, 10);
        l.add("a".into()).unwrap();
        let (log, _sub) = record_changes(&l);

        let mut copy = l.clone();
        assert_eq!(copy.as_slice(), l.as_slice());

        copy.add("b".into()).unwrap();
        // The original's subscriber saw nothing.
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn strategy_called_once_per_logical_element() {
        struct Counter {
            inserts: Rc<RefCell<Vec<usize>>>,
            removes: Rc<RefCell<Vec<usize>>>,
        }
        impl ListHooks<String> for Counter {
            fn on_insert(&mut self, index: usize, _item: &String) {
                self.inserts.borrow_mut().push(index);
            }
            fn on_remove(&mut self, index: usize, _item: &String) {
                self.removes.borrow_mut().push(index);
            }
        }

        let inserts = Rc::new(RefCell::new(Vec::new()));
        let removes = Rc::new(RefCell::new(Vec::new()));
        let mut l = list(0, 10).with_strategy(Box::new(Counter {
            inserts: Rc::clone(&inserts),
            removes: Rc::clone(&removes),
        }));

        l.insert_range(0, vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(*inserts.borrow(), vec![0, 1, 2]);

        l.remove_range(0, 2).unwrap();
        assert_eq!(*removes.borrow(), vec![0, 1]);
    }

    #[test]
    fn hook_chain_mode_selection() {
        let mut l = list(0, 10);
        let caller = Rc::new(RefCell::new(0u32));
        let internal = Rc::new(RefCell::new(0u32));

        let c = Rc::clone(&caller);
        l.register_hook(HookKind::Insert, DispatchMode::Caller, move |_| {
            *c.borrow_mut() += 1;
        });
        let i = Rc::clone(&internal);
        l.register_hook(HookKind::Insert, DispatchMode::Internal, move |_| {
            *i.borrow_mut() += 1;
        });

        // Caller-supplied items fire the Caller chain.
        l.add("a".into()).unwrap();
        assert_eq!((*caller.borrow(), *internal.borrow()), (1, 0));

        // Factory growth padding fires the Internal chain.
        l.adjust_length(3).unwrap();
        assert_eq!((*caller.borrow(), *internal.borrow()), (1, 1));
    }

    #[test]
    fn reads_emit_nothing() {
        let mut l = list(0, 10);
        l.add_range(vec!["a".into(), "b".into()]).unwrap();
        let (log, _sub) = record_changes(&l);

        let _ = l.get(0).unwrap();
        let _ = l.get_range(0, 2).unwrap();
        assert!(l.contains(&"a".to_string()));
        assert_eq!(l.index_of(&"b".to_string()), Some(1));
        let mut dest = vec![String::new(); 4];
        l.copy_to(&mut dest, 1).unwrap();
        assert_eq!(dest[1], "a");
        assert_eq!(l.iter().count(), 2);

        assert!(log.borrow().is_empty());
    }
}
