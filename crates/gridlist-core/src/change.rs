#![forbid(unsafe_code)]

//! Structural and attribute change events.
//!
//! A [`ListChange`] describes one committed structural mutation: what kind
//! of change ([`ChangeAction`]), where it happened, and which items were
//! involved on each side. Sides that do not apply to the action are `None`
//! (indices) or empty (item lists); a `Reset` carries neither indices nor
//! items and means "treat the whole collection as potentially changed".
//!
//! # Invariants
//!
//! 1. `Add` has a new index and new items only.
//! 2. `Replace` has one index (old == new) and both item lists, same length.
//! 3. `Remove` has an old index and old items only.
//! 4. `Move` has both indices and the moved items (in original order) on
//!    both sides.
//! 5. `Reset` has no indices and no items.

/// The kind of a structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    /// Items were appended or inserted.
    Add,
    /// Items were replaced in place; length unchanged.
    Replace,
    /// Items were removed.
    Remove,
    /// A contiguous block of items was relocated.
    Move,
    /// The collection changed wholesale; no per-element diff is available.
    Reset,
}

/// A non-structural property notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListAttribute {
    /// The element count changed.
    Count,
    /// Some indexed element changed (fires for every structural change).
    Indexer,
}

/// One committed structural change, with old/new indices and item lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChange<T> {
    /// What kind of change this is.
    pub action: ChangeAction,
    /// Starting index on the old side, when applicable.
    pub old_index: Option<usize>,
    /// Starting index on the new side, when applicable.
    pub new_index: Option<usize>,
    /// Items on the old side (replaced, removed, or moved-from).
    pub old_items: Vec<T>,
    /// Items on the new side (added, replacing, or moved-to).
    pub new_items: Vec<T>,
}

impl<T> ListChange<T> {
    /// An `Add` of `items` starting at `index`.
    #[must_use]
    pub fn added(index: usize, items: Vec<T>) -> Self {
        Self {
            action: ChangeAction::Add,
            old_index: None,
            new_index: Some(index),
            old_items: Vec::new(),
            new_items: items,
        }
    }

    /// A `Replace` of `old` by `new` starting at `index`.
    #[must_use]
    pub fn replaced(index: usize, old: Vec<T>, new: Vec<T>) -> Self {
        Self {
            action: ChangeAction::Replace,
            old_index: Some(index),
            new_index: Some(index),
            old_items: old,
            new_items: new,
        }
    }

    /// A `Remove` of `items` that started at `index`.
    #[must_use]
    pub fn removed(index: usize, items: Vec<T>) -> Self {
        Self {
            action: ChangeAction::Remove,
            old_index: Some(index),
            new_index: None,
            old_items: items,
            new_items: Vec::new(),
        }
    }

    /// A `Move` of `items` (original order) from `old_index` to `new_index`.
    #[must_use]
    pub fn moved(old_index: usize, new_index: usize, items: Vec<T>) -> Self
    where
        T: Clone,
    {
        Self {
            action: ChangeAction::Move,
            old_index: Some(old_index),
            new_index: Some(new_index),
            old_items: items.clone(),
            new_items: items,
        }
    }

    /// A `Reset`: no indices, no items.
    #[must_use]
    pub fn reset() -> Self {
        Self {
            action: ChangeAction::Reset,
            old_index: None,
            new_index: None,
            old_items: Vec::new(),
            new_items: Vec::new(),
        }
    }

    /// Number of elements this change touched (for policy decisions).
    ///
    /// `Reset` reports the maximum of the two sides, which is only
    /// meaningful for changes built from a known diff; a bare
    /// [`ListChange::reset`] reports 0.
    #[must_use]
    pub fn touched(&self) -> usize {
        self.old_items.len().max(self.new_items.len())
    }
}
