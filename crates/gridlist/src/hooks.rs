#![forbid(unsafe_code)]

//! Mutation hooks: per-element strategy callbacks and dual handler chains.
//!
//! Two independent mechanisms observe a list's own mutations from the
//! inside (as opposed to the public [`Broadcast`] events, which observe it
//! from the outside):
//!
//! - [`ListHooks`]: a strategy object injected at construction, invoked once
//!   per **logical element** touched after a mutation commits. An
//!   `insert_range` of N items calls `on_insert` N times regardless of how
//!   the caller batched the request.
//! - [`MutationHooks`]: a registry where each structural-change kind
//!   ([`HookKind`]) owns two handler chains keyed by [`DispatchMode`].
//!   Exactly one chain fires per committed mutation: the one whose mode
//!   matches how the mutation originated. Chains can additionally be
//!   enabled and disabled independently.
//!
//! # Invariants
//!
//! 1. Hooks run after the mutation is committed and before any event is
//!    emitted.
//! 2. Per mutation, at most one chain of the matching kind fires; the other
//!    is silently skipped.
//! 3. `Move` mutations have a per-element hook (`on_move`) but no chain.
//!
//! [`Broadcast`]: gridlist_core::Broadcast

use gridlist_core::{ChangeAction, ListChange};

/// How a mutation originated, selecting which handler chain fires.
///
/// Mutations that materialize factory defaults (construction fill, `clear`
/// refill, `adjust_length` growth padding) dispatch [`Internal`]; mutations
/// over caller-supplied items dispatch [`Caller`].
///
/// [`Internal`]: DispatchMode::Internal
/// [`Caller`]: DispatchMode::Caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// The mutation carries items supplied by the caller.
    Caller,
    /// The mutation materializes factory-produced defaults.
    Internal,
}

impl DispatchMode {
    fn index(self) -> usize {
        match self {
            Self::Caller => 0,
            Self::Internal => 1,
        }
    }
}

/// The four structural-change kinds that own handler chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// In-place replacement (`Replace` changes).
    Set,
    /// Insertion or append (`Add` changes).
    Insert,
    /// Removal (`Remove` changes).
    Remove,
    /// Wholesale reset (`Reset` changes).
    Clear,
}

impl HookKind {
    fn index(self) -> usize {
        match self {
            Self::Set => 0,
            Self::Insert => 1,
            Self::Remove => 2,
            Self::Clear => 3,
        }
    }

    /// The kind a committed change dispatches under, if any (`Move` has no
    /// chain).
    #[must_use]
    pub fn for_action(action: ChangeAction) -> Option<Self> {
        match action {
            ChangeAction::Replace => Some(Self::Set),
            ChangeAction::Add => Some(Self::Insert),
            ChangeAction::Remove => Some(Self::Remove),
            ChangeAction::Reset => Some(Self::Clear),
            ChangeAction::Move => None,
        }
    }
}

/// Per-element mutation strategy, injected at list construction.
///
/// All methods default to no-ops; implementors override the ones they care
/// about. Methods receive `&mut self` so a strategy can accumulate state.
pub trait ListHooks<T> {
    /// One element replaced in place.
    fn on_set(&mut self, index: usize, old: &T, new: &T) {
        let _ = (index, old, new);
    }

    /// One element inserted at `index`.
    fn on_insert(&mut self, index: usize, item: &T) {
        let _ = (index, item);
    }

    /// One element relocated from `old_index` to `new_index`.
    fn on_move(&mut self, old_index: usize, new_index: usize) {
        let _ = (old_index, new_index);
    }

    /// One element removed from `index`.
    fn on_remove(&mut self, index: usize, item: &T) {
        let _ = (index, item);
    }

    /// The list was cleared back to its default content.
    fn on_clear(&mut self) {}
}

/// The do-nothing strategy used when none is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl<T> ListHooks<T> for NoopHooks {}

struct Chain<T> {
    enabled: bool,
    handlers: Vec<Box<dyn FnMut(&ListChange<T>)>>,
}

impl<T> Chain<T> {
    fn new() -> Self {
        Self {
            enabled: true,
            handlers: Vec::new(),
        }
    }
}

/// Registry of dual handler chains, one pair per [`HookKind`].
pub struct MutationHooks<T> {
    // Indexed [kind][mode].
    chains: [[Chain<T>; 2]; 4],
}

impl<T> Default for MutationHooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for MutationHooks<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: usize = self
            .chains
            .iter()
            .flatten()
            .map(|c| c.handlers.len())
            .sum();
        f.debug_struct("MutationHooks")
            .field("registered", &registered)
            .finish()
    }
}

impl<T> MutationHooks<T> {
    /// Create an empty registry; every chain starts enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chains: std::array::from_fn(|_| std::array::from_fn(|_| Chain::new())),
        }
    }

    /// Register a handler on the chain for `kind` that fires in `mode`.
    pub fn register(
        &mut self,
        kind: HookKind,
        mode: DispatchMode,
        handler: impl FnMut(&ListChange<T>) + 'static,
    ) {
        self.chains[kind.index()][mode.index()]
            .handlers
            .push(Box::new(handler));
    }

    /// Enable or disable one chain without touching its handlers.
    pub fn set_enabled(&mut self, kind: HookKind, mode: DispatchMode, enabled: bool) {
        self.chains[kind.index()][mode.index()].enabled = enabled;
    }

    /// Whether the chain for `kind`/`mode` is currently enabled.
    #[must_use]
    pub fn is_enabled(&self, kind: HookKind, mode: DispatchMode) -> bool {
        self.chains[kind.index()][mode.index()].enabled
    }

    /// Fire the chain matching the change's kind in `mode`. The other
    /// chain of the same kind is skipped; `Move` changes fire nothing.
    pub(crate) fn fire(&mut self, mode: DispatchMode, change: &ListChange<T>) {
        let Some(kind) = HookKind::for_action(change.action) else {
            return;
        };
        let chain = &mut self.chains[kind.index()][mode.index()];
        if !chain.enabled {
            return;
        }
        for handler in &mut chain.handlers {
            handler(change);
        }
    }
}
