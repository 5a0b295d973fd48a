#![forbid(unsafe_code)]

//! The two event-emission policies, kept as named, testable contracts.
//!
//! The framework deliberately carries **both** policies side by side:
//!
//! - [`EventPolicy::Precise`]: every structural change is reported as its
//!   specific action with the full item lists, no matter how many elements
//!   it touched. `BoundedList` speaks this contract.
//! - [`EventPolicy::Collapsed`]: a change touching exactly one element is
//!   reported as its specific action; a change touching more than one
//!   collapses to a single bare `Reset`; a change touching nothing is not
//!   reported at all. `SimpleList` rows and the table's row dimension speak
//!   this contract.
//!
//! Downstream consumers may depend on either contract, so they are never
//! unified or derived from one another.

use crate::change::ListChange;

/// Emission policy for structural change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPolicy {
    /// Always the specific action with full item lists.
    Precise,
    /// One element: the action. Many: a bare Reset. None: silence.
    Collapsed,
}

impl EventPolicy {
    /// Decide what (if anything) to emit for a change produced by one call.
    ///
    /// `Precise` passes the change through untouched, including empty ones
    /// only when the caller chose to build them (the lists themselves skip
    /// building zero-touch changes, so precise lists stay silent on no-ops
    /// too).
    #[must_use]
    pub fn apply<T>(self, change: ListChange<T>) -> Option<ListChange<T>> {
        match self {
            Self::Precise => Some(change),
            Self::Collapsed => match change.touched() {
                0 => None,
                1 => Some(change),
                _ => Some(ListChange::reset()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeAction;

    #[test]
    fn precise_passes_through() {
        let c = ListChange::added(0, vec![1, 2, 3]);
        let out = EventPolicy::Precise.apply(c.clone()).unwrap();
        assert_eq!(out, c);
    }

    #[test]
    fn collapsed_single_keeps_action() {
        let c = ListChange::replaced(4, vec!["old"], vec!["new"]);
        let out = EventPolicy::Collapsed.apply(c).unwrap();
        assert_eq!(out.action, ChangeAction::Replace);
        assert_eq!(out.old_index, Some(4));
    }

    #[test]
    fn collapsed_many_becomes_reset() {
        let c = ListChange::added(0, vec![1, 2]);
        let out = EventPolicy::Collapsed.apply(c).unwrap();
        assert_eq!(out.action, ChangeAction::Reset);
        assert!(out.new_items.is_empty());
    }

    #[test]
    fn collapsed_nothing_is_silent() {
        let c: ListChange<u8> = ListChange::added(0, vec![]);
        assert!(EventPolicy::Collapsed.apply(c).is_none());
    }
}
