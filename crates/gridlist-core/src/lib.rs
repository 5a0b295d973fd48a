#![forbid(unsafe_code)]

//! Core: change events, broadcast points, errors, and emission policies.
//!
//! # Role in gridlist
//! `gridlist-core` is the leaf layer. It owns the vocabulary every collection
//! speaks: structural and attribute change events, the subscriber registry
//! that delivers them, the error taxonomy, and the two named event-emission
//! policies (precise vs collapsed).
//!
//! # How it fits in the system
//! The collections layer (`gridlist`) mutates its storage and then describes
//! what happened as a [`ListChange`], delivered through a [`Broadcast`].
//! Nothing in this crate stores items or enforces capacity; it is pure
//! notification plumbing and shared vocabulary.

pub mod broadcast;
pub mod change;
pub mod error;
pub mod policy;

pub use broadcast::{Broadcast, Subscription};
pub use change::{ChangeAction, ListAttribute, ListChange};
pub use error::{CollectionError, Result};
pub use policy::EventPolicy;
