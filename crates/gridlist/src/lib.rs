#![forbid(unsafe_code)]

//! Capacity-bounded, change-notifying collections.
//!
//! # Role in gridlist
//! This crate is the collections layer: the concrete sequences and the
//! two-dimensional table a game-data library builds its ordered, resizable
//! structures on (event-command lists, map tile grids, and the like).
//!
//! # Primary types
//! - [`BoundedList`]: capacity-bounded sequence with **precise** structural
//!   events and per-element mutation hooks.
//! - [`SimpleList`]: unbounded sequence with the **collapsed** event policy;
//!   the table's row container.
//! - [`Table`]: rows of [`SimpleList`] with synchronized row/column
//!   dimensions, row event forwarding, and pluggable validation.
//!
//! # Concurrency model
//! Single-threaded and synchronous throughout: every mutation and every
//! event dispatch happens on the caller's stack. A handler that mutates the
//! collection it is observing during dispatch is forbidden by contract and
//! not defended against.

pub mod bounded;
pub mod hooks;
pub mod simple;
pub mod table;
pub mod validator;

pub use bounded::{BoundedConfig, BoundedList};
pub use hooks::{DispatchMode, HookKind, ListHooks, MutationHooks};
pub use simple::SimpleList;
pub use table::{
    RowAttributeEvent, RowEvent, RowId, Table, TableChange, TableConfig, TableRow,
};
pub use validator::{CapacityValidator, TableDims, TableValidator};

pub use gridlist_core::{
    Broadcast, ChangeAction, CollectionError, EventPolicy, ListAttribute, ListChange, Result,
    Subscription,
};
