#![forbid(unsafe_code)]

//! Two-dimensional table composed of [`SimpleList`] rows.
//!
//! A [`Table`] owns an ordered sequence of rows and keeps two dimensions in
//! lockstep: the row count (bounded by `min_rows..=max_rows`) and the column
//! count (bounded by `min_columns..=max_columns`, tracked even while the
//! table has no rows). Every row is attached on entry — the table subscribes
//! to the row's structural and attribute broadcasts and re-emits them,
//! tagged with the row's [`RowId`], through two table-scoped broadcast
//! points — and detached on exit, dropping the subscription guards before
//! the row is released, so a detached row can never notify the table again.
//!
//! # Event contracts
//!
//! - Row-dimension operations use the **collapsed** policy at the table
//!   level: one row touched emits the specific [`TableChange`], several
//!   collapse to a table `Reset`, none is silence. They never emit
//!   row-level events.
//! - Column-dimension operations apply the collapsed policy independently
//!   inside EVERY row and never emit a table-level event: the set of rows
//!   did not change, only each row's content did.
//! - `reset`/`clear` always emit exactly one table `Reset` and zero
//!   row-level events (old rows are discarded, not diffed).
//!
//! # Invariants
//!
//! 1. Every row's length equals `column_count()` after every operation.
//! 2. Attach/detach and row-list membership change together: a reader never
//!    observes a row in the list without its subscription, or vice versa.
//! 3. Every public operation consults the [`TableValidator`] first;
//!    rejection is total (nothing mutated, attached, or detached).

use std::rc::Rc;

use gridlist_core::{
    Broadcast, ChangeAction, CollectionError, ListAttribute, ListChange, Result, Subscription,
};
use tracing::{debug, trace};

use crate::simple::SimpleList;
use crate::validator::{CapacityValidator, TableDims, TableValidator};

/// A row of a [`Table`]: anything wrapping a [`SimpleList`] of items.
///
/// `SimpleList<T>` itself implements this, so `Table<SimpleList<T>>` works
/// without a wrapper type; game-data code supplies richer row types.
pub trait TableRow: 'static {
    /// The cell type.
    type Item: Clone + PartialEq + 'static;

    /// The row's item container.
    fn items(&self) -> &SimpleList<Self::Item>;

    /// Mutable access to the row's item container.
    fn items_mut(&mut self) -> &mut SimpleList<Self::Item>;
}

impl<T: Clone + PartialEq + 'static> TableRow for SimpleList<T> {
    type Item = T;

    fn items(&self) -> &SimpleList<T> {
        self
    }

    fn items_mut(&mut self) -> &mut SimpleList<T> {
        self
    }
}

/// Stable identity of a row while attached to a table.
///
/// Ids are assigned at attach time and never reused within one table; they
/// travel in table-level events in place of row values (rows are uniquely
/// owned, so identity cannot travel by clone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(u64);

/// A structural change of the table's row dimension, carrying row ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableChange {
    /// What kind of change this is.
    pub action: ChangeAction,
    /// Starting row index on the old side, when applicable.
    pub old_index: Option<usize>,
    /// Starting row index on the new side, when applicable.
    pub new_index: Option<usize>,
    /// Ids of rows on the old side.
    pub old_rows: Vec<RowId>,
    /// Ids of rows on the new side.
    pub new_rows: Vec<RowId>,
}

impl TableChange {
    fn added(index: usize, rows: Vec<RowId>) -> Self {
        Self {
            action: ChangeAction::Add,
            old_index: None,
            new_index: Some(index),
            old_rows: Vec::new(),
            new_rows: rows,
        }
    }

    fn replaced(index: usize, old: Vec<RowId>, new: Vec<RowId>) -> Self {
        Self {
            action: ChangeAction::Replace,
            old_index: Some(index),
            new_index: Some(index),
            old_rows: old,
            new_rows: new,
        }
    }

    fn removed(index: usize, rows: Vec<RowId>) -> Self {
        Self {
            action: ChangeAction::Remove,
            old_index: Some(index),
            new_index: None,
            old_rows: rows,
            new_rows: Vec::new(),
        }
    }

    fn moved(old_index: usize, new_index: usize, rows: Vec<RowId>) -> Self {
        Self {
            action: ChangeAction::Move,
            old_index: Some(old_index),
            new_index: Some(new_index),
            old_rows: rows.clone(),
            new_rows: rows,
        }
    }

    fn reset() -> Self {
        Self {
            action: ChangeAction::Reset,
            old_index: None,
            new_index: None,
            old_rows: Vec::new(),
            new_rows: Vec::new(),
        }
    }

    /// Number of rows this change touched.
    #[must_use]
    pub fn touched(&self) -> usize {
        self.old_rows.len().max(self.new_rows.len())
    }
}

/// A row-level structural event re-emitted through the table, tagged with
/// the originating row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEvent<T> {
    /// The row the change happened in.
    pub row: RowId,
    /// The row's own structural change.
    pub change: ListChange<T>,
}

/// A row-level attribute event re-emitted through the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAttributeEvent {
    /// The row the change happened in.
    pub row: RowId,
    /// The attribute that changed.
    pub attribute: ListAttribute,
}

/// Configuration for a [`Table`]: capacity bounds, factories, validator.
pub struct TableConfig<R: TableRow> {
    /// Row-dimension capacity floor.
    pub min_rows: usize,
    /// Row-dimension capacity ceiling.
    pub max_rows: usize,
    /// Column-dimension capacity floor.
    pub min_columns: usize,
    /// Column-dimension capacity ceiling.
    pub max_columns: usize,
    /// Builds a row from a prepared item container.
    pub row_factory: Rc<dyn Fn(SimpleList<R::Item>) -> R>,
    /// Default cell value, keyed by (row, column).
    pub item_factory: Rc<dyn Fn(usize, usize) -> R::Item>,
    /// Precondition strategy consulted by every public operation.
    pub validator: Rc<dyn TableValidator<R>>,
}

// Manual Clone: shares factories and validator.
impl<R: TableRow> Clone for TableConfig<R> {
    fn clone(&self) -> Self {
        Self {
            min_rows: self.min_rows,
            max_rows: self.max_rows,
            min_columns: self.min_columns,
            max_columns: self.max_columns,
            row_factory: Rc::clone(&self.row_factory),
            item_factory: Rc::clone(&self.item_factory),
            validator: Rc::clone(&self.validator),
        }
    }
}

impl<R: TableRow> std::fmt::Debug for TableConfig<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableConfig")
            .field("min_rows", &self.min_rows)
            .field("max_rows", &self.max_rows)
            .field("min_columns", &self.min_columns)
            .field("max_columns", &self.max_columns)
            .finish_non_exhaustive()
    }
}

impl<R: TableRow> TableConfig<R> {
    /// Create a configuration with the default [`CapacityValidator`].
    #[must_use]
    pub fn new(
        min_rows: usize,
        max_rows: usize,
        min_columns: usize,
        max_columns: usize,
        row_factory: impl Fn(SimpleList<R::Item>) -> R + 'static,
        item_factory: impl Fn(usize, usize) -> R::Item + 'static,
    ) -> Self {
        Self {
            min_rows,
            max_rows,
            min_columns,
            max_columns,
            row_factory: Rc::new(row_factory),
            item_factory: Rc::new(item_factory),
            validator: Rc::new(CapacityValidator),
        }
    }

    /// Swap in a custom validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Rc<dyn TableValidator<R>>) -> Self {
        self.validator = validator;
        self
    }

    fn check(&self) -> Result<()> {
        if self.min_rows > self.max_rows {
            return Err(CollectionError::Configuration(format!(
                "min_rows {} > max_rows {}",
                self.min_rows, self.max_rows
            )));
        }
        if self.min_columns > self.max_columns {
            return Err(CollectionError::Configuration(format!(
                "min_columns {} > max_columns {}",
                self.min_columns, self.max_columns
            )));
        }
        Ok(())
    }
}

/// One attached row: the row itself plus the subscription guards tying its
/// broadcasts to the table. Dropping the slot severs the notification path.
struct RowSlot<R> {
    id: RowId,
    row: R,
    _change_sub: Subscription,
    _attr_sub: Subscription,
}

/// A two-dimensional, change-notifying grid of rows.
pub struct Table<R: TableRow> {
    slots: Vec<RowSlot<R>>,
    /// Tracked independently of row presence.
    column_count: usize,
    next_id: u64,
    config: TableConfig<R>,
    changes: Broadcast<TableChange>,
    attributes: Broadcast<ListAttribute>,
    row_changes: Broadcast<RowEvent<R::Item>>,
    row_attributes: Broadcast<RowAttributeEvent>,
}

impl<R: TableRow + std::fmt::Debug> std::fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("row_count", &self.slots.len())
            .field("column_count", &self.column_count)
            .finish_non_exhaustive()
    }
}

/// Independent copy: cloned rows, fresh attachments and subscriptions.
impl<R: TableRow + Clone> Clone for Table<R> {
    fn clone(&self) -> Self {
        let mut copy = Self {
            slots: Vec::with_capacity(self.slots.len()),
            column_count: self.column_count,
            next_id: 0,
            config: self.config.clone(),
            changes: Broadcast::new(),
            attributes: Broadcast::new(),
            row_changes: Broadcast::new(),
            row_attributes: Broadcast::new(),
        };
        for slot in &self.slots {
            let attached = copy.attach(slot.row.clone());
            copy.slots.push(attached);
        }
        copy
    }
}

impl<R: TableRow> Table<R> {
    /// Create a table holding `min_rows` default rows of `min_columns`
    /// default items.
    pub fn new(config: TableConfig<R>) -> Result<Self> {
        config.check()?;
        let mut table = Self::assemble(config);
        table.column_count = table.config.min_columns;
        for r in 0..table.config.min_rows {
            let row = table.make_default_row(r, table.config.min_columns);
            let slot = table.attach(row);
            table.slots.push(slot);
        }
        Ok(table)
    }

    /// Create a table from explicit rows (uniform width required).
    pub fn with_rows(config: TableConfig<R>, rows: Vec<R>) -> Result<Self> {
        config.check()?;
        let dims = TableDims {
            row_count: 0,
            column_count: config.min_columns,
            min_rows: config.min_rows,
            max_rows: config.max_rows,
            min_columns: config.min_columns,
            max_columns: config.max_columns,
        };
        config.validator.reset(dims, &rows)?;
        let mut table = Self::assemble(config);
        table.column_count = rows
            .first()
            .map_or(table.config.min_columns, |r| r.items().len());
        for row in rows {
            let slot = table.attach(row);
            table.slots.push(slot);
        }
        Ok(table)
    }

    /// Create a table from a row-major value grid; the inverse of
    /// [`Table::to_two_dimensional_array`] with `transpose == false`.
    pub fn with_values(config: TableConfig<R>, values: Vec<Vec<R::Item>>) -> Result<Self> {
        let mut rows = Vec::with_capacity(values.len());
        for (r, row_values) in values.into_iter().enumerate() {
            let factory = Rc::clone(&config.item_factory);
            let row_factory: Rc<dyn Fn(usize) -> R::Item> = Rc::new(move |c| factory(r, c));
            rows.push((config.row_factory)(SimpleList::from_shared_factory(
                row_factory,
                row_values,
            )));
        }
        Self::with_rows(config, rows)
    }

    fn assemble(config: TableConfig<R>) -> Self {
        Self {
            slots: Vec::new(),
            column_count: 0,
            next_id: 0,
            config,
            changes: Broadcast::new(),
            attributes: Broadcast::new(),
            row_changes: Broadcast::new(),
            row_attributes: Broadcast::new(),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.slots.len()
    }

    /// Current number of columns (tracked even with zero rows).
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// The row at `index`.
    pub fn get_row(&self, index: usize) -> Result<&R> {
        self.config.validator.get_row(self.dims(), index, 1)?;
        Ok(&self.slots[index].row)
    }

    /// The rows in `[index, index + count)`.
    pub fn get_row_range(&self, index: usize, count: usize) -> Result<Vec<&R>> {
        self.config.validator.get_row(self.dims(), index, count)?;
        Ok(self.slots[index..index + count].iter().map(|s| &s.row).collect())
    }

    /// Iterate over all rows.
    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.slots.iter().map(|s| &s.row)
    }

    /// The id of the row at `index`.
    pub fn row_id_at(&self, index: usize) -> Result<RowId> {
        self.config.validator.get_row(self.dims(), index, 1)?;
        Ok(self.slots[index].id)
    }

    /// The current index of the row with id `id`, if attached.
    #[must_use]
    pub fn index_of_row(&self, id: RowId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    /// A cloned snapshot of the column at `index`, top to bottom.
    pub fn get_column(&self, index: usize) -> Result<Vec<R::Item>> {
        self.config.validator.get_column(self.dims(), index, 1)?;
        self.slots
            .iter()
            .map(|s| s.row.items().get(index).cloned())
            .collect()
    }

    /// Cloned snapshots of the columns in `[index, index + count)`.
    pub fn get_column_range(&self, index: usize, count: usize) -> Result<Vec<Vec<R::Item>>> {
        self.config.validator.get_column(self.dims(), index, count)?;
        (index..index + count)
            .map(|c| {
                self.slots
                    .iter()
                    .map(|s| s.row.items().get(c).cloned())
                    .collect()
            })
            .collect()
    }

    /// A cloned snapshot of one cell.
    pub fn get_item(&self, row: usize, column: usize) -> Result<R::Item> {
        self.config.validator.get_item(self.dims(), row, column)?;
        self.slots[row].row.items().get(column).cloned()
    }

    /// Materialize the grid, row-major (or column-major with `transpose`).
    #[must_use]
    pub fn to_two_dimensional_array(&self, transpose: bool) -> Vec<Vec<R::Item>> {
        if transpose {
            (0..self.column_count)
                .map(|c| {
                    self.slots
                        .iter()
                        .map(|s| s.row.items().as_slice()[c].clone())
                        .collect()
                })
                .collect()
        } else {
            self.slots
                .iter()
                .map(|s| s.row.items().as_slice().to_vec())
                .collect()
        }
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Subscribe to table-level structural changes (row dimension).
    pub fn subscribe_changes(&self, f: impl Fn(&TableChange) + 'static) -> Subscription {
        self.changes.subscribe(f)
    }

    /// Subscribe to table-level attribute events (row count / indexer).
    pub fn subscribe_attributes(&self, f: impl Fn(&ListAttribute) + 'static) -> Subscription {
        self.attributes.subscribe(f)
    }

    /// Subscribe to forwarded row-level structural changes.
    pub fn subscribe_row_changes(
        &self,
        f: impl Fn(&RowEvent<R::Item>) + 'static,
    ) -> Subscription {
        self.row_changes.subscribe(f)
    }

    /// Subscribe to forwarded row-level attribute events.
    pub fn subscribe_row_attributes(
        &self,
        f: impl Fn(&RowAttributeEvent) + 'static,
    ) -> Subscription {
        self.row_attributes.subscribe(f)
    }

    // ========================================================================
    // Row-dimension mutations (collapsed policy at table level)
    // ========================================================================

    /// Replace the row at `index`.
    pub fn set_row(&mut self, index: usize, row: R) -> Result<()> {
        self.set_row_range(index, vec![row])
    }

    /// Replace the rows in `[index, index + rows.len())`.
    pub fn set_row_range(&mut self, index: usize, rows: Vec<R>) -> Result<()> {
        self.config.validator.set_row(self.dims(), index, &rows)?;
        if rows.is_empty() {
            return Ok(());
        }
        let count = rows.len();
        let mut new_slots = Vec::with_capacity(count);
        for row in rows {
            new_slots.push(self.attach(row));
        }
        let new_ids: Vec<RowId> = new_slots.iter().map(|s| s.id).collect();
        let old_slots: Vec<RowSlot<R>> =
            self.slots.splice(index..index + count, new_slots).collect();
        let old_ids: Vec<RowId> = old_slots.iter().map(|s| s.id).collect();
        drop(old_slots);
        self.commit_table(TableChange::replaced(index, old_ids, new_ids), false);
        Ok(())
    }

    /// Append one row.
    pub fn add_row(&mut self, row: R) -> Result<()> {
        let index = self.slots.len();
        self.insert_row_range(index, vec![row])
    }

    /// Append several rows.
    pub fn add_row_range(&mut self, rows: Vec<R>) -> Result<()> {
        let index = self.slots.len();
        self.insert_row_range(index, rows)
    }

    /// Insert one row at `index`.
    pub fn insert_row(&mut self, index: usize, row: R) -> Result<()> {
        self.insert_row_range(index, vec![row])
    }

    /// Insert several rows starting at `index`.
    pub fn insert_row_range(&mut self, index: usize, rows: Vec<R>) -> Result<()> {
        self.config.validator.insert_row(self.dims(), index, &rows)?;
        if rows.is_empty() {
            return Ok(());
        }
        if self.slots.is_empty() {
            // An empty table adopts the incoming width (validated above).
            self.column_count = rows[0].items().len();
        }
        let mut new_slots = Vec::with_capacity(rows.len());
        for row in rows {
            new_slots.push(self.attach(row));
        }
        let ids: Vec<RowId> = new_slots.iter().map(|s| s.id).collect();
        self.slots.splice(index..index, new_slots);
        self.commit_table(TableChange::added(index, ids), true);
        Ok(())
    }

    /// Replace rows in range, append rows beyond range. More than one row
    /// touched collapses to a single table `Reset`.
    pub fn overwrite_rows(&mut self, index: usize, rows: Vec<R>) -> Result<()> {
        self.config.validator.overwrite_row(self.dims(), index, &rows)?;
        if rows.is_empty() {
            return Ok(());
        }
        if self.slots.is_empty() {
            self.column_count = rows[0].items().len();
        }
        let total = rows.len();
        let replace_count = total.min(self.slots.len() - index);
        let append_count = total - replace_count;

        let mut new_slots = Vec::with_capacity(total);
        for row in rows {
            new_slots.push(self.attach(row));
        }
        let new_ids: Vec<RowId> = new_slots.iter().map(|s| s.id).collect();
        let old_slots: Vec<RowSlot<R>> = self
            .slots
            .splice(index..index + replace_count, new_slots)
            .collect();
        let old_ids: Vec<RowId> = old_slots.iter().map(|s| s.id).collect();
        drop(old_slots);

        if total == 1 {
            if replace_count == 1 {
                self.commit_table(TableChange::replaced(index, old_ids, new_ids), false);
            } else {
                self.commit_table(TableChange::added(index, new_ids), true);
            }
        } else {
            self.changes.emit(&TableChange::reset());
            if append_count > 0 {
                self.attributes.emit(&ListAttribute::Count);
            }
            self.attributes.emit(&ListAttribute::Indexer);
        }
        Ok(())
    }

    /// Relocate one row.
    pub fn move_row(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        self.move_row_range(old_index, new_index, 1)
    }

    /// Relocate a block of rows. Subscriptions travel with the rows; the
    /// rows stay attached throughout.
    pub fn move_row_range(
        &mut self,
        old_index: usize,
        new_index: usize,
        count: usize,
    ) -> Result<()> {
        self.config
            .validator
            .move_row(self.dims(), old_index, new_index, count)?;
        if count == 0 {
            return Ok(());
        }
        let block: Vec<RowSlot<R>> = self.slots.drain(old_index..old_index + count).collect();
        let ids: Vec<RowId> = block.iter().map(|s| s.id).collect();
        self.slots.splice(new_index..new_index, block);
        self.commit_table(TableChange::moved(old_index, new_index, ids), false);
        Ok(())
    }

    /// Remove the row at `index`, returning it detached.
    pub fn remove_row(&mut self, index: usize) -> Result<R> {
        let mut rows = self.remove_row_range_inner(index, 1)?;
        Ok(rows.pop().expect("one row removed"))
    }

    /// Remove `[index, index + count)`, returning the detached rows.
    pub fn remove_row_range(&mut self, index: usize, count: usize) -> Result<Vec<R>> {
        self.remove_row_range_inner(index, count)
    }

    fn remove_row_range_inner(&mut self, index: usize, count: usize) -> Result<Vec<R>> {
        self.config.validator.remove_row(self.dims(), index, count)?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let removed: Vec<RowSlot<R>> = self.slots.drain(index..index + count).collect();
        let ids: Vec<RowId> = removed.iter().map(|s| s.id).collect();
        // Destructuring drops the subscription guards: detach before the
        // rows are handed back.
        let rows: Vec<R> = removed
            .into_iter()
            .map(|slot| {
                trace!(row = slot.id.0, "row detached");
                let RowSlot { row, .. } = slot;
                row
            })
            .collect();
        self.commit_table(TableChange::removed(index, ids), true);
        Ok(rows)
    }

    /// Replace the whole row set. Always emits exactly one table `Reset`.
    pub fn reset(&mut self, rows: Vec<R>) -> Result<()> {
        self.config.validator.reset(self.dims(), &rows)?;
        self.slots.clear();
        if let Some(width) = rows.first().map(|r| r.items().len()) {
            self.column_count = width;
        }
        for row in rows {
            let slot = self.attach(row);
            self.slots.push(slot);
        }
        debug!(rows = self.slots.len(), "table reset");
        self.emit_table_reset();
        Ok(())
    }

    /// Reset to `min_rows` default rows of `min_columns` default items.
    /// Always emits exactly one table `Reset`, even when nothing changed.
    pub fn clear(&mut self) -> Result<()> {
        self.config.validator.clear(self.dims())?;
        self.slots.clear();
        self.column_count = self.config.min_columns;
        for r in 0..self.config.min_rows {
            let row = self.make_default_row(r, self.config.min_columns);
            let slot = self.attach(row);
            self.slots.push(slot);
        }
        debug!(
            rows = self.config.min_rows,
            columns = self.config.min_columns,
            "table cleared to minimum capacity"
        );
        self.emit_table_reset();
        Ok(())
    }

    // ========================================================================
    // Column-dimension mutations (collapsed policy inside every row,
    // never a table-level event)
    // ========================================================================

    /// Replace the column at `index` with `column` (top to bottom).
    pub fn set_column(&mut self, index: usize, column: Vec<R::Item>) -> Result<()> {
        self.set_column_range(index, vec![column])
    }

    /// Replace the columns in `[index, index + columns.len())`.
    pub fn set_column_range(&mut self, index: usize, columns: Vec<Vec<R::Item>>) -> Result<()> {
        self.config.validator.set_column(self.dims(), index, &columns)?;
        if columns.is_empty() {
            return Ok(());
        }
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let values: Vec<R::Item> = columns.iter().map(|c| c[i].clone()).collect();
            slot.row.items_mut().set_range(index, values)?;
        }
        Ok(())
    }

    /// Append one column.
    pub fn add_column(&mut self, column: Vec<R::Item>) -> Result<()> {
        let index = self.column_count;
        self.insert_column_range(index, vec![column])
    }

    /// Append several columns.
    pub fn add_column_range(&mut self, columns: Vec<Vec<R::Item>>) -> Result<()> {
        let index = self.column_count;
        self.insert_column_range(index, columns)
    }

    /// Insert one column at `index`.
    pub fn insert_column(&mut self, index: usize, column: Vec<R::Item>) -> Result<()> {
        self.insert_column_range(index, vec![column])
    }

    /// Insert several columns starting at `index`.
    pub fn insert_column_range(&mut self, index: usize, columns: Vec<Vec<R::Item>>) -> Result<()> {
        self.config
            .validator
            .insert_column(self.dims(), index, &columns)?;
        if columns.is_empty() {
            return Ok(());
        }
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let values: Vec<R::Item> = columns.iter().map(|c| c[i].clone()).collect();
            slot.row.items_mut().insert_range(index, values)?;
        }
        self.column_count += columns.len();
        Ok(())
    }

    /// Replace columns in range, append columns beyond range. Each row
    /// applies its own collapsed policy (a spanning multi-column write
    /// collapses to one `Reset` per row).
    pub fn overwrite_columns(&mut self, index: usize, columns: Vec<Vec<R::Item>>) -> Result<()> {
        self.config
            .validator
            .overwrite_column(self.dims(), index, &columns)?;
        if columns.is_empty() {
            return Ok(());
        }
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let values: Vec<R::Item> = columns.iter().map(|c| c[i].clone()).collect();
            slot.row.items_mut().overwrite(index, values)?;
        }
        self.column_count = self.column_count.max(index + columns.len());
        Ok(())
    }

    /// Relocate one column.
    pub fn move_column(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        self.move_column_range(old_index, new_index, 1)
    }

    /// Relocate a block of columns inside every row.
    pub fn move_column_range(
        &mut self,
        old_index: usize,
        new_index: usize,
        count: usize,
    ) -> Result<()> {
        self.config
            .validator
            .move_column(self.dims(), old_index, new_index, count)?;
        if count == 0 {
            return Ok(());
        }
        for slot in &mut self.slots {
            slot.row.items_mut().move_range(old_index, new_index, count)?;
        }
        Ok(())
    }

    /// Remove the column at `index`.
    pub fn remove_column(&mut self, index: usize) -> Result<()> {
        self.remove_column_range(index, 1)
    }

    /// Remove the columns in `[index, index + count)`.
    pub fn remove_column_range(&mut self, index: usize, count: usize) -> Result<()> {
        self.config
            .validator
            .remove_column(self.dims(), index, count)?;
        if count == 0 {
            return Ok(());
        }
        for slot in &mut self.slots {
            slot.row.items_mut().remove_range(index, count)?;
        }
        self.column_count -= count;
        Ok(())
    }

    // ========================================================================
    // Cell and whole-table mutations
    // ========================================================================

    /// Replace one cell: exactly one row-level `Replace`, no table event.
    pub fn set_item(&mut self, row: usize, column: usize, item: R::Item) -> Result<()> {
        self.config
            .validator
            .set_item(self.dims(), row, column, &item)?;
        self.slots[row].row.items_mut().set(column, item)
    }

    /// Resize both dimensions in one call.
    ///
    /// The column dimension is adjusted on the existing rows first; the row
    /// dimension then grows with rows already built at the target width (so
    /// new rows emit no column-adjust events) or shrinks from the tail.
    /// Each dimension fires its own collapsed events only if it changed.
    pub fn adjust_length(&mut self, row_length: usize, column_length: usize) -> Result<()> {
        self.config
            .validator
            .adjust_length(self.dims(), row_length, column_length)?;

        let old_columns = self.column_count;
        if column_length > old_columns {
            for (i, slot) in self.slots.iter_mut().enumerate() {
                let factory = &self.config.item_factory;
                let values: Vec<R::Item> =
                    (old_columns..column_length).map(|c| factory(i, c)).collect();
                slot.row.items_mut().add_range(values);
            }
        } else if column_length < old_columns {
            for slot in &mut self.slots {
                slot.row
                    .items_mut()
                    .remove_range(column_length, old_columns - column_length)?;
            }
        }
        self.column_count = column_length;

        let old_rows = self.slots.len();
        if row_length > old_rows {
            let mut new_slots = Vec::with_capacity(row_length - old_rows);
            for r in old_rows..row_length {
                let row = self.make_default_row(r, column_length);
                new_slots.push(self.attach(row));
            }
            let ids: Vec<RowId> = new_slots.iter().map(|s| s.id).collect();
            self.slots.extend(new_slots);
            self.commit_table(TableChange::added(old_rows, ids), true);
        } else if row_length < old_rows {
            let removed: Vec<RowSlot<R>> = self.slots.drain(row_length..).collect();
            let ids: Vec<RowId> = removed.iter().map(|s| s.id).collect();
            drop(removed);
            self.commit_table(TableChange::removed(row_length, ids), true);
        }
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn dims(&self) -> TableDims {
        TableDims {
            row_count: self.slots.len(),
            column_count: self.column_count,
            min_rows: self.config.min_rows,
            max_rows: self.config.max_rows,
            min_columns: self.config.min_columns,
            max_columns: self.config.max_columns,
        }
    }

    /// Subscribe to the row's broadcasts and wrap it in a slot. Must run
    /// before the row becomes reachable through the table.
    fn attach(&mut self, row: R) -> RowSlot<R> {
        let id = RowId(self.next_id);
        self.next_id += 1;
        let forward_changes = self.row_changes.clone();
        let change_sub = row.items().subscribe_changes(move |change| {
            forward_changes.emit(&RowEvent {
                row: id,
                change: change.clone(),
            });
        });
        let forward_attrs = self.row_attributes.clone();
        let attr_sub = row.items().subscribe_attributes(move |attribute| {
            forward_attrs.emit(&RowAttributeEvent {
                row: id,
                attribute: *attribute,
            });
        });
        trace!(row = id.0, "row attached");
        RowSlot {
            id,
            row,
            _change_sub: change_sub,
            _attr_sub: attr_sub,
        }
    }

    fn make_default_row(&self, r: usize, width: usize) -> R {
        let factory = Rc::clone(&self.config.item_factory);
        let row_factory: Rc<dyn Fn(usize) -> R::Item> = Rc::new(move |c| factory(r, c));
        let items: Vec<R::Item> = (0..width).map(|c| (self.config.item_factory)(r, c)).collect();
        (self.config.row_factory)(SimpleList::from_shared_factory(row_factory, items))
    }

    /// Collapsed-policy emission for the row dimension.
    fn commit_table(&mut self, change: TableChange, count_changed: bool) {
        let touched = change.touched();
        if touched == 0 {
            return;
        }
        let event = if touched > 1 {
            TableChange::reset()
        } else {
            change
        };
        self.changes.emit(&event);
        if count_changed {
            self.attributes.emit(&ListAttribute::Count);
        }
        self.attributes.emit(&ListAttribute::Indexer);
    }

    /// Unconditional reset emission (`reset`/`clear` always fire).
    fn emit_table_reset(&mut self) {
        self.changes.emit(&TableChange::reset());
        self.attributes.emit(&ListAttribute::Count);
        self.attributes.emit(&ListAttribute::Indexer);
    }
}
