//! Property-based invariant tests for the collection types.
//!
//! Verifies structural guarantees that must hold for any valid op sequence:
//!
//! 1. A bounded list's length never leaves its capacity window.
//! 2. Bounded-list content always matches a plain-Vec model of the same ops.
//! 3. Collapsed lists emit at most one structural event per operation, and
//!    multi-element events are always bare resets.
//! 4. Every table operation leaves all row widths equal to column_count.
//! 5. Snapshot/rebuild round-trips preserve table content exactly.

use std::cell::RefCell;
use std::rc::Rc;

use gridlist::{
    BoundedConfig, BoundedList, ChangeAction, SimpleList, Table, TableConfig,
};
use proptest::prelude::*;

// ── Op models ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum ListOp {
    Set(usize, i32),
    Add(i32),
    AddRange(Vec<i32>),
    Insert(usize, i32),
    MoveItem(usize, usize),
    RemoveAt(usize),
    RemoveRange(usize, usize),
    Adjust(usize),
    Overwrite(usize, Vec<i32>),
}

fn arb_list_op() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        (0usize..16, any::<i32>()).prop_map(|(i, v)| ListOp::Set(i, v)),
        any::<i32>().prop_map(ListOp::Add),
        prop::collection::vec(any::<i32>(), 0..4).prop_map(ListOp::AddRange),
        (0usize..16, any::<i32>()).prop_map(|(i, v)| ListOp::Insert(i, v)),
        (0usize..16, 0usize..16).prop_map(|(a, b)| ListOp::MoveItem(a, b)),
        (0usize..16).prop_map(ListOp::RemoveAt),
        (0usize..16, 0usize..4).prop_map(|(i, n)| ListOp::RemoveRange(i, n)),
        (0usize..12).prop_map(ListOp::Adjust),
        (0usize..16, prop::collection::vec(any::<i32>(), 0..4))
            .prop_map(|(i, v)| ListOp::Overwrite(i, v)),
    ]
}

// ── Bounded list ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn bounded_length_never_leaves_window(
        min in 0usize..4,
        extra in 0usize..8,
        ops in prop::collection::vec(arb_list_op(), 0..40),
    ) {
        let max = min + extra;
        let mut list = BoundedList::new(BoundedConfig::new(min, max, |i| i as i32)).unwrap();
        for op in ops {
            // Ignore per-op rejections: the window must hold regardless.
            let _ = apply_bounded(&mut list, op);
            prop_assert!(list.len() >= min && list.len() <= max);
        }
    }

    #[test]
    fn bounded_content_matches_vec_model(
        ops in prop::collection::vec(arb_list_op(), 0..40),
    ) {
        let mut list = BoundedList::new(BoundedConfig::new(0, 64, |i| i as i32)).unwrap();
        let mut model: Vec<i32> = Vec::new();
        for op in ops {
            apply_both(&mut list, &mut model, op);
            prop_assert_eq!(list.as_slice(), model.as_slice());
        }
    }
}

fn apply_bounded(list: &mut BoundedList<i32>, op: ListOp) -> gridlist::Result<()> {
    match op {
        ListOp::Set(i, v) => list.set(i, v),
        ListOp::Add(v) => list.add(v),
        ListOp::AddRange(v) => list.add_range(v),
        ListOp::Insert(i, v) => list.insert(i, v),
        ListOp::MoveItem(a, b) => list.move_item(a, b),
        ListOp::RemoveAt(i) => list.remove_at(i).map(|_| ()),
        ListOp::RemoveRange(i, n) => list.remove_range(i, n),
        ListOp::Adjust(n) => list.adjust_length(n),
        ListOp::Overwrite(i, v) => list.overwrite(i, v),
    }
}

/// Apply `op` to the list, mirroring successful applications onto `model`.
fn apply_both(list: &mut BoundedList<i32>, model: &mut Vec<i32>, op: ListOp) {
    match op {
        ListOp::Set(i, v) => {
            if list.set(i, v).is_ok() {
                model[i] = v;
            }
        }
        ListOp::Add(v) => {
            if list.add(v).is_ok() {
                model.push(v);
            }
        }
        ListOp::AddRange(v) => {
            if list.add_range(v.clone()).is_ok() {
                model.extend(v);
            }
        }
        ListOp::Insert(i, v) => {
            if list.insert(i, v).is_ok() {
                model.insert(i, v);
            }
        }
        ListOp::MoveItem(a, b) => {
            if list.move_item(a, b).is_ok() {
                let item = model.remove(a);
                model.insert(b, item);
            }
        }
        ListOp::RemoveAt(i) => {
            if list.remove_at(i).is_ok() {
                model.remove(i);
            }
        }
        ListOp::RemoveRange(i, n) => {
            if list.remove_range(i, n).is_ok() {
                model.drain(i..i + n);
            }
        }
        ListOp::Adjust(n) => {
            if list.adjust_length(n).is_ok() {
                let len = model.len();
                if n > len {
                    model.extend((len..n).map(|i| i as i32));
                } else {
                    model.truncate(n);
                }
            }
        }
        ListOp::Overwrite(i, v) => {
            if list.overwrite(i, v.clone()).is_ok() {
                for (k, item) in v.into_iter().enumerate() {
                    if i + k < model.len() {
                        model[i + k] = item;
                    } else {
                        model.push(item);
                    }
                }
            }
        }
    }
}

// ── Collapsed policy ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn collapsed_list_emits_at_most_one_event_per_op(
        ops in prop::collection::vec(arb_list_op(), 0..40),
    ) {
        let mut list = SimpleList::new(|i| i as i32);
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let _sub = list.subscribe_changes(move |c| l.borrow_mut().push(c.clone()));

        for op in ops {
            let before = log.borrow().len();
            apply_simple(&mut list, op);
            let log = log.borrow();
            prop_assert!(log.len() - before <= 1);
            // Anything that survived collapse either touches exactly one
            // element or is a bare Reset.
            if let Some(event) = log.last() {
                if event.action == ChangeAction::Reset {
                    prop_assert!(event.old_items.is_empty() && event.new_items.is_empty());
                } else {
                    prop_assert!(event.old_items.len().max(event.new_items.len()) == 1);
                }
            }
        }
    }
}

fn apply_simple(list: &mut SimpleList<i32>, op: ListOp) {
    match op {
        ListOp::Set(i, v) => {
            let _ = list.set(i, v);
        }
        ListOp::Add(v) => list.add(v),
        ListOp::AddRange(v) => list.add_range(v),
        ListOp::Insert(i, v) => {
            let _ = list.insert(i, v);
        }
        ListOp::MoveItem(a, b) => {
            let _ = list.move_item(a, b);
        }
        ListOp::RemoveAt(i) => {
            let _ = list.remove_at(i);
        }
        ListOp::RemoveRange(i, n) => {
            let _ = list.remove_range(i, n);
        }
        ListOp::Adjust(n) => list.adjust(n),
        ListOp::Overwrite(i, v) => {
            let _ = list.overwrite(i, v);
        }
    }
}

// ── Table ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum TableOp {
    AddRow,
    InsertRow(usize),
    RemoveRow(usize),
    MoveRow(usize, usize),
    AddColumn,
    InsertColumn(usize),
    RemoveColumn(usize),
    SetItem(usize, usize, i32),
    Adjust(usize, usize),
    Clear,
}

fn arb_table_op() -> impl Strategy<Value = TableOp> {
    prop_oneof![
        Just(TableOp::AddRow),
        (0usize..8).prop_map(TableOp::InsertRow),
        (0usize..8).prop_map(TableOp::RemoveRow),
        (0usize..8, 0usize..8).prop_map(|(a, b)| TableOp::MoveRow(a, b)),
        Just(TableOp::AddColumn),
        (0usize..8).prop_map(TableOp::InsertColumn),
        (0usize..8).prop_map(TableOp::RemoveColumn),
        (0usize..8, 0usize..8, any::<i32>()).prop_map(|(r, c, v)| TableOp::SetItem(r, c, v)),
        (0usize..6, 0usize..6).prop_map(|(r, c)| TableOp::Adjust(r, c)),
        Just(TableOp::Clear),
    ]
}

fn fresh_row(table: &Table<SimpleList<i32>>) -> SimpleList<i32> {
    SimpleList::with_items(|_| 0, vec![0; table.column_count()])
}

proptest! {
    #[test]
    fn table_rows_stay_uniform_width(
        ops in prop::collection::vec(arb_table_op(), 0..40),
    ) {
        let config = TableConfig::new(0, 8, 0, 8, |list: SimpleList<i32>| list, |r, c| {
            (r * 100 + c) as i32
        });
        let mut table = Table::new(config).unwrap();
        for op in ops {
            let column = (0..table.row_count()).map(|_| 1).collect::<Vec<i32>>();
            match op {
                TableOp::AddRow => {
                    let row = fresh_row(&table);
                    let _ = table.add_row(row);
                }
                TableOp::InsertRow(i) => {
                    let row = fresh_row(&table);
                    let _ = table.insert_row(i, row);
                }
                TableOp::RemoveRow(i) => {
                    let _ = table.remove_row(i);
                }
                TableOp::MoveRow(a, b) => {
                    let _ = table.move_row(a, b);
                }
                TableOp::AddColumn => {
                    let _ = table.add_column(column);
                }
                TableOp::InsertColumn(i) => {
                    let _ = table.insert_column(i, column);
                }
                TableOp::RemoveColumn(i) => {
                    let _ = table.remove_column(i);
                }
                TableOp::SetItem(r, c, v) => {
                    let _ = table.set_item(r, c, v);
                }
                TableOp::Adjust(r, c) => {
                    let _ = table.adjust_length(r, c);
                }
                TableOp::Clear => {
                    let _ = table.clear();
                }
            }
            prop_assert!(table.rows().all(|r| r.len() == table.column_count()));
            prop_assert!(table.row_count() <= 8 && table.column_count() <= 8);
        }
    }

    #[test]
    fn table_snapshot_round_trips(
        rows in 0usize..6,
        cols in 0usize..6,
    ) {
        let make_config = || TableConfig::new(0, 8, 0, 8, |list: SimpleList<i32>| list, |r, c| {
            (r * 100 + c) as i32
        });
        let values: Vec<Vec<i32>> = (0..rows)
            .map(|r| (0..cols).map(|c| (r * 100 + c) as i32).collect())
            .collect();
        let table = Table::with_values(make_config(), values.clone()).unwrap();
        prop_assert_eq!(table.to_two_dimensional_array(false), values);

        let rebuilt =
            Table::with_values(make_config(), table.to_two_dimensional_array(false)).unwrap();
        prop_assert_eq!(
            rebuilt.to_two_dimensional_array(false),
            table.to_two_dimensional_array(false)
        );
    }
}
