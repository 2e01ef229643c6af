//! Frequency analysis: build a `ValueIndex` over one column of a view and
//! emit a `(Value, Count)` table. spec.md §4.K "Analysis view", §4.I.
//!
//! Frequency counting reuses the same `ValueIndex` built for selection
//! propagation rather than a separate counting pass.

use crate::table::InMemoryTable;
use crate::value_index::ValueIndex;
use crate::view::View;

/// Scan every visible row of `view`'s `column`, building a `ValueIndex`
/// keyed on the rendered cell text. Returns `None` for an out-of-range
/// column or an empty view (nothing to analyze).
pub fn build_value_index(view: &mut View, column: usize) -> Option<ValueIndex> {
    if column >= view.col_count() || view.visible_row_count == 0 {
        return None;
    }
    if let Some(cached) = view.analysis_cache.get(column).and_then(Option::clone) {
        return Some(cached);
    }

    let mut index = ValueIndex::new();
    let mut ds = view.data_source.borrow_mut();
    for display_row in 0..view.visible_row_count {
        let Some(actual) = view.view_get_actual_row_index(display_row) else {
            continue;
        };
        let value = ds.get_cell(actual, column);
        index.insert(&value, actual);
    }
    drop(ds);

    if let Some(slot) = view.analysis_cache.get_mut(column) {
        *slot = Some(index.clone());
    }
    Some(index)
}

/// Materialize `(Value, Count)` rows from `index`, in first-insertion order
/// (spec.md §9: analysis row ordering is implementation-defined).
pub fn frequency_table(index: &ValueIndex) -> InMemoryTable {
    let mut table = InMemoryTable::create(
        Some("Frequency Analysis".to_string()),
        vec!["Value".to_string(), "Count".to_string()],
    );
    for (value, rows) in index.iter_in_insertion_order() {
        table.add_row(vec![Some(value.to_string()), Some(rows.len().to_string())]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::MemoryDataSource;
    use crate::view::{View, ViewId};
    use dsv_text::Encoding;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn view_with_colors(colors: &[&str]) -> View {
        let mut table = InMemoryTable::create(None, vec!["id".into(), "Color".into()]);
        for (i, c) in colors.iter().enumerate() {
            table.add_row(vec![Some(i.to_string()), Some(c.to_string())]);
        }
        let ds = Rc::new(RefCell::new(MemoryDataSource::new(table, Encoding::Ascii)));
        View::new_main(ViewId(0), ds)
    }

    #[test]
    fn builds_frequency_table_matching_scenario() {
        let mut view = view_with_colors(&["Red", "Blue", "Red", "Green", "Blue"]);
        let index = build_value_index(&mut view, 1).unwrap();
        let table = frequency_table(&index);
        assert_eq!(table.row_count(), 3);
        let rows: Vec<(String, String)> = table
            .rows
            .iter()
            .map(|r| (r[0].clone(), r[1].clone()))
            .collect();
        assert!(rows.contains(&("Red".to_string(), "2".to_string())));
        assert!(rows.contains(&("Blue".to_string(), "2".to_string())));
        assert!(rows.contains(&("Green".to_string(), "1".to_string())));
    }

    #[test]
    fn out_of_range_column_returns_none() {
        let mut view = view_with_colors(&["Red"]);
        assert!(build_value_index(&mut view, 99).is_none());
    }

    #[test]
    fn empty_view_returns_none() {
        let mut view = view_with_colors(&[]);
        assert!(build_value_index(&mut view, 1).is_none());
    }
}
