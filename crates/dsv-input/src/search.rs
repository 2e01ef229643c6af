//! Cell search. spec.md §4.M "Search algorithm".
//!
//! A row-major wrap scan bounded by `visible_row_count * col_count`,
//! starting either at the cursor itself or the cell just after it.

use dsv_model::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found,
    WrappedAndFound,
    NotFound,
}

/// Search `view` for `term`, moving its cursor to the first match and
/// returning how it was found. `start_from_cursor` tests the cursor's own
/// cell first (used when confirming a freshly-typed search term); otherwise
/// the scan begins at the next cell (used by "repeat last search").
pub fn search_view(view: &mut View, term: &str, start_from_cursor: bool) -> SearchOutcome {
    if term.is_empty() || view.visible_row_count == 0 {
        return SearchOutcome::NotFound;
    }
    let col_count = view.col_count();
    if col_count == 0 {
        return SearchOutcome::NotFound;
    }

    let mut row = view.cursor_row;
    let mut col = view.cursor_col;
    if !start_from_cursor {
        col += 1;
        if col >= col_count {
            col = 0;
            row += 1;
            if row >= view.visible_row_count {
                row = 0;
            }
        }
    }

    let mut wrapped = false;
    for _ in 0..(view.visible_row_count * col_count) {
        if let Some(actual_row) = view.view_get_displayed_row_index(row) {
            let found = {
                let mut ds = view.data_source.borrow_mut();
                let cell = ds.get_cell(actual_row, col);
                !cell.is_empty() && cell.contains(term)
            };
            if found {
                view.cursor_row = row;
                view.cursor_col = col;
                let outcome = if wrapped {
                    SearchOutcome::WrappedAndFound
                } else {
                    SearchOutcome::Found
                };
                tracing::debug!(target: "input.search", term, row, col, ?outcome, "search_hit");
                return outcome;
            }
        }

        col += 1;
        if col >= col_count {
            col = 0;
            row += 1;
            if row >= view.visible_row_count {
                row = 0;
                wrapped = true;
            }
        }
    }

    tracing::debug!(target: "input.search", term, "search_not_found");
    SearchOutcome::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsv_model::{MemoryDataSource, ViewId};
    use dsv_model::InMemoryTable;
    use dsv_text::Encoding;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn view_for(rows: &[[&str; 2]]) -> View {
        let mut table = InMemoryTable::create(None, vec!["a".into(), "b".into()]);
        for r in rows {
            table.add_row(vec![Some(r[0].to_string()), Some(r[1].to_string())]);
        }
        let ds = Rc::new(RefCell::new(MemoryDataSource::new(table, Encoding::Ascii)));
        View::new_main(ViewId(0), ds)
    }

    #[test]
    fn finds_forward_from_next_cell() {
        let mut v = view_for(&[["apple", "pear"], ["grape", "plum"]]);
        let outcome = search_view(&mut v, "plum", false);
        assert_eq!(outcome, SearchOutcome::Found);
        assert_eq!((v.cursor_row, v.cursor_col), (1, 1));
    }

    #[test]
    fn wraps_and_reports_wrapped_and_found() {
        let mut v = view_for(&[["apple", "pear"], ["grape", "plum"]]);
        v.cursor_row = 1;
        v.cursor_col = 1;
        let outcome = search_view(&mut v, "apple", false);
        assert_eq!(outcome, SearchOutcome::WrappedAndFound);
        assert_eq!((v.cursor_row, v.cursor_col), (0, 0));
    }

    #[test]
    fn not_found_leaves_cursor_untouched() {
        let mut v = view_for(&[["apple", "pear"]]);
        let outcome = search_view(&mut v, "zzz", false);
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!((v.cursor_row, v.cursor_col), (0, 0));
    }

    #[test]
    fn start_from_cursor_tests_current_cell_first() {
        let mut v = view_for(&[["apple", "pear"]]);
        let outcome = search_view(&mut v, "apple", true);
        assert_eq!(outcome, SearchOutcome::Found);
        assert_eq!((v.cursor_row, v.cursor_col), (0, 0));
    }
}
