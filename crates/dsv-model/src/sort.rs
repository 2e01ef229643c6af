//! Column sort. spec.md §4.J.
//!
//! Column type is inferred by sampling: a column sorts numerically iff every
//! non-empty cell among the first `SAMPLE_SIZE` visible rows parses whole as
//! a (possibly negative) decimal integer. One empty cell anywhere else in
//! the column does not disqualify it; a non-numeric cell does.

use crate::view::{SortDirection, View};

const SAMPLE_SIZE: usize = 100;

fn is_whole_integer(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Sample up to `SAMPLE_SIZE` rows of `column` and decide numeric vs. lexical.
fn column_is_numeric(view: &View, column: usize) -> bool {
    let mut ds = view.data_source.borrow_mut();
    let sample = view.visible_row_count.min(SAMPLE_SIZE);
    let mut saw_any = false;
    for display_row in 0..sample {
        let Some(actual) = view.view_get_actual_row_index(display_row) else {
            continue;
        };
        let cell = ds.get_cell(actual, column);
        if cell.is_empty() {
            continue;
        }
        if !is_whole_integer(&cell) {
            return false;
        }
        saw_any = true;
    }
    saw_any
}

/// Sort `view` on `column` in `direction`, rebuilding `row_order_map`.
/// `direction == None` clears the sort back to insertion order.
pub fn sort_view(view: &mut View, column: usize, direction: SortDirection) {
    view.sort_column = Some(column);
    view.sort_direction = direction;
    view.last_sorted_column = Some(column);

    if direction == SortDirection::None {
        view.row_order_map = None;
        return;
    }

    let numeric = column_is_numeric(view, column);
    let count = view.visible_row_count;

    let rendered: Vec<String> = {
        let mut ds = view.data_source.borrow_mut();
        (0..count)
            .map(|display_row| {
                let actual = view.view_get_actual_row_index(display_row).unwrap_or(0);
                ds.get_cell(actual, column).into_owned()
            })
            .collect()
    };

    let mut order: Vec<usize> = (0..count).collect();
    if numeric {
        let parsed: Vec<i64> = rendered
            .iter()
            .map(|s| s.trim().parse::<i64>().unwrap_or(0))
            .collect();
        order.sort_by_key(|&i| parsed[i]);
    } else {
        order.sort_by(|&a, &b| rendered[a].cmp(&rendered[b]));
    }

    if direction == SortDirection::Desc {
        order.reverse();
    }

    view.row_order_map = Some(order);
}
