//! Cursor/viewport movement. spec.md §4.M "Table navigation".
//!
//! `visible_rows` (the number of data rows the terminal can show this
//! frame) is passed in rather than read from a global terminal size, since
//! this crate never touches the terminal directly.

use dsv_model::View;
use dsv_render::{is_column_fully_visible, smallest_start_col_for_visibility};

pub fn move_up(view: &mut View) {
    if view.cursor_row > 0 {
        view.cursor_row -= 1;
        if view.cursor_row < view.start_row {
            view.start_row = view.cursor_row;
        }
    }
}

pub fn move_down(view: &mut View, visible_rows: usize) {
    if view.cursor_row + 1 < view.visible_row_count {
        view.cursor_row += 1;
        if visible_rows > 0
            && view.cursor_row > view.start_row
            && view.cursor_row - view.start_row >= visible_rows
        {
            view.start_row = view.cursor_row + 1 - visible_rows;
        }
    }
}

pub fn move_left(view: &mut View) {
    if view.cursor_col > 0 {
        view.cursor_col -= 1;
        if view.cursor_col < view.start_col {
            view.start_col = view.cursor_col;
        }
    }
}

/// Horizontal movement only advances the cursor; auto-scroll is resolved
/// afterward via `autoscroll_horizontal` using the layout engine, which
/// owns the horizontal scroll position.
pub fn move_right(view: &mut View) {
    let col_count = view.col_count();
    if view.cursor_col + 1 < col_count {
        view.cursor_col += 1;
    }
}

/// Bring `view.cursor_col` fully into view under `screen_width`, scrolling
/// left immediately if the cursor moved off the left edge, or advancing
/// `start_col` by the minimal amount if it moved off the right.
pub fn autoscroll_horizontal(view: &mut View, screen_width: usize, column_width: impl Fn(usize) -> usize) {
    let num_fields = view.col_count();
    if view.cursor_col < view.start_col {
        view.start_col = view.cursor_col;
        return;
    }
    if !is_column_fully_visible(num_fields, view.start_col, view.cursor_col, screen_width, &column_width) {
        view.start_col = smallest_start_col_for_visibility(num_fields, view.start_col, view.cursor_col, screen_width, &column_width);
    }
}

pub fn page_up(view: &mut View, visible_rows: usize) {
    if visible_rows > 0 && view.start_row > visible_rows {
        view.start_row -= visible_rows;
    } else {
        view.start_row = 0;
    }
    if visible_rows > 0 && view.cursor_row > view.start_row && view.cursor_row - view.start_row >= visible_rows {
        view.cursor_row = view.start_row + visible_rows - 1;
    }
}

pub fn page_down(view: &mut View, visible_rows: usize) {
    let data_rows = view.visible_row_count;
    let new_start_row = view.start_row.saturating_add(visible_rows);
    view.start_row = new_start_row;
    if view.start_row >= data_rows {
        view.start_row = if data_rows > visible_rows { data_rows - visible_rows } else { 0 };
    }
    if view.cursor_row < view.start_row {
        view.cursor_row = view.start_row;
    }
    if view.cursor_row >= data_rows && data_rows > 0 {
        view.cursor_row = data_rows - 1;
    }
}

pub fn move_home(view: &mut View) {
    view.cursor_row = 0;
    view.cursor_col = 0;
    view.start_row = 0;
    view.start_col = 0;
}

pub fn move_end(view: &mut View, visible_rows: usize) {
    let col_count = view.col_count();
    let data_rows = view.visible_row_count;

    view.cursor_row = if data_rows > 0 { data_rows - 1 } else { 0 };
    view.cursor_col = if col_count > 0 { col_count - 1 } else { 0 };

    view.start_row = if visible_rows > 0 && data_rows > visible_rows { data_rows - visible_rows } else { 0 };
    view.start_col = view.cursor_col;
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsv_model::{InMemoryTable, MemoryDataSource, ViewId};
    use dsv_text::Encoding;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn view_with_rows(n: usize) -> View {
        let mut table = InMemoryTable::create(None, vec!["a".into()]);
        for i in 0..n {
            table.add_row(vec![Some(i.to_string())]);
        }
        let ds = Rc::new(RefCell::new(MemoryDataSource::new(table, Encoding::Ascii)));
        View::new_main(ViewId(0), ds)
    }

    #[test]
    fn move_down_scrolls_viewport_once_past_visible_rows() {
        let mut v = view_with_rows(10);
        for _ in 0..5 {
            move_down(&mut v, 3);
        }
        assert_eq!(v.cursor_row, 5);
        assert_eq!(v.start_row, 3);
    }

    #[test]
    fn move_up_scrolls_up_when_leaving_viewport_top() {
        let mut v = view_with_rows(10);
        v.cursor_row = 5;
        v.start_row = 5;
        move_up(&mut v);
        assert_eq!(v.cursor_row, 4);
        assert_eq!(v.start_row, 4);
    }

    #[test]
    fn home_resets_everything() {
        let mut v = view_with_rows(10);
        v.cursor_row = 5;
        v.start_row = 3;
        v.cursor_col = 1;
        move_home(&mut v);
        assert_eq!((v.cursor_row, v.cursor_col, v.start_row, v.start_col), (0, 0, 0, 0));
    }

    #[test]
    fn end_moves_to_last_row_and_col() {
        let mut v = view_with_rows(10);
        move_end(&mut v, 3);
        assert_eq!(v.cursor_row, 9);
        assert_eq!(v.start_row, 7);
        assert_eq!(v.cursor_col, 0);
    }

    #[test]
    fn page_down_clamps_to_last_page() {
        let mut v = view_with_rows(10);
        for _ in 0..5 {
            page_down(&mut v, 3);
        }
        assert_eq!(v.start_row, 7);
    }
}
