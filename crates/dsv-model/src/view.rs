//! `View`: a row-filtered, optionally sorted window onto a `DataSource`,
//! plus its cursor/viewport/selection state. spec.md §3 ("View"), §4.K.
//!
//! `ViewManager` (in `view_manager.rs`) owns every `View` in a `Vec` and
//! views reference each other by a stable `ViewId` rather than raw
//! `prev`/`next`/`parent` pointers, sidestepping the aliasing a
//! parent-pointer-plus-owning-list would need in safe Rust while keeping
//! the same lookup semantics (an id is always resolved back through the
//! owning manager).

use crate::data_source::DataSource;
use crate::value_index::ValueIndex;
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedDataSource = Rc<RefCell<dyn DataSource>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub u64);

/// Inclusive `[start, end]` of visible rows in the underlying data source's
/// row space. spec.md §3 "RowRange".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false // an inclusive range always has at least one row
    }
}

/// Compress a sorted slice of actual-row indices into maximally-merged
/// ranges: "a new range starts whenever `selected[i] != selected[i-1]+1`"
/// (spec.md §4.K).
pub fn compress_into_ranges(sorted_rows: &[usize]) -> Vec<RowRange> {
    let mut ranges: Vec<RowRange> = Vec::new();
    for &row in sorted_rows {
        match ranges.last_mut() {
            Some(last) if row == last.end + 1 => last.end = row,
            _ => ranges.push(RowRange { start: row, end: row }),
        }
    }
    ranges
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    None,
    Asc,
    Desc,
}

impl SortDirection {
    /// Cycle `None -> Asc -> Desc -> None` (spec.md §4.M "Sort on a column").
    pub fn cycle(self) -> Self {
        match self {
            SortDirection::None => SortDirection::Asc,
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::None,
        }
    }
}

pub struct View {
    pub id: ViewId,
    pub name: String,
    pub data_source: SharedDataSource,

    pub ranges: Vec<RowRange>,
    pub visible_row_count: usize,

    pub sort_column: Option<usize>,
    pub sort_direction: SortDirection,
    pub last_sorted_column: Option<usize>,
    pub row_order_map: Option<Vec<usize>>,

    pub parent: Option<ViewId>,
    pub parent_source_column: Option<usize>,

    pub value_index: Option<ValueIndex>,
    pub analysis_cache: Vec<Option<ValueIndex>>,
    pub reverse_row_map: Option<Vec<Option<usize>>>,

    pub row_selected: Vec<bool>,
    pub selection_count: usize,

    pub cursor_row: usize,
    pub cursor_col: usize,
    pub start_row: usize,
    pub start_col: usize,
}

impl View {
    /// Main view over a freshly-opened data source: one range spanning every
    /// row, identity sort, empty selection, cursor at (0,0).
    pub fn new_main(id: ViewId, data_source: SharedDataSource) -> Self {
        let (row_count, col_count) = {
            let ds = data_source.borrow();
            (ds.row_count(), ds.col_count())
        };
        let ranges = full_range(row_count);
        Self {
            id,
            name: "View 1 (Main)".to_string(),
            data_source,
            ranges,
            visible_row_count: row_count,
            sort_column: None,
            sort_direction: SortDirection::None,
            last_sorted_column: None,
            row_order_map: None,
            parent: None,
            parent_source_column: None,
            value_index: None,
            analysis_cache: vec![None; col_count],
            reverse_row_map: None,
            row_selected: vec![false; row_count],
            selection_count: 0,
            cursor_row: 0,
            cursor_col: 0,
            start_row: 0,
            start_col: 0,
        }
    }

    /// Derived view from a selection on `parent`. `selected_display_rows`
    /// are display-row indices into `parent` (as toggled by Space); each is
    /// translated through `parent`'s own sort/filter state to an actual row
    /// in the shared data source before compression, so the new view's
    /// ranges are correct however `parent` is currently sorted or filtered.
    pub fn new_from_selection(id: ViewId, parent: &View, selected_display_rows: &[usize]) -> Self {
        let mut actual_rows: Vec<usize> = selected_display_rows
            .iter()
            .filter_map(|&d| parent.view_get_displayed_row_index(d))
            .collect();
        actual_rows.sort_unstable();
        actual_rows.dedup();
        let ranges = compress_into_ranges(&actual_rows);
        let count = actual_rows.len();
        Self {
            id,
            name: format!("View ({count} rows)"),
            data_source: Rc::clone(&parent.data_source),
            ranges,
            visible_row_count: count,
            sort_column: None,
            sort_direction: SortDirection::None,
            last_sorted_column: None,
            row_order_map: None,
            parent: None,
            parent_source_column: None,
            value_index: None,
            analysis_cache: Vec::new(),
            reverse_row_map: None,
            row_selected: vec![false; count],
            selection_count: 0,
            cursor_row: 0,
            cursor_col: parent.cursor_col,
            start_row: 0,
            start_col: parent.start_col,
        }
    }

    /// Frequency-analysis view: wraps a freshly-built `(Value, Count)`
    /// in-memory table, linked back to `parent` via `parent_source_column`
    /// so selections can propagate (spec.md §4.K "Analysis view").
    pub fn new_analysis(
        id: ViewId,
        parent_id: ViewId,
        parent_source_column: usize,
        value_index: ValueIndex,
        data_source: SharedDataSource,
    ) -> Self {
        let (row_count, col_count) = {
            let ds = data_source.borrow();
            (ds.row_count(), ds.col_count())
        };
        let ranges = full_range(row_count);
        Self {
            id,
            name: format!("Analysis (col {parent_source_column})"),
            data_source,
            ranges,
            visible_row_count: row_count,
            sort_column: None,
            sort_direction: SortDirection::None,
            last_sorted_column: None,
            row_order_map: None,
            parent: Some(parent_id),
            parent_source_column: Some(parent_source_column),
            value_index: Some(value_index),
            analysis_cache: vec![None; col_count],
            reverse_row_map: None,
            row_selected: vec![false; row_count],
            selection_count: 0,
            cursor_row: 0,
            cursor_col: 0,
            start_row: 0,
            start_col: 0,
        }
    }

    pub fn col_count(&self) -> usize {
        self.data_source.borrow().col_count()
    }

    /// `view_get_actual_row_index`, spec.md §4.K: walk ranges accumulating
    /// lengths until `visible_index` lies within one. `None` is the "none"
    /// sentinel for out-of-bounds input.
    pub fn view_get_actual_row_index(&self, visible_index: usize) -> Option<usize> {
        if self.ranges.is_empty() {
            let total = self.data_source.borrow().row_count();
            return (visible_index < total).then_some(visible_index);
        }
        let mut base = 0usize;
        for range in &self.ranges {
            let len = range.len();
            if visible_index < base + len {
                return Some(range.start + (visible_index - base));
            }
            base += len;
        }
        None
    }

    /// `view_get_displayed_row_index`, spec.md §4.K: apply `row_order_map`
    /// (if sorted) then resolve through the ranges.
    pub fn view_get_displayed_row_index(&self, display_row: usize) -> Option<usize> {
        let visible_index = match &self.row_order_map {
            Some(map) => *map.get(display_row)?,
            None => display_row,
        };
        self.view_get_actual_row_index(visible_index)
    }

    /// `view_build_reverse_map`, spec.md §4.K: inverse of
    /// `view_get_displayed_row_index`, indexed by actual row.
    pub fn build_reverse_map(&mut self) {
        let total = self.data_source.borrow().row_count();
        let mut map = vec![None; total];
        for display_row in 0..self.visible_row_count {
            if let Some(actual) = self.view_get_displayed_row_index(display_row) {
                if let Some(slot) = map.get_mut(actual) {
                    *slot = Some(display_row);
                }
            }
        }
        self.reverse_row_map = Some(map);
    }

    pub fn toggle_selection(&mut self, display_row: usize) {
        if let Some(selected) = self.row_selected.get_mut(display_row) {
            if *selected {
                *selected = false;
                self.selection_count -= 1;
            } else {
                *selected = true;
                self.selection_count += 1;
            }
        }
    }

    pub fn is_selected(&self, display_row: usize) -> bool {
        self.row_selected.get(display_row).copied().unwrap_or(false)
    }

    pub fn clear_selection(&mut self) {
        for selected in &mut self.row_selected {
            *selected = false;
        }
        self.selection_count = 0;
    }

    /// Display-row indices with `row_selected[i] == true`, ascending.
    pub fn selected_display_rows(&self) -> Vec<usize> {
        self.row_selected
            .iter()
            .enumerate()
            .filter_map(|(i, &selected)| selected.then_some(i))
            .collect()
    }
}

fn full_range(row_count: usize) -> Vec<RowRange> {
    if row_count == 0 {
        Vec::new()
    } else {
        vec![RowRange { start: 0, end: row_count - 1 }]
    }
}
