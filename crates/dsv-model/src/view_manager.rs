//! Owns every `View`, the notion of "current" view, and cross-view
//! operations (creation, closing, cycling, selection propagation).
//! spec.md §4.K, §4.L. A `Vec<View>` indexed by position, with views
//! referring to each other by `ViewId` (see `view.rs`'s doc comment for
//! why) instead of raw `parent`/`next`/`prev` pointers.

use crate::view::{SharedDataSource, View, ViewId};

/// spec.md §4.L: "max 10 views."
pub const MAX_VIEWS: usize = 10;

pub struct ViewManager {
    views: Vec<View>,
    current: usize,
    next_id: u64,
    max_views: usize,
}

impl ViewManager {
    /// Open a fresh manager with a single main view over `data_source`.
    pub fn new(data_source: SharedDataSource) -> Self {
        let main = View::new_main(ViewId(0), data_source);
        Self {
            views: vec![main],
            current: 0,
            next_id: 1,
            max_views: MAX_VIEWS,
        }
    }

    /// Whether another view can be added without exceeding `max_views`
    /// (spec.md §4.L "add_view: insert after current; reject if full").
    fn has_room(&self) -> bool {
        let room = self.views.len() < self.max_views;
        if !room {
            tracing::warn!(target: "model.view_manager", max_views = self.max_views, "view_creation_rejected_max_views_reached");
        }
        room
    }

    fn alloc_id(&mut self) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn current(&self) -> &View {
        &self.views[self.current]
    }

    pub fn current_mut(&mut self) -> &mut View {
        &mut self.views[self.current]
    }

    pub fn count(&self) -> usize {
        self.views.len()
    }

    pub fn find(&self, id: ViewId) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    fn index_of(&self, id: ViewId) -> Option<usize> {
        self.views.iter().position(|v| v.id == id)
    }

    /// Derive a new view from the current view's selection and switch to it.
    /// Returns `false` (no-op) if the current view has no selection, matching
    /// the `v` key's documented precondition (spec.md §4.L "if any
    /// selections").
    pub fn create_view_from_selection(&mut self) -> bool {
        if !self.has_room() {
            return false;
        }
        let selected = self.current().selected_display_rows();
        if selected.is_empty() {
            return false;
        }
        let id = self.alloc_id();
        let child = View::new_from_selection(id, self.current(), &selected);
        let rows = child.visible_row_count;
        self.views.push(child);
        self.current = self.views.len() - 1;
        self.renumber();
        tracing::info!(target: "model.view_manager", id = id.0, rows, "view_created_from_selection");
        true
    }

    /// Build a frequency-analysis view over `column` of the current view and
    /// switch to it (spec.md §4.K "Analysis view").
    pub fn create_analysis_view(&mut self, column: usize) -> bool {
        if !self.has_room() {
            return false;
        }
        let parent_id = self.current().id;
        let Some(value_index) = crate::analysis::build_value_index(self.current_mut(), column) else {
            return false;
        };
        let table = crate::analysis::frequency_table(&value_index);
        let data_source = std::rc::Rc::new(std::cell::RefCell::new(
            crate::data_source::MemoryDataSource::new(table, dsv_text::Encoding::Utf8),
        ));
        let id = self.alloc_id();
        let analysis = View::new_analysis(id, parent_id, column, value_index, data_source);
        self.views.push(analysis);
        self.current = self.views.len() - 1;
        self.renumber();
        tracing::info!(target: "model.view_manager", id = id.0, column, "analysis_view_created");
        true
    }

    /// Close the current view. Refuses to close the last remaining (main)
    /// view.
    pub fn close_current(&mut self) -> bool {
        if self.views.len() <= 1 {
            return false;
        }
        let closed = self.views.remove(self.current);
        if self.current >= self.views.len() {
            self.current = self.views.len() - 1;
        }
        self.renumber();
        tracing::info!(target: "model.view_manager", id = closed.id.0, "view_closed");
        true
    }

    pub fn cycle_next(&mut self) {
        if !self.views.is_empty() {
            self.current = (self.current + 1) % self.views.len();
        }
    }

    pub fn cycle_prev(&mut self) {
        if !self.views.is_empty() {
            self.current = (self.current + self.views.len() - 1) % self.views.len();
        }
    }

    /// Rename views to "View 1 (Main)" / "View N (R rows)", matching the
    /// original's renumbering on every structural change.
    fn renumber(&mut self) {
        for (i, view) in self.views.iter_mut().enumerate() {
            view.name = if i == 0 {
                "View 1 (Main)".to_string()
            } else {
                format!("View {} ({} rows)", i + 1, view.visible_row_count)
            };
        }
    }

    /// Selection propagation (child -> parent), spec.md §4.K / §173:
    /// collect the current view's selected rows, render each row's `Value`
    /// column (0) through its value index, and select every matching actual
    /// row that is visible in the parent — via the parent's reverse map.
    pub fn propagate_selection_to_parent(&mut self) {
        let Some(parent_id) = self.current().parent else {
            return;
        };
        if self.current().value_index.is_none() {
            return;
        }
        let Some(parent_idx) = self.index_of(parent_id) else {
            return;
        };

        let selected_values: Vec<String> = {
            let child = self.current_mut();
            let mut ds = child.data_source.borrow_mut();
            child
                .selected_display_rows()
                .into_iter()
                .filter_map(|display_row| child.view_get_actual_row_index(display_row))
                .map(|actual| ds.get_cell(actual, 0).into_owned())
                .collect()
        };

        if self.views[parent_idx].reverse_row_map.is_none() {
            self.views[parent_idx].build_reverse_map();
        }

        let parent = &mut self.views[parent_idx];
        parent.clear_selection();
        if selected_values.is_empty() {
            return;
        }

        let child = self.views.iter().find(|v| v.id == self.current().id).unwrap();
        let value_index = child.value_index.as_ref().unwrap();
        let mut actual_rows: Vec<usize> = Vec::new();
        for value in &selected_values {
            if let Some(rows) = value_index.get(value) {
                actual_rows.extend_from_slice(rows);
            }
        }

        let parent = &mut self.views[parent_idx];
        let reverse_map = parent.reverse_row_map.as_ref().unwrap().clone();
        for actual_row in actual_rows {
            if let Some(Some(display_row)) = reverse_map.get(actual_row) {
                if !parent.is_selected(*display_row) {
                    parent.toggle_selection(*display_row);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::MemoryDataSource;
    use crate::table::InMemoryTable;
    use dsv_text::Encoding;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn manager_with_rows(rows: &[(&str, &str)]) -> ViewManager {
        let mut table = InMemoryTable::create(None, vec!["id".into(), "Color".into()]);
        for (id, color) in rows {
            table.add_row(vec![Some(id.to_string()), Some(color.to_string())]);
        }
        let ds = Rc::new(RefCell::new(MemoryDataSource::new(table, Encoding::Ascii)));
        ViewManager::new(ds)
    }

    #[test]
    fn cannot_close_sole_view() {
        let mut mgr = manager_with_rows(&[("1", "Red")]);
        assert!(!mgr.close_current());
        assert_eq!(mgr.count(), 1);
    }

    #[test]
    fn create_view_from_selection_requires_selection() {
        let mut mgr = manager_with_rows(&[("1", "Red"), ("2", "Blue")]);
        assert!(!mgr.create_view_from_selection());
        mgr.current_mut().toggle_selection(0);
        assert!(mgr.create_view_from_selection());
        assert_eq!(mgr.count(), 2);
        assert_eq!(mgr.current().visible_row_count, 1);
    }

    #[test]
    fn view_creation_is_rejected_once_max_views_is_reached() {
        let mut mgr = manager_with_rows(&[("1", "Red"), ("2", "Blue")]);
        mgr.max_views = 2;
        mgr.current_mut().toggle_selection(0);
        assert!(!mgr.create_view_from_selection());
        assert_eq!(mgr.count(), 1);
    }

    #[test]
    fn cycling_wraps_around() {
        let mut mgr = manager_with_rows(&[("1", "Red"), ("2", "Blue")]);
        mgr.current_mut().toggle_selection(0);
        mgr.create_view_from_selection();
        assert_eq!(mgr.count(), 2);
        mgr.cycle_next();
        assert_eq!(mgr.current().id, ViewId(0));
        mgr.cycle_prev();
        assert_eq!(mgr.current().id, ViewId(1));
    }

    #[test]
    fn frequency_analysis_and_propagation_scenario() {
        // spec.md §8 scenario 3.
        let mut mgr = manager_with_rows(&[
            ("1", "Red"),
            ("2", "Blue"),
            ("3", "Red"),
            ("4", "Green"),
            ("5", "Blue"),
        ]);
        assert!(mgr.create_analysis_view(1));
        assert_eq!(mgr.current().visible_row_count, 3);

        // Move cursor to the "Blue" row and select it.
        let visible_row_count = mgr.current().visible_row_count;
        let values: Vec<String> = {
            let view = mgr.current_mut();
            let mut ds = view.data_source.borrow_mut();
            (0..visible_row_count)
                .map(|r| {
                    let actual = view.view_get_actual_row_index(r).unwrap();
                    ds.get_cell(actual, 0).into_owned()
                })
                .collect()
        };
        let blue_row = values.iter().position(|v| v == "Blue").unwrap();
        mgr.current_mut().toggle_selection(blue_row);
        mgr.propagate_selection_to_parent();

        let parent = mgr.find(ViewId(0)).unwrap();
        assert_eq!(parent.selection_count, 2);
        assert!(parent.is_selected(1));
        assert!(parent.is_selected(4));
    }
}
