//! Table-panel input router. spec.md §4.M.
//!
//! Global keys are handled before panel-specific ones, then table
//! navigation/selection/sort/search dispatch on the view manager's current
//! view. Normal mode is the default; entering `/` switches to composing a
//! search term until Enter/Esc.

use crate::key_token::KeyToken;
use crate::navigation;
use crate::search::{search_view, SearchOutcome};
use dsv_model::{sort_view, SortDirection, ViewManager};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterOutcome {
    /// Handled; redraw only if state actually changed.
    Consumed { needs_redraw: bool },
    /// Not bound to anything in the current mode.
    Ignored,
    Quit,
    ShowHelp,
    CycleView { forward: bool },
    CloseView,
    /// `y`: copy the rendered cell at the cursor to the clipboard. The
    /// router only renders the text (spec.md §4.M); `dsv-input` has no
    /// dependency on `dsv-clipboard`, so the actual subprocess call and
    /// status-line update happen in the caller (the viewer's event loop).
    CopyCell(String),
    /// Result of confirming a search (`Enter`) or repeating one (`n`); the
    /// caller turns this into the status-line message spec.md §4.M
    /// describes ("status message reflects the outcome").
    SearchResult(SearchOutcome),
}

#[derive(Debug, Clone, Default)]
struct SearchState {
    composing: bool,
    term: String,
    last_term: Option<String>,
}

/// Owns search-mode state across key events; everything else is read
/// straight off the `ViewManager`'s current view.
pub struct InputRouter {
    search: SearchState,
    screen_width: usize,
    visible_rows: usize,
}

impl InputRouter {
    pub fn new(screen_width: usize, visible_rows: usize) -> Self {
        Self {
            search: SearchState::default(),
            screen_width,
            visible_rows,
        }
    }

    pub fn resize(&mut self, screen_width: usize, visible_rows: usize) {
        self.screen_width = screen_width;
        self.visible_rows = visible_rows;
    }

    pub fn is_composing_search(&self) -> bool {
        self.search.composing
    }

    pub fn search_term(&self) -> &str {
        &self.search.term
    }

    /// Dispatch one key event. `column_width` must be provided by the
    /// caller since only the render layer knows analyzed column widths.
    pub fn handle_key(
        &mut self,
        manager: &mut ViewManager,
        key: KeyToken,
        column_width: impl Fn(usize) -> usize,
    ) -> RouterOutcome {
        if self.search.composing {
            return self.handle_search_compose(manager, key);
        }

        if let Some(outcome) = self.handle_global(key) {
            return outcome;
        }

        self.handle_table(manager, key, column_width)
    }

    fn handle_global(&mut self, key: KeyToken) -> Option<RouterOutcome> {
        let outcome = match key {
            KeyToken::Char('q') | KeyToken::Char('Q') => Some(RouterOutcome::Quit),
            KeyToken::Char('h') | KeyToken::Char('H') => Some(RouterOutcome::ShowHelp),
            KeyToken::Tab => Some(RouterOutcome::CycleView { forward: true }),
            KeyToken::ShiftTab => Some(RouterOutcome::CycleView { forward: false }),
            KeyToken::Char('x') => Some(RouterOutcome::CloseView),
            _ => None,
        };
        if let Some(outcome) = &outcome {
            tracing::trace!(target: "input.router", ?key, ?outcome, "global_key_dispatched");
        }
        outcome
    }

    fn handle_table(
        &mut self,
        manager: &mut ViewManager,
        key: KeyToken,
        column_width: impl Fn(usize) -> usize,
    ) -> RouterOutcome {
        match key {
            KeyToken::Up => {
                navigation::move_up(manager.current_mut());
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Down => {
                navigation::move_down(manager.current_mut(), self.visible_rows);
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Left => {
                navigation::move_left(manager.current_mut());
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Right => {
                let view = manager.current_mut();
                navigation::move_right(view);
                navigation::autoscroll_horizontal(view, self.screen_width, column_width);
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::PageUp => {
                navigation::page_up(manager.current_mut(), self.visible_rows);
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::PageDown => {
                navigation::page_down(manager.current_mut(), self.visible_rows);
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Home => {
                navigation::move_home(manager.current_mut());
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::End => {
                navigation::move_end(manager.current_mut(), self.visible_rows);
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Char(' ') => {
                let row = manager.current().cursor_row;
                manager.current_mut().toggle_selection(row);
                manager.propagate_selection_to_parent();
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Char('A') | KeyToken::Esc => {
                manager.current_mut().clear_selection();
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Char('v') => {
                let changed = manager.create_view_from_selection();
                RouterOutcome::Consumed { needs_redraw: changed }
            }
            KeyToken::Char(c) if c.is_ascii_digit() => self.handle_sort(manager, c),
            KeyToken::Char('y') => {
                let view = manager.current_mut();
                let (row, col) = (view.cursor_row, view.cursor_col);
                let text = view
                    .view_get_displayed_row_index(row)
                    .map(|actual| view.data_source.borrow_mut().get_cell(actual, col).into_owned())
                    .unwrap_or_default();
                RouterOutcome::CopyCell(text)
            }
            // spec.md §4.M doesn't name a key for frequency analysis
            // explicitly (only the operation, in §4.K); `f` is this
            // viewer's choice, recorded in DESIGN.md.
            KeyToken::Char('f') => {
                let column = manager.current().cursor_col;
                let created = manager.create_analysis_view(column);
                RouterOutcome::Consumed { needs_redraw: created }
            }
            KeyToken::Char('/') => {
                self.search.composing = true;
                self.search.term.clear();
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Char('n') => match &self.search.last_term {
                Some(term) => RouterOutcome::SearchResult(search_view(manager.current_mut(), term, false)),
                None => RouterOutcome::Ignored,
            },
            _ => RouterOutcome::Ignored,
        }
    }

    /// A digit key `c` selects sort column `c as usize` (0-9) and cycles its
    /// direction `None -> Asc -> Desc -> None` (spec.md §4.M "Sort on a
    /// column").
    fn handle_sort(&mut self, manager: &mut ViewManager, c: char) -> RouterOutcome {
        let Some(column) = c.to_digit(10).map(|d| d as usize) else {
            return RouterOutcome::Ignored;
        };
        let view = manager.current_mut();
        if column >= view.col_count() {
            return RouterOutcome::Ignored;
        }
        let next_direction = if view.sort_column == Some(column) {
            view.sort_direction.cycle()
        } else {
            SortDirection::Asc
        };
        sort_view(view, column, next_direction);
        RouterOutcome::Consumed { needs_redraw: true }
    }

    fn handle_search_compose(&mut self, manager: &mut ViewManager, key: KeyToken) -> RouterOutcome {
        match key {
            KeyToken::Esc => {
                self.search.composing = false;
                self.search.term.clear();
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Backspace => {
                self.search.term.pop();
                RouterOutcome::Consumed { needs_redraw: true }
            }
            KeyToken::Enter => {
                self.search.composing = false;
                if self.search.term.is_empty() {
                    return RouterOutcome::Consumed { needs_redraw: true };
                }
                let term = self.search.term.clone();
                let outcome = search_view(manager.current_mut(), &term, true);
                self.search.last_term = Some(term);
                RouterOutcome::SearchResult(outcome)
            }
            KeyToken::Char(c) => {
                self.search.term.push(c);
                RouterOutcome::Consumed { needs_redraw: true }
            }
            _ => RouterOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsv_model::{InMemoryTable, MemoryDataSource, ViewId};
    use dsv_text::Encoding;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn manager_with_rows(rows: &[&str]) -> ViewManager {
        let mut table = InMemoryTable::create(None, vec!["v".into()]);
        for r in rows {
            table.add_row(vec![Some(r.to_string())]);
        }
        let ds = Rc::new(RefCell::new(MemoryDataSource::new(table, Encoding::Ascii)));
        ViewManager::new(ds)
    }

    #[test]
    fn q_quits() {
        let mut mgr = manager_with_rows(&["a"]);
        let mut router = InputRouter::new(80, 20);
        let outcome = router.handle_key(&mut mgr, KeyToken::Char('q'), |_| 10);
        assert_eq!(outcome, RouterOutcome::Quit);
    }

    #[test]
    fn slash_enters_search_mode_and_enter_confirms() {
        let mut mgr = manager_with_rows(&["apple", "banana"]);
        let mut router = InputRouter::new(80, 20);
        router.handle_key(&mut mgr, KeyToken::Char('/'), |_| 10);
        assert!(router.is_composing_search());
        router.handle_key(&mut mgr, KeyToken::Char('b'), |_| 10);
        router.handle_key(&mut mgr, KeyToken::Char('a'), |_| 10);
        router.handle_key(&mut mgr, KeyToken::Enter, |_| 10);
        assert!(!router.is_composing_search());
        assert_eq!(mgr.current().cursor_row, 1);
    }

    #[test]
    fn digit_cycles_sort_direction() {
        let mut mgr = manager_with_rows(&["b", "a"]);
        let mut router = InputRouter::new(80, 20);
        router.handle_key(&mut mgr, KeyToken::Char('0'), |_| 10);
        assert_eq!(mgr.current().sort_direction, SortDirection::Asc);
        router.handle_key(&mut mgr, KeyToken::Char('0'), |_| 10);
        assert_eq!(mgr.current().sort_direction, SortDirection::Desc);
        router.handle_key(&mut mgr, KeyToken::Char('0'), |_| 10);
        assert_eq!(mgr.current().sort_direction, SortDirection::None);
    }

    #[test]
    fn space_toggles_selection() {
        let mut mgr = manager_with_rows(&["a", "b"]);
        let mut router = InputRouter::new(80, 20);
        router.handle_key(&mut mgr, KeyToken::Char(' '), |_| 10);
        assert!(mgr.current().is_selected(0));
    }

    #[test]
    fn v_without_selection_is_a_no_op() {
        let mut mgr = manager_with_rows(&["a", "b"]);
        let mut router = InputRouter::new(80, 20);
        let outcome = router.handle_key(&mut mgr, KeyToken::Char('v'), |_| 10);
        assert_eq!(outcome, RouterOutcome::Consumed { needs_redraw: false });
        assert_eq!(mgr.count(), 1);
    }

    #[test]
    fn y_copies_rendered_cell_at_cursor() {
        let mut mgr = manager_with_rows(&["apple", "banana"]);
        let mut router = InputRouter::new(80, 20);
        let outcome = router.handle_key(&mut mgr, KeyToken::Char('y'), |_| 10);
        assert_eq!(outcome, RouterOutcome::CopyCell("apple".to_string()));
    }

    #[test]
    fn n_without_a_prior_search_is_ignored() {
        let mut mgr = manager_with_rows(&["apple", "banana"]);
        let mut router = InputRouter::new(80, 20);
        let outcome = router.handle_key(&mut mgr, KeyToken::Char('n'), |_| 10);
        assert_eq!(outcome, RouterOutcome::Ignored);
    }

    #[test]
    fn n_repeats_last_search_and_reports_the_outcome() {
        let mut mgr = manager_with_rows(&["apple", "banana", "apple"]);
        let mut router = InputRouter::new(80, 20);
        router.handle_key(&mut mgr, KeyToken::Char('/'), |_| 10);
        router.handle_key(&mut mgr, KeyToken::Char('a'), |_| 10);
        router.handle_key(&mut mgr, KeyToken::Enter, |_| 10);
        let outcome = router.handle_key(&mut mgr, KeyToken::Char('n'), |_| 10);
        assert_eq!(outcome, RouterOutcome::SearchResult(SearchOutcome::Found));
        assert_eq!(mgr.current().cursor_row, 1);
    }

    #[test]
    fn f_creates_an_analysis_view() {
        let mut mgr = manager_with_rows(&["a", "a", "b"]);
        let mut router = InputRouter::new(80, 20);
        let outcome = router.handle_key(&mut mgr, KeyToken::Char('f'), |_| 10);
        assert_eq!(outcome, RouterOutcome::Consumed { needs_redraw: true });
        assert_eq!(mgr.count(), 2);
        assert_eq!(mgr.current().visible_row_count, 2);
    }
}
