//! Status line composition. spec.md §4.N "Status line precedence".
//!
//! Error and status messages are both wall-clock-timed, auto-clearing
//! after 3s; the default line is assembled from view/cursor/selection/sort
//! state.

use std::time::{Duration, Instant};

const AUTO_CLEAR: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
struct Timed {
    text: String,
    set_at: Instant,
}

impl Timed {
    fn new(text: String) -> Self {
        Self { text, set_at: Instant::now() }
    }

    fn active(&self, now: Instant) -> bool {
        now.duration_since(self.set_at) < AUTO_CLEAR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    None,
    Asc(usize),
    Desc(usize),
}

/// Everything the default status line needs, independent of terminal state.
#[derive(Debug, Clone)]
pub struct DefaultStatusInputs {
    pub view_name: String,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub viewing_start: usize,
    pub viewing_end: usize,
    pub total_rows: usize,
    pub selection_count: usize,
    pub sort: SortIndicator,
}

#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    search_echo: Option<String>,
    error: Option<Timed>,
    status: Option<Timed>,
    copy_status: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_echo(&mut self, term: Option<String>) {
        self.search_echo = term;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(Timed::new(message.into()));
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(Timed::new(message.into()));
    }

    pub fn set_copy_status(&mut self, message: impl Into<String>) {
        self.copy_status = Some(message.into());
    }

    /// Whether `resolve` would currently surface the error message (i.e. no
    /// search echo is overriding it and the error hasn't auto-cleared).
    /// Callers use this to decide whether to apply the error color pair
    /// (spec.md §6) to the resolved line.
    pub fn is_error_active(&self, now: Instant) -> bool {
        self.search_echo.is_none() && self.error.as_ref().is_some_and(|e| e.active(now))
    }

    /// Resolve, at render time, the single line to display: search echo,
    /// then a live error, then a live status, then a copy status, then the
    /// default composite line. Earlier-listed sources win.
    pub fn resolve(&self, now: Instant, default: &DefaultStatusInputs) -> String {
        if let Some(term) = &self.search_echo {
            return format!("Search: {term}");
        }
        if let Some(error) = &self.error {
            if error.active(now) {
                return error.text.clone();
            }
        }
        if let Some(status) = &self.status {
            if status.active(now) {
                return status.text.clone();
            }
        }
        if let Some(copy) = &self.copy_status {
            return copy.clone();
        }
        default_line(default)
    }
}

fn default_line(d: &DefaultStatusInputs) -> String {
    let mut line = format!(
        "{} | Cursor: ({},{}) | Viewing: {}-{} of {} | sel: {}",
        d.view_name, d.cursor_row, d.cursor_col, d.viewing_start, d.viewing_end, d.total_rows, d.selection_count
    );
    match d.sort {
        SortIndicator::None => {}
        SortIndicator::Asc(col) => line.push_str(&format!(" | Sorted by: {col} (ASC)")),
        SortIndicator::Desc(col) => line.push_str(&format!(" | Sorted by: {col} (DESC)")),
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> DefaultStatusInputs {
        DefaultStatusInputs {
            view_name: "View 1 (Main)".to_string(),
            cursor_row: 0,
            cursor_col: 0,
            viewing_start: 1,
            viewing_end: 20,
            total_rows: 100,
            selection_count: 0,
            sort: SortIndicator::None,
        }
    }

    #[test]
    fn default_line_has_no_sort_suffix_when_unsorted() {
        let line = StatusLine::new().resolve(Instant::now(), &inputs());
        assert!(!line.contains("Sorted by"));
        assert!(line.contains("View 1 (Main)"));
    }

    #[test]
    fn search_echo_wins_over_everything() {
        let mut s = StatusLine::new();
        s.set_error("boom");
        s.set_search_echo(Some("term".to_string()));
        assert_eq!(s.resolve(Instant::now(), &inputs()), "Search: term");
    }

    #[test]
    fn error_wins_over_status_and_copy() {
        let mut s = StatusLine::new();
        s.set_status("saved");
        s.set_copy_status("Copied: x");
        s.set_error("bad thing");
        assert_eq!(s.resolve(Instant::now(), &inputs()), "bad thing");
    }

    #[test]
    fn is_error_active_tracks_resolve() {
        let mut s = StatusLine::new();
        assert!(!s.is_error_active(Instant::now()));
        s.set_error("bad thing");
        assert!(s.is_error_active(Instant::now()));
        s.set_search_echo(Some("term".to_string()));
        assert!(!s.is_error_active(Instant::now()));

        let mut s = StatusLine::new();
        s.set_error("bad thing");
        let later = Instant::now() + Duration::from_secs(4);
        assert!(!s.is_error_active(later));
    }

    #[test]
    fn expired_error_falls_through_to_status() {
        let mut s = StatusLine::new();
        s.set_error("bad thing");
        s.set_status("saved");
        let later = Instant::now() + Duration::from_secs(4);
        assert_eq!(s.resolve(later, &inputs()), "saved");
    }

    #[test]
    fn sort_suffix_reflects_direction() {
        let mut inputs = inputs();
        inputs.sort = SortIndicator::Desc(2);
        let line = StatusLine::new().resolve(Instant::now(), &inputs);
        assert!(line.ends_with("Sorted by: 2 (DESC)"));
    }
}
