//! Compositional highlight policy. spec.md §4.N "Highlight policy".
//!
//! Four independent rules composed rather than a single "highlighted cell"
//! flag, mirroring distinct header/selected-row color-pair toggles applied
//! independently per render pass.

use crate::layout::HeaderLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Header,
    SelectedRow,
    CursorColumn,
    CursorHeaderColumn,
}

/// One highlight instruction: a screen row and a `[start, start+width)` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub kind: Highlight,
    pub row: usize,
    pub start: usize,
    pub width: usize,
}

/// Compute every highlight span active for one rendered frame. `cursor_col_x_width`
/// is the cursor column's screen position from `get_column_screen_position`,
/// `None` when it has scrolled out of view.
pub fn compute_highlights(
    header_row: usize,
    data_rows: &[usize],
    selected_rows: &[bool],
    cursor_col_x_width: Option<(usize, usize)>,
    layout: &HeaderLayout,
) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();

    spans.push(HighlightSpan {
        kind: Highlight::Header,
        row: header_row,
        start: 0,
        width: layout.underline_width,
    });

    for (i, &row) in data_rows.iter().enumerate() {
        if selected_rows.get(i).copied().unwrap_or(false) {
            spans.push(HighlightSpan {
                kind: Highlight::SelectedRow,
                row,
                start: 0,
                width: layout.content_width,
            });
        }
    }

    if let Some((x, width)) = cursor_col_x_width {
        for &row in data_rows {
            spans.push(HighlightSpan {
                kind: Highlight::CursorColumn,
                row,
                start: x,
                width,
            });
        }
        spans.push(HighlightSpan {
            kind: Highlight::CursorHeaderColumn,
            row: header_row,
            start: x,
            width,
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_span_always_present() {
        let layout = HeaderLayout {
            content_width: 40,
            last_visible_col: 3,
            has_more_columns_right: false,
            underline_width: 40,
        };
        let spans = compute_highlights(0, &[1, 2], &[false, false], None, &layout);
        assert!(spans.iter().any(|s| s.kind == Highlight::Header && s.width == 40));
    }

    #[test]
    fn selected_rows_get_row_highlight() {
        let layout = HeaderLayout {
            content_width: 40,
            last_visible_col: 3,
            has_more_columns_right: false,
            underline_width: 40,
        };
        let spans = compute_highlights(0, &[1, 2, 3], &[false, true, false], None, &layout);
        let selected: Vec<_> = spans.iter().filter(|s| s.kind == Highlight::SelectedRow).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].row, 2);
    }

    #[test]
    fn no_cursor_column_highlight_when_scrolled_off() {
        let layout = HeaderLayout {
            content_width: 40,
            last_visible_col: 3,
            has_more_columns_right: false,
            underline_width: 40,
        };
        let spans = compute_highlights(0, &[1], &[false], None, &layout);
        assert!(!spans.iter().any(|s| s.kind == Highlight::CursorColumn));
    }
}
