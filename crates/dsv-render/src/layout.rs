//! Header/column layout geometry. spec.md §4.N.
//!
//! Both layout and position resolution walk columns left to right
//! accumulating `col_width + separator_width`, truncating the column that
//! would overflow the screen. Kept as pure functions over a `column_width`
//! closure rather than a `DataSource` directly, so the identical geometry
//! can be replayed for rendering, auto-scroll, and highlighting without
//! re-borrowing the data source.

pub const SEPARATOR_WIDTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    pub content_width: usize,
    pub last_visible_col: usize,
    pub has_more_columns_right: bool,
    pub underline_width: usize,
}

/// Fit as many columns starting at `start_col` into `screen_width` as
/// possible, truncating the last one if positive space remains.
pub fn calculate_header_layout(
    num_fields: usize,
    start_col: usize,
    screen_width: usize,
    column_width: impl Fn(usize) -> usize,
) -> HeaderLayout {
    let mut content_width = 0usize;
    let mut last_visible_col = start_col;
    let mut broke_early = false;

    if num_fields > 0 {
        for col in start_col..num_fields {
            let col_width = column_width(col);
            let separator_space = if col < num_fields - 1 { SEPARATOR_WIDTH } else { 0 };
            let needed_space = col_width + separator_space;

            if content_width + needed_space > screen_width {
                let remaining = screen_width as isize - content_width as isize - separator_space as isize;
                if remaining <= 0 {
                    broke_early = true;
                    break;
                }
                content_width += remaining as usize;
                last_visible_col = col;
                broke_early = true;
                break;
            }
            content_width += needed_space;
            last_visible_col = col;
        }
    }

    let has_more_columns_right = broke_early || (num_fields > 0 && last_visible_col + 1 < num_fields);
    let underline_width = if has_more_columns_right { screen_width } else { content_width };

    HeaderLayout {
        content_width,
        last_visible_col,
        has_more_columns_right,
        underline_width,
    }
}

/// Replay the same layout for a single `target_col`, returning its screen
/// `(x, width)` if visible under `start_col`. The single source of truth
/// rendering, auto-scroll, and highlighting all call into.
pub fn get_column_screen_position(
    num_fields: usize,
    start_col: usize,
    target_col: usize,
    screen_width: usize,
    column_width: impl Fn(usize) -> usize,
) -> Option<(usize, usize)> {
    if target_col < start_col {
        return None;
    }

    let mut x = 0usize;
    for col in start_col..num_fields.min(target_col + 1) {
        if x >= screen_width {
            return None;
        }

        let original_col_width = column_width(col);
        let mut col_width = original_col_width;
        let separator_space = if col < num_fields - 1 { SEPARATOR_WIDTH } else { 0 };
        let needed_space = col_width + separator_space;
        if x + needed_space > screen_width {
            let remaining = screen_width as isize - x as isize;
            if remaining <= 0 {
                return None;
            }
            col_width = remaining as usize;
        }

        if col == target_col {
            return Some((x, col_width));
        }

        x += col_width;
        if col < num_fields - 1 && col_width == original_col_width {
            x += SEPARATOR_WIDTH;
        }

        if col_width != original_col_width && x >= screen_width {
            return None;
        }
    }

    None
}

/// True iff `target_col` is fully on-screen (not truncated, not past the
/// right edge) under the current `start_col`. Drives horizontal auto-scroll.
pub fn is_column_fully_visible(
    num_fields: usize,
    start_col: usize,
    target_col: usize,
    screen_width: usize,
    column_width: impl Fn(usize) -> usize,
) -> bool {
    match get_column_screen_position(num_fields, start_col, target_col, screen_width, &column_width) {
        Some((_, width)) => width >= column_width(target_col),
        None => false,
    }
}

/// Smallest `start_col` (searching rightward from the current one) making
/// `target_col` fully visible, for rightward cursor movement; leftward
/// movement simply sets `start_col = target_col` (spec.md §4.N).
pub fn smallest_start_col_for_visibility(
    num_fields: usize,
    current_start_col: usize,
    target_col: usize,
    screen_width: usize,
    column_width: impl Fn(usize) -> usize,
) -> usize {
    if target_col < current_start_col {
        return target_col;
    }
    let mut candidate = current_start_col;
    while candidate < target_col {
        if is_column_fully_visible(num_fields, candidate, target_col, screen_width, &column_width) {
            return candidate;
        }
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    // spec.md §8 scenario 6: 5 columns width 10, separator width 3, 18-col screen.
    fn width(_col: usize) -> usize {
        10
    }

    #[test]
    fn header_layout_truncates_last_visible_column() {
        let layout = calculate_header_layout(5, 0, 18, width);
        assert_eq!(layout.last_visible_col, 1);
        assert!(layout.has_more_columns_right);
        assert_eq!(layout.underline_width, 18);
    }

    #[test]
    fn no_more_columns_right_uses_content_width_as_underline() {
        let layout = calculate_header_layout(2, 0, 100, width);
        assert!(!layout.has_more_columns_right);
        assert_eq!(layout.underline_width, layout.content_width);
    }

    #[test]
    fn column_screen_position_matches_layout_accumulation() {
        // Column 0 at x=0 width 10; column 1 starts at x=13 (10+separator).
        assert_eq!(get_column_screen_position(5, 0, 0, 18, width), Some((0, 10)));
        assert_eq!(get_column_screen_position(5, 0, 1, 18, width), Some((13, 5)));
    }

    #[test]
    fn column_left_of_start_col_is_not_visible() {
        assert_eq!(get_column_screen_position(5, 2, 0, 18, width), None);
    }

    #[test]
    fn horizontal_autoscroll_scenario() {
        // 5 columns of width 10, separator width 3, 18-column screen.
        // Pressing Right four times (cursor_col 0->1->2->3->4) should each
        // time yield the smallest start_col making the cursor fully visible.
        let mut start_col = 0usize;
        for cursor_col in 1..=4 {
            start_col = smallest_start_col_for_visibility(5, start_col, cursor_col, 18, width);
            assert!(is_column_fully_visible(5, start_col, cursor_col, 18, width));
        }
    }
}
