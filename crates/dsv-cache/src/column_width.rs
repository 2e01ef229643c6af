//! Lazy per-column display-width analysis. spec.md §4.F.

use dsv_parse::{render_field, split_line, FieldDesc};
use dsv_text::{display_width, Encoding};

/// Per-column width state. `None` is the "uncalculated" sentinel (spec.md
/// §4.C seeds every column with it after the header parse).
#[derive(Debug, Clone)]
pub struct ColumnWidths {
    widths: Vec<Option<usize>>,
    min_width: usize,
    max_width: usize,
}

impl ColumnWidths {
    pub fn uncalculated(num_cols: usize, min_width: usize, max_width: usize) -> Self {
        Self {
            widths: vec![None; num_cols],
            min_width,
            max_width,
        }
    }

    pub fn is_calculated(&self, col: usize) -> bool {
        self.widths.get(col).copied().flatten().is_some()
    }

    /// Final clamped width for column `col`, computing it lazily from
    /// `sample_lines` if not already known.
    pub fn width(
        &mut self,
        col: usize,
        buffer: &[u8],
        encoding: Encoding,
        delimiter: u8,
        line_offsets: &[usize],
        sample_size: usize,
    ) -> usize {
        if let Some(Some(w)) = self.widths.get(col) {
            return *w;
        }
        self.compute_all(buffer, encoding, delimiter, line_offsets, sample_size);
        self.widths[col].unwrap_or(self.min_width)
    }

    /// spec.md §4.F: for each of the first `min(S, num_lines)` rows, update
    /// every column's running max width, short-circuiting a column once it
    /// reaches `max_width`. Computes every column's width in one pass rather
    /// than one column at a time, since the whole row is already parsed to
    /// reach any one field and computing all columns from that same parse
    /// costs nothing extra.
    fn compute_all(&mut self, buffer: &[u8], encoding: Encoding, delimiter: u8, line_offsets: &[usize], sample_size: usize) {
        let num_cols = self.widths.len();
        let mut running = vec![0usize; num_cols];
        let mut done = vec![false; num_cols];

        let sample_len = sample_size.min(line_offsets.len());
        for &line_start in &line_offsets[..sample_len] {
            if done.iter().all(|&d| d) {
                break;
            }
            let fields = split_line(buffer, delimiter, line_start, num_cols);
            for (col, field) in fields.iter().enumerate().take(num_cols) {
                if done[col] {
                    continue;
                }
                let rendered = render_field(buffer, field);
                let w = display_width(&rendered, encoding);
                if w > running[col] {
                    running[col] = w;
                }
                if running[col] >= self.max_width {
                    done[col] = true;
                }
            }
        }

        for col in 0..num_cols {
            let clamped = running[col].clamp(self.min_width, self.max_width);
            self.widths[col] = Some(clamped);
        }
        tracing::debug!(target: "cache.column_width", sampled = sample_len, cols = num_cols, "column_widths_computed");
    }

    pub fn invalidate(&mut self) {
        for w in &mut self.widths {
            *w = None;
        }
    }
}

/// Width of a single already-split field, independent of the column
/// analyzer's sampling/clamping — used by the row renderer, which needs the
/// natural width of the exact cell being drawn.
pub fn field_display_width(buffer: &[u8], field: &FieldDesc, encoding: Encoding) -> usize {
    display_width(&render_field(buffer, field), encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> &'static [u8] {
        b"a,bb,ccc\n1,22,333\n11,2,3333333333\n"
    }

    fn offsets() -> Vec<usize> {
        vec![0, 9, 18]
    }

    #[test]
    fn uncalculated_starts_as_none() {
        let widths = ColumnWidths::uncalculated(3, 1, 100);
        assert!(!widths.is_calculated(0));
    }

    #[test]
    fn width_computes_lazily_and_caches() {
        let mut widths = ColumnWidths::uncalculated(3, 1, 100);
        let w = widths.width(2, data(), Encoding::Ascii, b',', &offsets(), 10);
        assert_eq!(w, 10); // "3333333333" is 10 chars
        assert!(widths.is_calculated(0));
        assert!(widths.is_calculated(2));
    }

    #[test]
    fn width_is_clamped_to_max() {
        let mut widths = ColumnWidths::uncalculated(3, 1, 5);
        let w = widths.width(2, data(), Encoding::Ascii, b',', &offsets(), 10);
        assert_eq!(w, 5);
    }

    #[test]
    fn width_is_clamped_to_min() {
        let data = b"a,b\n,\n";
        let mut widths = ColumnWidths::uncalculated(2, 3, 20);
        let w = widths.width(0, data, Encoding::Ascii, b',', &[0, 2], 10);
        assert_eq!(w, 3);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let mut widths = ColumnWidths::uncalculated(3, 1, 100);
        widths.width(0, data(), Encoding::Ascii, b',', &offsets(), 10);
        widths.invalidate();
        assert!(!widths.is_calculated(0));
    }
}
