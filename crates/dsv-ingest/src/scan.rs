//! Line-offset scan, spec.md §4.C. Deliberately not quote-aware: a `\n`
//! inside a quoted field still ends a "line" here. The parser
//! (`dsv-parse`) is the only quote-aware component; fields that embed a
//! literal newline inside quotes are not supported by this viewer. See
//! SPEC_FULL.md §5.1.

const LINE_CAPACITY_GROWTH_FACTOR: f64 = 1.2;

/// Estimate how many line offsets to pre-allocate for, sampling at most the
/// first 64KiB. Growing a `Vec` past this estimate just reallocates; this
/// only avoids repeated reallocation on large files.
pub fn estimate_line_count(data: &[u8], default_chars_per_line: usize) -> usize {
    const SAMPLE_WINDOW: usize = 64 * 1024;
    let sample_len = SAMPLE_WINDOW.min(data.len());
    if sample_len == 0 {
        return 1;
    }
    let sample = &data[..sample_len];
    let sample_lines = memchr::memchr_iter(b'\n', sample).count();

    if sample_lines == 0 {
        return (data.len() / default_chars_per_line.max(1)) + 1;
    }
    let avg_line_len = sample_len as f64 / sample_lines as f64;
    ((data.len() as f64 / avg_line_len) * LINE_CAPACITY_GROWTH_FACTOR) as usize + 1
}

/// Push offset 0, then the offset just past every `\n` that remains strictly
/// within `data.len()` (a final trailing newline does not produce a phantom
/// empty last line).
pub fn scan_line_offsets(data: &[u8], default_chars_per_line: usize) -> Vec<usize> {
    if data.is_empty() {
        return Vec::new();
    }

    let mut offsets = Vec::with_capacity(estimate_line_count(data, default_chars_per_line));
    offsets.push(0);

    for nl in memchr::memchr_iter(b'\n', data) {
        let next_line_offset = nl + 1;
        if next_line_offset < data.len() {
            offsets.push(next_line_offset);
        }
    }

    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_has_no_offsets() {
        assert_eq!(scan_line_offsets(b"", 40), Vec::<usize>::new());
    }

    #[test]
    fn single_line_no_trailing_newline() {
        assert_eq!(scan_line_offsets(b"a,b,c", 40), vec![0]);
    }

    #[test]
    fn trailing_newline_does_not_add_phantom_line() {
        assert_eq!(scan_line_offsets(b"a,b,c\n", 40), vec![0]);
    }

    #[test]
    fn three_lines_yield_three_offsets() {
        let data = b"a\nbb\nccc\n";
        assert_eq!(scan_line_offsets(data, 40), vec![0, 2, 5]);
    }

    #[test]
    fn newline_inside_quotes_still_splits_a_line() {
        // Documented limitation: the scan is not quote-aware.
        let data = b"a,\"b\nc\",d\n";
        let offsets = scan_line_offsets(data, 40);
        assert_eq!(offsets, vec![0, 6]);
    }

    #[test]
    fn estimate_falls_back_when_sample_has_no_newline() {
        let data = vec![b'x'; 100];
        let estimate = estimate_line_count(&data, 40);
        assert_eq!(estimate, 100 / 40 + 1);
    }
}
