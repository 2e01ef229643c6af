//! spec.md §4.C: "scan first `delimiter_detection_sample_size` bytes, count
//! `,` `\t` `|` `;`; pick the max with tie-break `,` > `\t` > `|` > `;`."

pub const CANDIDATES: [u8; 4] = [b',', b'\t', b'|', b';'];

pub fn detect_delimiter(data: &[u8], sample_size: usize, forced: Option<u8>) -> u8 {
    if let Some(d) = forced {
        return d;
    }

    let sample_len = sample_size.min(data.len());
    let sample = &data[..sample_len];

    let mut counts = [0usize; 4];
    for &b in sample {
        if let Some(idx) = CANDIDATES.iter().position(|&c| c == b) {
            counts[idx] += 1;
        }
    }

    let mut best_idx = 0;
    for i in 1..CANDIDATES.len() {
        if counts[i] > counts[best_idx] {
            best_idx = i;
        }
    }
    CANDIDATES[best_idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_wins_ties() {
        assert_eq!(detect_delimiter(b"", 100, None), b',');
    }

    #[test]
    fn tab_wins_when_more_frequent() {
        let data = b"a\tb\tc\nd\te\tf\n";
        assert_eq!(detect_delimiter(data, 100, None), b'\t');
    }

    #[test]
    fn pipe_detected() {
        let data = b"a|b|c\nd|e|f\n";
        assert_eq!(detect_delimiter(data, 100, None), b'|');
    }

    #[test]
    fn comma_beats_tab_on_equal_counts() {
        let data = b"a,b\tc\n";
        assert_eq!(detect_delimiter(data, 100, None), b',');
    }

    #[test]
    fn forced_delimiter_overrides_detection() {
        assert_eq!(detect_delimiter(b"a,b,c\n", 100, Some(b';')), b';');
    }

    #[test]
    fn sample_size_limits_scan() {
        // Only the first byte ("a|") is sampled; the many commas afterward
        // are out of the window, so pipe should win.
        let data = b"a|,,,,,,,,,,,,,,,,,,,,\n";
        assert_eq!(detect_delimiter(data, 2, None), b'|');
    }
}
