//! Per-encoding display width and safe truncation, spec.md §4.B ("Width +
//! truncation for a detected encoding"). ASCII/Latin-1/Windows-1252 treat
//! every byte as one display column and truncate on byte boundaries; UTF-8
//! decodes to code points and sums east-asian display width, stopping before
//! the target width is exceeded.

use crate::encoding::Encoding;
use unicode_width::UnicodeWidthChar;

/// Display width in terminal columns of a raw cell.
pub fn display_width(bytes: &[u8], encoding: Encoding) -> usize {
    match encoding {
        Encoding::Ascii | Encoding::Latin1 | Encoding::Windows1252 => bytes.len(),
        Encoding::Utf8 | Encoding::Utf8Bom => {
            let text = String::from_utf8_lossy(bytes);
            text.chars().map(codepoint_width).sum()
        }
    }
}

/// Width of one code point; control characters count as 1 (spec.md §4.B).
fn codepoint_width(c: char) -> usize {
    if c.is_control() {
        1
    } else {
        UnicodeWidthChar::width(c).unwrap_or(1)
    }
}

/// Truncate `bytes` so the rendered result's display width does not exceed
/// `target_width`. Returns a borrowed slice when no truncation was needed,
/// an owned buffer otherwise (UTF-8 truncation can't always land on the
/// original byte boundary used by a naive byte-count cut).
pub fn truncate_to_width(bytes: &[u8], encoding: Encoding, target_width: usize) -> Vec<u8> {
    match encoding {
        Encoding::Ascii | Encoding::Latin1 | Encoding::Windows1252 => {
            bytes[..target_width.min(bytes.len())].to_vec()
        }
        Encoding::Utf8 | Encoding::Utf8Bom => {
            let text = String::from_utf8_lossy(bytes);
            let mut acc = 0usize;
            let mut out = String::new();
            for c in text.chars() {
                let w = codepoint_width(c);
                if acc + w > target_width {
                    break;
                }
                acc += w;
                out.push(c);
            }
            out.into_bytes()
        }
    }
}

/// Decode raw bytes into a `String` suitable for terminal output, applying
/// the code-page mapping for the detected encoding. UTF-8 variants use lossy
/// decoding (mmap'd bytes are never mutated, so replacement characters are
/// the only recourse for malformed input); Latin-1 maps each byte directly
/// to its identical code point; Windows-1252 additionally remaps the
/// `0x80..=0x9F` control block to its printable assignments.
pub fn decode_for_display(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Utf8 | Encoding::Utf8Bom | Encoding::Ascii => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        Encoding::Windows1252 => bytes.iter().map(|&b| windows_1252_to_char(b)).collect(),
    }
}

fn windows_1252_to_char(b: u8) -> char {
    const HIGH_CONTROL: [char; 32] = [
        '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}',
        '\u{2021}', '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}',
        '\u{017D}', '\u{008F}', '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
        '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
        '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
    ];
    if (0x80..=0x9F).contains(&b) {
        HIGH_CONTROL[(b - 0x80) as usize]
    } else {
        b as char
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_is_byte_count() {
        assert_eq!(display_width(b"hello", Encoding::Ascii), 5);
    }

    #[test]
    fn utf8_wide_glyph_counts_two() {
        assert_eq!(display_width("界".as_bytes(), Encoding::Utf8), 2);
    }

    #[test]
    fn truncation_never_exceeds_target_width() {
        let bytes = "hello world".as_bytes();
        let truncated = truncate_to_width(bytes, Encoding::Utf8, 5);
        assert_eq!(display_width(&truncated, Encoding::Utf8), 5);
        assert_eq!(truncated, b"hello");
    }

    #[test]
    fn short_string_under_width_is_unchanged() {
        let bytes = b"hi";
        let truncated = truncate_to_width(bytes, Encoding::Ascii, 10);
        assert_eq!(truncated, bytes);
    }

    #[test]
    fn utf8_truncation_respects_codepoint_boundaries() {
        let bytes = "a界b".as_bytes();
        // Width budget 2: 'a' (1) + wide glyph would be 3, so stop after 'a'.
        let truncated = truncate_to_width(bytes, Encoding::Utf8, 2);
        assert_eq!(String::from_utf8(truncated).unwrap(), "a");
    }

    #[test]
    fn latin1_decodes_byte_as_codepoint() {
        let decoded = decode_for_display(&[0xE9], Encoding::Latin1);
        assert_eq!(decoded, "\u{e9}");
    }

    proptest::proptest! {
        #[test]
        fn truncation_never_exceeds_target_width_for_arbitrary_utf8(
            s in "[a-zA-Z0-9 \u{4e2d}\u{6587}]{0,40}",
            target in 0usize..40,
        ) {
            let truncated = truncate_to_width(s.as_bytes(), Encoding::Utf8, target);
            prop_assert!(display_width(&truncated, Encoding::Utf8) <= target);
        }

        #[test]
        fn truncation_never_exceeds_target_width_for_arbitrary_bytes(
            bytes in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..40),
            target in 0usize..40,
        ) {
            let truncated = truncate_to_width(&bytes, Encoding::Latin1, target);
            prop_assert!(display_width(&truncated, Encoding::Latin1) <= target);
        }
    }
}
