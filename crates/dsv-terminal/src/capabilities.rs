//! Terminal capability probing. spec.md §6 "Terminal".
//!
//! A cheap, once-at-startup probe the rest of the viewer consults rather
//! than querying the terminal mid-draw.

/// Locale-derived separator choice plus the three named color pairs
/// (header, selected row, error) spec.md §6 requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub supports_unicode: bool,
}

impl TerminalCapabilities {
    /// `LANG`/`LC_ALL`/`LC_CTYPE` containing "UTF-8" (case-insensitive)
    /// selects the Unicode `│` column separator; anything else falls back
    /// to ASCII `|`.
    pub fn detect() -> Self {
        let locale = std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LC_CTYPE"))
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_default();
        Self {
            supports_unicode: locale.to_uppercase().contains("UTF-8") || locale.to_uppercase().contains("UTF8"),
        }
    }

    /// The column separator, wrapped in spaces (`" │ "` / `" | "`): both
    /// render at display width 3, spec.md §8 scenario 6's assumed width.
    pub fn column_separator(&self) -> &'static str {
        if self.supports_unicode {
            " \u{2502} "
        } else {
            " | "
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPair {
    Header,
    Selected,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_is_width_three() {
        let unicode = TerminalCapabilities { supports_unicode: true };
        let ascii = TerminalCapabilities { supports_unicode: false };
        assert_eq!(unicode.column_separator(), " \u{2502} ");
        assert_eq!(ascii.column_separator(), " | ");
    }
}
