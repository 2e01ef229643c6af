//! Layout, highlight, and status-line logic shared by the viewer's render
//! pass. spec.md §4.N.

pub mod highlight;
pub mod layout;
pub mod status;
pub mod writer;

pub use highlight::{compute_highlights, Highlight, HighlightSpan};
pub use layout::{calculate_header_layout, get_column_screen_position, is_column_fully_visible, smallest_start_col_for_visibility, HeaderLayout, SEPARATOR_WIDTH};
pub use status::{DefaultStatusInputs, SortIndicator, StatusLine};
pub use writer::{Command, Writer};
