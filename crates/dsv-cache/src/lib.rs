//! Display truncation cache and column-width analysis. spec.md §4.E, §4.F.

mod column_width;
mod display_cache;

pub use column_width::{field_display_width, ColumnWidths};
pub use display_cache::{CachedStr, DisplayCache};
