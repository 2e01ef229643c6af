//! Row/column model: tables, data sources, views, sorting, and analysis.
//! spec.md §3-§4 ("Model" components).

pub mod analysis;
pub mod data_source;
pub mod sort;
pub mod table;
pub mod value_index;
pub mod view;
pub mod view_manager;

pub use data_source::{DataSource, FileDataSource, MemoryDataSource};
pub use sort::sort_view;
pub use table::InMemoryTable;
pub use value_index::ValueIndex;
pub use view::{compress_into_ranges, RowRange, SharedDataSource, SortDirection, View, ViewId};
pub use view_manager::ViewManager;
