pub mod filter;
pub mod sort;
pub mod store;

pub use filter::{apply_filters, DayNight, FilterSet};
pub use sort::{apply_sort, ColumnSort, SortColumn, SortDirection, SortKey};
pub use store::{object_classes, LibraryAction, LibraryState};
