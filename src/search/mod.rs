//! Unit filtering, sorting and paging

pub mod filter;
pub mod presets;
pub mod query;
pub mod results;
pub mod sort;

pub use filter::FilterSpec;
pub use query::{filter_units, Scope, UnitSearch, UnitSearchParams};
pub use results::SearchResponse;
pub use sort::SortKey;
