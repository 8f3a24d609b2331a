//! Database query building: filter and sort expressions from the command line.

pub mod filter;
pub mod sort;

pub use filter::{compile_filter, compile_filters, Filter, FilterValue, Operator, PropertyFilter};
pub use sort::{compile_sort, Direction, SortDescriptor};

use serde::Serialize;

/// Body of a `POST /v1/databases/{id}/query` request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatabaseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<SortDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}
