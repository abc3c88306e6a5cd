use crate::catalog::model::Unit;
use serde::{Deserialize, Serialize};

/// One page of filtered units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub units: Vec<Unit>,
    /// Matches before paging
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    /// Canonical query string of the filter that produced this page
    pub query: String,
    pub scope: String,
    pub elapsed_ms: f64,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// True when more matches exist past this page
    pub fn has_more(&self) -> bool {
        self.offset + self.units.len() < self.total
    }
}
