//! Query options

/// Knobs for one query call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Stop after this many results (`None` = all)
    pub limit: Option<usize>,
    /// Ask the tree's id index when querying `#id` from the document node
    pub use_id_index: bool,
    /// Walk the context's descendants once per call and reuse the list for
    /// every compound collected directly under the context
    pub cache_descendants: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn without_id_index(mut self) -> Self {
        self.use_id_index = false;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache_descendants = false;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            limit: None,
            use_id_index: true,
            cache_descendants: true,
        }
    }
}
