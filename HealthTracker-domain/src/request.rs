/// Query options for collection requests (paging, sorting, search and filters)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Zero-based page index
    pub page: Option<u32>,

    /// Page size
    pub size: Option<u32>,

    /// Sort criteria in `property,direction` form, e.g. `date,desc`
    pub sort: Vec<String>,

    /// Free-text search query
    pub query: Option<String>,

    /// Additional filter parameters passed through verbatim
    pub filters: Vec<(String, String)>,
}

impl RequestOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page index
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Append a sort criterion
    pub fn sort(mut self, criterion: impl Into<String>) -> Self {
        self.sort.push(criterion.into());
        self
    }

    /// Set the search query
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Append a filter parameter
    pub fn filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((name.into(), value.into()));
        self
    }

    /// Encode as query-string pairs.
    ///
    /// Order is `page`, `size`, every `sort` entry, `query`, then filters in
    /// insertion order. Unset options are left out.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        for criterion in &self.sort {
            pairs.push(("sort".to_string(), criterion.clone()));
        }
        if let Some(query) = &self.query {
            pairs.push(("query".to_string(), query.clone()));
        }
        pairs.extend(self.filters.iter().cloned());

        pairs
    }
}
