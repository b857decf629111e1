use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of results per page
pub const DEFAULT_PAGE_SIZE: usize = 128;

/// Query-type specific parameters appended to a request URL.
///
/// The request builder calls this once per request and appends the result
/// after its own paging and sorting parameters.
pub trait QueryStringVariables {
    fn custom_query_string_variables(&self) -> String;
}

/// Sort order for a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortedField {
    pub field: String,
    pub descending: bool,
}

impl SortedField {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: false }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: true }
    }
}

/// Field to return highlighted fragments for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightedField {
    pub field: String,
    pub fragment_length: u32,
    pub fragment_count: u32,

    /// Field to store the fragments under, when different from `field`
    pub fragments_field: Option<String>,
}

impl HighlightedField {
    pub fn new(field: impl Into<String>, fragment_length: u32, fragment_count: u32) -> Self {
        Self {
            field: field.into(),
            fragment_length,
            fragment_count,
            fragments_field: None,
        }
    }
}

/// General index query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexQuery {
    /// Query text
    pub query: String,

    /// Index of the first result to return
    pub start: usize,

    /// Ignore documents indexed after this point in time
    pub cutoff: Option<DateTime<Utc>>,

    /// Maximum number of results
    pub page_size: usize,

    /// Projection; empty means whole documents
    pub fields_to_fetch: Vec<String>,

    pub sorted_fields: Vec<SortedField>,

    pub highlighter_pre_tags: Vec<String>,

    pub highlighter_post_tags: Vec<String>,

    pub highlighted_fields: Vec<HighlightedField>,

    /// Name of the server-side transformer applied to results
    pub results_transformer: Option<String>,
}

impl Default for IndexQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            start: 0,
            cutoff: None,
            page_size: DEFAULT_PAGE_SIZE,
            fields_to_fetch: Vec::new(),
            sorted_fields: Vec::new(),
            highlighter_pre_tags: Vec::new(),
            highlighter_post_tags: Vec::new(),
            highlighted_fields: Vec::new(),
            results_transformer: None,
        }
    }
}

impl IndexQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Default::default() }
    }

    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_cutoff(mut self, cutoff: DateTime<Utc>) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    pub fn with_fields_to_fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields_to_fetch = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sorted_field(mut self, field: SortedField) -> Self {
        self.sorted_fields.push(field);
        self
    }

    /// Set the tags wrapped around each highlighted term
    pub fn with_highlighter_tags(
        mut self,
        pre_tag: impl Into<String>,
        post_tag: impl Into<String>,
    ) -> Self {
        self.highlighter_pre_tags.push(pre_tag.into());
        self.highlighter_post_tags.push(post_tag.into());
        self
    }

    pub fn with_highlighted_field(mut self, field: HighlightedField) -> Self {
        self.highlighted_fields.push(field);
        self
    }

    pub fn with_results_transformer(mut self, transformer: impl Into<String>) -> Self {
        self.results_transformer = Some(transformer.into());
        self
    }
}

impl QueryStringVariables for IndexQuery {
    fn custom_query_string_variables(&self) -> String {
        String::new()
    }
}
