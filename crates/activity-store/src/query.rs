//! Collection queries
//!
//! Only what the activity pipeline needs: equality filters joined by AND, and
//! an absence filter for scoping post-level records away from comment-level
//! ones.

use activity_model::Document;
use serde_json::Value;
use std::fmt;

/// Filter operation
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Field equals value
    Eq(Value),
    /// Field is absent or null
    Missing,
}

/// Single field filter
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
}

impl Filter {
    /// Check whether a document satisfies this filter
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        match &self.op {
            FilterOp::Eq(expected) => document.get(&self.field) == Some(expected),
            FilterOp::Missing => document.get(&self.field).map_or(true, Value::is_null),
        }
    }
}

/// Query over one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: String,
    filters: Vec<Filter>,
}

impl Query {
    /// Start a query on a collection (matches everything until filtered)
    #[inline]
    #[must_use]
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filters: Vec::new(),
        }
    }

    /// Add an equality filter
    #[inline]
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op: FilterOp::Eq(value.into()),
        });
        self
    }

    /// Add an absence filter
    #[inline]
    #[must_use]
    pub fn where_missing(mut self, field: impl Into<String>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op: FilterOp::Missing,
        });
        self
    }

    #[inline]
    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    #[inline]
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Check whether a document satisfies every filter
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(document))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection)?;
        for filter in &self.filters {
            match &filter.op {
                FilterOp::Eq(v) => write!(f, " [{} == {}]", filter.field, v)?,
                FilterOp::Missing => write!(f, " [{} missing]", filter.field)?,
            }
        }
        Ok(())
    }
}
