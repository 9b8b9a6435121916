//! Pure title/tag filter over the cached knowledge list.
//!
//! # Invariants
//! - Filtering never mutates or reorders its input.
//! - Title matching is a case-sensitive substring test without trimming.
//! - Tag matching is exact.

use crate::model::knowledge::KnowledgeRecord;

/// Search string plus optional single-tag filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    search: String,
    tag: Option<String>,
}

impl ListFilter {
    pub fn new(search: impl Into<String>, tag: Option<String>) -> Self {
        let mut filter = Self {
            search: search.into(),
            tag: None,
        };
        filter.set_tag(tag.as_deref().unwrap_or(""));
        filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replaces the search string verbatim.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Selects `tag`; an empty value clears the tag filter.
    pub fn set_tag(&mut self, tag: &str) {
        self.tag = if tag.is_empty() {
            None
        } else {
            Some(tag.to_string())
        };
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.tag.is_none()
    }

    /// Returns whether `record` is visible under this filter.
    pub fn matches(&self, record: &KnowledgeRecord) -> bool {
        let title_ok = self.search.is_empty() || record.title.contains(self.search.as_str());
        let tag_ok = self.tag.as_deref().map_or(true, |tag| record.has_tag(tag));
        title_ok && tag_ok
    }

    /// Visible records in their original order.
    pub fn apply<'a>(&self, records: &'a [KnowledgeRecord]) -> Vec<&'a KnowledgeRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}
