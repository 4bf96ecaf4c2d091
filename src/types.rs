//! Shared types for collection entries and the structures derived from them.
//!
//! `Entry` is what a collection's `db.json` holds. `Section` and
//! `PaginationLinks` are recomputed per page and handed to templates; they
//! serialize with camelCase keys so `inspect` output matches what a theme
//! author would expect from the JSON side.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One documentation page's metadata record.
///
/// On disk the metadata is flat:
///
/// ```json
/// { "permalink": "/docs/routing", "title": "Routing",
///   "contentPath": "./routing.md", "category": "Basics" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique URL path of the page within its collection.
    pub permalink: String,
    pub title: String,
    /// Markdown source, relative to the collection's `db.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_path: Option<PathBuf>,
    #[serde(flatten)]
    pub meta: EntryMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Sidebar grouping key. Entries without one share a single group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Drafts are rendered but never listed in the sidebar.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
}

impl Entry {
    pub fn category(&self) -> Option<&str> {
        self.meta.category.as_deref()
    }
}

/// Sidebar group of entries sharing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// The category key; `None` for the group of uncategorized entries.
    pub title: Option<String>,
    pub is_active: bool,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionItem {
    pub href: String,
    pub title: String,
    pub is_active: bool,
}

/// Previous/next neighbours of a page in collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationLinks {
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub category: Option<String>,
    pub title: String,
    pub url: String,
}

impl From<&Entry> for PageLink {
    fn from(entry: &Entry) -> Self {
        Self {
            category: entry.meta.category.clone(),
            title: entry.title.clone(),
            url: entry.permalink.clone(),
        }
    }
}
