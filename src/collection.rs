//! Documentation collections.
//!
//! A collection is the ordered list of entries for one documentation site or
//! version, loaded from a `db.json` file:
//!
//! ```text
//! content/
//! └── docs/
//!     ├── db.json            # [{ permalink, title, contentPath, category, draft }, ...]
//!     ├── introduction.md
//!     └── routing.md
//! ```
//!
//! Order in `db.json` is significant: it drives sidebar item order and
//! previous/next pagination. Permalinks must be unique within a collection.

use crate::types::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Invalid collection db {0}: {1}")]
    Json(PathBuf, #[source] serde_json::Error),
    #[error("Duplicate permalink {permalink} in collection {collection}")]
    DuplicatePermalink {
        collection: String,
        permalink: String,
    },
    #[error("Invalid permalink {0:?}: must be non-empty and must not contain '..'")]
    InvalidPermalink(String),
}

/// Read access to an ordered set of entries.
///
/// Navigation and pagination only depend on this capability, not on how the
/// entries were loaded.
pub trait CollectionProvider {
    /// All entries in collection order.
    fn all(&self) -> &[Entry];

    fn find_by_permalink(&self, permalink: &str) -> Option<&Entry> {
        self.all().iter().find(|e| e.permalink == permalink)
    }
}

impl CollectionProvider for [Entry] {
    fn all(&self) -> &[Entry] {
        self
    }
}

impl CollectionProvider for Vec<Entry> {
    fn all(&self) -> &[Entry] {
        self
    }
}

/// A named, validated collection.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    /// Directory that `content_path` values are relative to.
    base_dir: PathBuf,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Collection {
    /// Build a collection from entries, rejecting duplicate or unsafe permalinks.
    pub fn new(
        name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        entries: Vec<Entry>,
    ) -> Result<Self, CollectionError> {
        let name = name.into();
        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            validate_permalink(&entry.permalink)?;
            if index.insert(entry.permalink.clone(), pos).is_some() {
                return Err(CollectionError::DuplicatePermalink {
                    collection: name,
                    permalink: entry.permalink.clone(),
                });
            }
        }
        Ok(Self {
            name,
            base_dir: base_dir.into(),
            entries,
            index,
        })
    }

    /// Load a collection from its `db.json` file.
    pub fn load(name: impl Into<String>, db_path: &Path) -> Result<Self, CollectionError> {
        let content = fs::read_to_string(db_path)
            .map_err(|e| CollectionError::Io(db_path.to_path_buf(), e))?;
        let entries: Vec<Entry> = serde_json::from_str(&content)
            .map_err(|e| CollectionError::Json(db_path.to_path_buf(), e))?;
        let base_dir = db_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let collection = Self::new(name, base_dir, entries)?;
        tracing::debug!(
            collection = %collection.name,
            entries = collection.entries.len(),
            "Loaded collection"
        );
        Ok(collection)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absolute location of an entry's markdown source, if it declares one.
    pub fn content_path(&self, entry: &Entry) -> Option<PathBuf> {
        entry.content_path.as_ref().map(|p| self.base_dir.join(p))
    }
}

impl CollectionProvider for Collection {
    fn all(&self) -> &[Entry] {
        &self.entries
    }

    fn find_by_permalink(&self, permalink: &str) -> Option<&Entry> {
        self.index.get(permalink).map(|&pos| &self.entries[pos])
    }
}

fn validate_permalink(permalink: &str) -> Result<(), CollectionError> {
    let invalid = (permalink.trim_matches('/').is_empty() && permalink != "/")
        || permalink.split('/').any(|segment| segment == "..");
    if invalid {
        return Err(CollectionError::InvalidPermalink(permalink.to_string()));
    }
    Ok(())
}

/// Output path for a permalink, relative to the site root.
///
/// `/docs/routing` → `docs/routing/index.html`, `/` → `index.html`.
pub fn output_path(permalink: &str) -> PathBuf {
    let trimmed = permalink.trim_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("index.html")
    } else {
        Path::new(trimmed).join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::entry;
    use tempfile::TempDir;

    #[test]
    fn new_preserves_order() {
        let c = Collection::new(
            "docs",
            "",
            vec![entry("/b", "B", Some("x")), entry("/a", "A", Some("x"))],
        )
        .unwrap();
        let permalinks: Vec<&str> = c.all().iter().map(|e| e.permalink.as_str()).collect();
        assert_eq!(permalinks, vec!["/b", "/a"]);
    }

    #[test]
    fn duplicate_permalink_is_error() {
        let result = Collection::new(
            "docs",
            "",
            vec![entry("/a", "A", None), entry("/a", "Again", None)],
        );
        assert!(matches!(
            result,
            Err(CollectionError::DuplicatePermalink { ref permalink, .. }) if permalink == "/a"
        ));
    }

    #[test]
    fn traversal_permalink_is_error() {
        let result = Collection::new("docs", "", vec![entry("/docs/../../etc", "X", None)]);
        assert!(matches!(result, Err(CollectionError::InvalidPermalink(_))));
    }

    #[test]
    fn empty_permalink_is_error() {
        let result = Collection::new("docs", "", vec![entry("", "X", None)]);
        assert!(matches!(result, Err(CollectionError::InvalidPermalink(_))));
    }

    #[test]
    fn root_permalink_is_allowed() {
        assert!(Collection::new("docs", "", vec![entry("/", "Home", None)]).is_ok());
    }

    #[test]
    fn find_by_permalink_uses_index() {
        let c = Collection::new(
            "docs",
            "",
            vec![entry("/a", "A", None), entry("/b", "B", None)],
        )
        .unwrap();
        assert_eq!(c.find_by_permalink("/b").unwrap().title, "B");
        assert!(c.find_by_permalink("/missing").is_none());
    }

    #[test]
    fn slice_provider_finds_linearly() {
        let entries = vec![entry("/a", "A", None)];
        assert_eq!(entries.find_by_permalink("/a").unwrap().title, "A");
        assert!(entries.as_slice().find_by_permalink("/z").is_none());
    }

    #[test]
    fn load_reads_db_json() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("db.json");
        fs::write(
            &db,
            r#"[
                {"permalink": "/docs/intro", "title": "Intro", "contentPath": "intro.md", "category": "Basics"},
                {"permalink": "/docs/wip", "title": "WIP", "category": "Basics", "draft": true}
            ]"#,
        )
        .unwrap();

        let c = Collection::load("docs", &db).unwrap();
        assert_eq!(c.name(), "docs");
        assert_eq!(c.len(), 2);
        let intro = c.find_by_permalink("/docs/intro").unwrap();
        assert_eq!(c.content_path(intro), Some(tmp.path().join("intro.md")));
        let wip = c.find_by_permalink("/docs/wip").unwrap();
        assert!(wip.meta.draft);
        assert_eq!(c.content_path(wip), None);
    }

    #[test]
    fn load_missing_db_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = Collection::load("docs", &tmp.path().join("db.json"));
        assert!(matches!(result, Err(CollectionError::Io(..))));
    }

    #[test]
    fn load_malformed_db_is_json_error() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("db.json");
        fs::write(&db, r#"[{"title": "no permalink"}]"#).unwrap();
        assert!(matches!(
            Collection::load("docs", &db),
            Err(CollectionError::Json(..))
        ));
    }

    #[test]
    fn output_path_for_permalinks() {
        assert_eq!(
            output_path("/docs/routing"),
            PathBuf::from("docs/routing/index.html")
        );
        assert_eq!(output_path("guides/"), PathBuf::from("guides/index.html"));
        assert_eq!(output_path("/"), PathBuf::from("index.html"));
    }
}
