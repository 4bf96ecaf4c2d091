//! Shared test utilities for the simple-docs test suite.
//!
//! Entry builders for navigation tests and a fixture copier for tests that
//! need a real content directory.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let entries = vec![entry("/a", "A", Some("Basics")), draft("/b", "B", None)];
//! let sections = derive_sections(&entries, &entries[0]);
//! assert_eq!(section_titles(&sections), vec![Some("Basics"), None]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Entry, EntryMeta, Section};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Entry builders
// =========================================================================

/// A published entry without a content file.
pub fn entry(permalink: &str, title: &str, category: Option<&str>) -> Entry {
    Entry {
        permalink: permalink.to_string(),
        title: title.to_string(),
        content_path: None,
        meta: EntryMeta {
            category: category.map(str::to_string),
            draft: false,
        },
    }
}

pub fn draft(permalink: &str, title: &str, category: Option<&str>) -> Entry {
    let mut e = entry(permalink, title, category);
    e.meta.draft = true;
    e
}

// =========================================================================
// Section helpers
// =========================================================================

/// Section titles in order.
pub fn section_titles(sections: &[Section]) -> Vec<Option<&str>> {
    sections.iter().map(|s| s.title.as_deref()).collect()
}
