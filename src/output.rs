//! CLI output formatting for `build` and `check`.
//!
//! Output is information-first: each page leads with its position in the
//! collection and its title, with file paths shown as secondary context.
//!
//! ## Build
//!
//! ```text
//! docs (5 pages, 1 draft)
//!     001 Introduction → docs/introduction/index.html
//!     002 Installation → docs/installation/index.html
//!     004 Middleware (draft) → docs/middleware/index.html
//!
//! Generated 5 pages in 1 collection, copied 1 asset
//! ```
//!
//! ## Check
//!
//! ```text
//! docs (5 entries, 1 draft)
//!     Sections: Getting Started, Basics, (uncategorized)
//!
//! Missing content
//!     docs /docs/routing
//!         Source: docs/routing.md
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::generate::{BuildReport, CheckReport, MissingEntry};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// `"docs (5 pages, 1 draft)"`
fn collection_header(name: &str, count: usize, noun: (&str, &str), drafts: usize) -> String {
    let count = plural(count, noun.0, noun.1);
    if drafts > 0 {
        format!("{name} ({count}, {})", plural(drafts, "draft", "drafts"))
    } else {
        format!("{name} ({count})")
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut collections: Vec<&str> = Vec::new();
    for page in &report.pages {
        if !collections.contains(&page.collection.as_str()) {
            collections.push(&page.collection);
        }
    }

    for name in &collections {
        let pages: Vec<_> = report.pages.iter().filter(|p| p.collection == *name).collect();
        let drafts = pages.iter().filter(|p| p.draft).count();
        lines.push(collection_header(name, pages.len(), ("page", "pages"), drafts));
        for (i, page) in pages.iter().enumerate() {
            let draft = if page.draft { " (draft)" } else { "" };
            lines.push(format!(
                "{}{} {}{} → {}",
                indent(1),
                format_index(i + 1),
                page.title,
                draft,
                page.path.display()
            ));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Generated {} in {}, copied {}",
        plural(report.pages.len(), "page", "pages"),
        plural(collections.len(), "collection", "collections"),
        plural(report.assets, "asset", "assets"),
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

fn section_label(title: &Option<String>) -> &str {
    title.as_deref().unwrap_or("(uncategorized)")
}

fn missing_lines(missing: &MissingEntry, source_root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "{}{} {}",
        indent(1),
        missing.collection,
        missing.permalink
    )];
    let source = missing
        .path
        .strip_prefix(source_root)
        .unwrap_or(&missing.path)
        .display();
    lines.push(format!("{}Source: {}", indent(2), source));
    lines
}

pub fn format_check_output(report: &CheckReport, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for summary in &report.collections {
        lines.push(collection_header(
            &summary.name,
            summary.entries,
            ("entry", "entries"),
            summary.drafts,
        ));
        if !summary.sections.is_empty() {
            let labels: Vec<&str> = summary.sections.iter().map(section_label).collect();
            lines.push(format!("{}Sections: {}", indent(1), labels.join(", ")));
        }
    }

    if !report.empty.is_empty() {
        lines.push(String::new());
        lines.push("No contentPath (built as empty pages)".to_string());
        for empty in &report.empty {
            lines.push(format!("{}{} {}", indent(1), empty.collection, empty.permalink));
        }
    }

    if !report.missing.is_empty() {
        lines.push(String::new());
        lines.push("Missing content".to_string());
        for missing in &report.missing {
            lines.extend(missing_lines(missing, source_root));
        }
    }
    lines
}

pub fn print_check_output(report: &CheckReport, source_root: &Path) {
    for line in format_check_output(report, source_root) {
        println!("{}", line);
    }
}
