//! Static site generation.
//!
//! Loads everything under the content root, renders every entry of every
//! collection and writes the result to the output directory.
//!
//! ## Inputs
//!
//! ```text
//! content/
//! ├── config.toml          # Build config (optional)
//! ├── config.json          # Site title, menu, edit link base (required)
//! ├── sponsors.json        # Optional
//! ├── releases.json        # Optional
//! ├── assets/              # Copied verbatim to the output root
//! └── docs/
//!     ├── db.json          # Collection entries, in navigation order
//!     └── *.md
//! ```
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                   # permalink "/"
//! ├── docs/introduction/index.html # permalink "/docs/introduction"
//! ├── docs/routing/index.html
//! └── favicon.svg                  # from content/assets/
//! ```
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time and prefixed with the
//! color and layout custom properties from `config.toml`. The result is
//! inlined into every page.
//!
//! Pages are rendered in parallel with [rayon](https://docs.rs/rayon); the
//! renderer and collections are shared read-only across workers.

use crate::collection::{Collection, CollectionError, CollectionProvider, output_path};
use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{self, ContentBundle, ContentError};
use crate::pagination::derive_pagination;
use crate::render::{RenderContext, RenderError, Renderer, default_renderer};
use crate::sections::derive_sections;
use crate::templates::CSS_STATIC;
use crate::types::{Entry, PaginationLinks, Section};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Missing content for {permalink} in collection {collection}: {path}")]
    MissingContent {
        collection: String,
        permalink: String,
        path: PathBuf,
    },
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
    #[error("No entry with permalink {0}")]
    EntryNotFound(String),
    #[error("Permalink {permalink} is used by both {first} and {second}")]
    OutputConflict {
        permalink: String,
        first: String,
        second: String,
    },
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Asset copy error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Everything loaded from a content root.
#[derive(Debug)]
pub struct Site {
    pub root: PathBuf,
    pub config: SiteConfig,
    pub content: ContentBundle,
    pub collections: Vec<Collection>,
}

impl Site {
    pub fn collection(&self, name: &str) -> Result<&Collection, GenerateError> {
        self.collections
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| GenerateError::UnknownCollection(name.to_string()))
    }

    /// The full stylesheet: config-driven custom properties, then the base styles.
    pub fn css(&self) -> String {
        let color_css = config::generate_color_css(&self.config.colors);
        let layout_css = config::generate_layout_css(&self.config.layout);
        format!("{}\n\n{}\n\n{}", color_css, layout_css, CSS_STATIC)
    }

    /// Entry's markdown path relative to the content root, `/`-separated.
    fn edit_path(&self, collection: &Collection, entry: &Entry) -> Option<String> {
        let path = collection.content_path(entry)?;
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Some(parts.join("/"))
    }
}

/// Load config, content data and every configured collection.
pub fn load_site(root: &Path) -> Result<Site, GenerateError> {
    let config = config::load_config(root)?;
    let content = content::load_content(root)?;
    let collections = config
        .collections
        .iter()
        .map(|c| Collection::load(&c.name, &root.join(&c.db)))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(
        root = %root.display(),
        collections = collections.len(),
        "Loaded site"
    );
    Ok(Site {
        root: root.to_path_buf(),
        config,
        content,
        collections,
    })
}

// ============================================================================
// Build
// ============================================================================

/// One written page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub collection: String,
    pub permalink: String,
    pub title: String,
    /// Output file, relative to the output directory.
    pub path: PathBuf,
    pub draft: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub pages: Vec<GeneratedPage>,
    /// Number of files copied from `assets/`.
    pub assets: usize,
}

impl BuildReport {
    pub fn drafts(&self) -> usize {
        self.pages.iter().filter(|p| p.draft).count()
    }
}

/// Load the site at `source` and build it into `output`.
pub fn build(source: &Path, output: &Path) -> Result<BuildReport, GenerateError> {
    let site = load_site(source)?;
    build_site(&site, output, Utc::now())
}

/// Build an already loaded site. `now` anchors relative release dates.
pub fn build_site(site: &Site, output: &Path, now: DateTime<Utc>) -> Result<BuildReport, GenerateError> {
    check_output_conflicts(&site.collections)?;

    let renderer = default_renderer(&site.config.rendering);
    let css = site.css();
    fs::create_dir_all(output)?;

    let threads = config::effective_threads(&site.config.processing);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    tracing::debug!(threads, "Rendering pages");

    let mut pages = Vec::new();
    for collection in &site.collections {
        let rendered = pool.install(|| {
            collection
                .all()
                .par_iter()
                .map(|entry| render_page(site, collection, entry, &renderer, &css, output, now))
                .collect::<Result<Vec<_>, _>>()
        })?;
        tracing::info!(
            collection = collection.name(),
            pages = rendered.len(),
            "Rendered collection"
        );
        pages.extend(rendered);
    }

    let assets = copy_assets(&site.root.join("assets"), output)?;
    tracing::info!(pages = pages.len(), assets, output = %output.display(), "Build complete");

    Ok(BuildReport { pages, assets })
}

fn render_page(
    site: &Site,
    collection: &Collection,
    entry: &Entry,
    renderer: &Renderer,
    css: &str,
    output: &Path,
    now: DateTime<Utc>,
) -> Result<GeneratedPage, GenerateError> {
    let source = read_entry_source(collection, entry)?;
    let edit_path = site.edit_path(collection, entry);
    let ctx = RenderContext {
        collection,
        entry,
        content: &site.content,
        source: &source,
        edit_path: edit_path.as_deref(),
        css,
        now,
    };
    let html = renderer.render_entry(&ctx)?;

    let relative = output_path(&entry.permalink);
    let target = output.join(&relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, html.into_string())?;
    tracing::debug!(permalink = %entry.permalink, path = %relative.display(), "Wrote page");

    Ok(GeneratedPage {
        collection: collection.name().to_string(),
        permalink: entry.permalink.clone(),
        title: entry.title.clone(),
        path: relative,
        draft: entry.meta.draft,
    })
}

/// Markdown for an entry. Entries without a content path render empty.
fn read_entry_source(collection: &Collection, entry: &Entry) -> Result<String, GenerateError> {
    let Some(path) = collection.content_path(entry) else {
        tracing::warn!(permalink = %entry.permalink, "Entry has no contentPath, rendering empty page");
        return Ok(String::new());
    };
    match fs::read_to_string(&path) {
        Ok(source) => Ok(source),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(GenerateError::MissingContent {
            collection: collection.name().to_string(),
            permalink: entry.permalink.clone(),
            path,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Two collections must not write the same output file.
fn check_output_conflicts(collections: &[Collection]) -> Result<(), GenerateError> {
    let mut owners: HashMap<PathBuf, &str> = HashMap::new();
    for collection in collections {
        for entry in collection.all() {
            if let Some(first) = owners.insert(output_path(&entry.permalink), collection.name()) {
                return Err(GenerateError::OutputConflict {
                    permalink: entry.permalink.clone(),
                    first: first.to_string(),
                    second: collection.name().to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Copy `assets/` into the output root. Returns the number of files copied.
fn copy_assets(assets: &Path, output: &Path) -> Result<usize, GenerateError> {
    if !assets.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(assets) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(assets) else {
            continue;
        };
        let target = output.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Check
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub name: String,
    pub entries: usize,
    pub drafts: usize,
    /// Sidebar section titles in order.
    pub sections: Vec<Option<String>>,
}

/// An entry whose markdown file could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEntry {
    pub collection: String,
    pub permalink: String,
    pub path: PathBuf,
}

/// An entry with no `contentPath`. It builds as an empty page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyEntry {
    pub collection: String,
    pub permalink: String,
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub collections: Vec<CollectionSummary>,
    pub missing: Vec<MissingEntry>,
    /// Reported, but not a failure: `build` renders these empty too.
    pub empty: Vec<EmptyEntry>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Validate a content root without writing anything.
///
/// Config, content data and collection errors are returned as `Err`; missing
/// markdown files are collected into the report.
pub fn check(source: &Path) -> Result<CheckReport, GenerateError> {
    let site = load_site(source)?;
    check_output_conflicts(&site.collections)?;
    Ok(check_site(&site))
}

pub fn check_site(site: &Site) -> CheckReport {
    let mut report = CheckReport::default();
    for collection in &site.collections {
        let entries = collection.all();
        let sections = match entries.first() {
            Some(first) => derive_sections(collection, first)
                .into_iter()
                .map(|s| s.title)
                .collect(),
            None => Vec::new(),
        };
        report.collections.push(CollectionSummary {
            name: collection.name().to_string(),
            entries: entries.len(),
            drafts: entries.iter().filter(|e| e.meta.draft).count(),
            sections,
        });
        for entry in entries {
            match collection.content_path(entry) {
                None => report.empty.push(EmptyEntry {
                    collection: collection.name().to_string(),
                    permalink: entry.permalink.clone(),
                }),
                Some(path) if !path.is_file() => report.missing.push(MissingEntry {
                    collection: collection.name().to_string(),
                    permalink: entry.permalink.clone(),
                    path,
                }),
                Some(_) => {}
            }
        }
    }
    report
}

// ============================================================================
// Inspect
// ============================================================================

/// Derived navigation for one entry, as handed to templates.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub collection: String,
    pub entry: Entry,
    pub sections: Vec<Section>,
    pub pagination: PaginationLinks,
}

/// Derive sections and pagination for a permalink.
///
/// Without a collection name, the first collection containing the permalink wins.
pub fn inspect(
    site: &Site,
    permalink: &str,
    collection: Option<&str>,
) -> Result<Inspection, GenerateError> {
    let candidates: Vec<&Collection> = match collection {
        Some(name) => vec![site.collection(name)?],
        None => site.collections.iter().collect(),
    };
    let (collection, entry) = candidates
        .into_iter()
        .find_map(|c| c.find_by_permalink(permalink).map(|e| (c, e)))
        .ok_or_else(|| GenerateError::EntryNotFound(permalink.to_string()))?;

    Ok(Inspection {
        collection: collection.name().to_string(),
        entry: entry.clone(),
        sections: derive_sections(collection, entry),
        pagination: derive_pagination(collection, entry),
    })
}
