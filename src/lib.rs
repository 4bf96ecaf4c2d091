//! # Simple Docs
//!
//! A minimal static site generator for documentation sites. Each collection
//! is an ordered `db.json` of entries; every entry becomes a page with a
//! sidebar grouped by category and previous/next links.
//!
//! # Architecture
//!
//! ```text
//! content/  ──load──▶  Site { config, content, collections }
//!                         │
//!                         ▼   per entry, in parallel
//!            markdown ─▶ pipeline hooks ─▶ HTML body
//!            collection + entry ─▶ sections, pagination
//!                         │
//!                         ▼
//!                 template (docs | page) ─▶ dist/<permalink>/index.html
//! ```
//!
//! Navigation is derived, never stored: [`sections::derive_sections`] and
//! [`pagination::derive_pagination`] are pure functions of a collection and
//! the current entry, recomputed for every page. They depend only on the
//! [`collection::CollectionProvider`] trait, so they work the same over a
//! loaded [`collection::Collection`] or a plain slice of entries.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Entry`, `Section`, `PaginationLinks` and friends |
//! | [`collection`] | `db.json` loading, permalink validation, the `CollectionProvider` trait |
//! | [`sections`] | Sidebar sections grouped by category |
//! | [`pagination`] | Previous/next links in collection order |
//! | [`pipeline`] | Ordered hooks over parsed markdown nodes |
//! | [`markdown`] | Markdown to HTML through the pipeline, title and table of contents |
//! | [`templates`] | Maud page templates and named components |
//! | [`render`] | `Renderer`: pipeline, code theme and template selection |
//! | [`theme`] | Code theme and template name enums |
//! | [`content`] | `config.json`, `sponsors.json`, `releases.json`, relative dates |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`generate`] | Site loading, parallel build, `check` and `inspect` |
//! | [`output`] | CLI output formatting |
//! | [`slug`] | Heading anchor slugs |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! Templates are [Maud](https://maud.lambda.xyz/) macros. Sections, pagination
//! and site data are handed to them as plain Rust values, so a template can
//! only use what the renderer passed in; there is no global helper namespace.
//!
//! ## One Pipeline, Built Once
//!
//! The [`pipeline::RenderingPipeline`] is assembled at startup and shared
//! read-only by every render worker. Hooks see typed nodes (images, headings,
//! code blocks) and may swap a node for a named component, which ends the
//! hook chain for that node.

pub mod collection;
pub mod config;
pub mod content;
pub mod generate;
pub mod markdown;
pub mod output;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod sections;
pub mod slug;
pub mod templates;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
