//! Page rendering: markdown through the pipeline, then into a template.
//!
//! A [`Renderer`] is built once at startup and shared read-only by every
//! page render. Per-page inputs travel in a [`RenderContext`]; sections and
//! pagination are derived from the context's collection at render time and
//! handed to the template as plain values.

use crate::collection::CollectionProvider;
use crate::config::RenderingConfig;
use crate::content::{ContentBundle, relative_time};
use crate::markdown::{self, RenderedDocument};
use crate::pagination::derive_pagination;
use crate::pipeline::RenderingPipeline;
use crate::sections::derive_sections;
use crate::templates::{self, ComponentFn, ComponentRegistry, PageView};
use crate::theme::{CodeTheme, TemplateName};
use crate::types::Entry;
use chrono::{DateTime, Utc};
use maud::Markup;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No component registered under {0:?}")]
    UnknownComponent(String),
}

/// Per-page render inputs.
pub struct RenderContext<'a> {
    pub collection: &'a dyn CollectionProvider,
    pub entry: &'a Entry,
    pub content: &'a ContentBundle,
    /// Markdown source of the entry.
    pub source: &'a str,
    /// Path appended to `fileEditBaseUrl` for the edit link.
    pub edit_path: Option<&'a str>,
    pub css: &'a str,
    /// Reference time for "released 3 days ago".
    pub now: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Renderer {
    pipeline: RenderingPipeline,
    components: ComponentRegistry,
    code_theme: CodeTheme,
    template: TemplateName,
}

impl Renderer {
    pub fn new(pipeline: RenderingPipeline) -> Self {
        Self {
            pipeline,
            components: ComponentRegistry::with_defaults(),
            code_theme: CodeTheme::default(),
            template: TemplateName::default(),
        }
    }

    pub fn code_blocks_theme(mut self, theme: CodeTheme) -> Self {
        self.code_theme = theme;
        self
    }

    pub fn use_template(mut self, template: TemplateName) -> Self {
        self.template = template;
        self
    }

    pub fn register_component(mut self, name: impl Into<String>, render: ComponentFn) -> Self {
        self.components = self.components.register(name, render);
        self
    }

    pub fn pipeline(&self) -> &RenderingPipeline {
        &self.pipeline
    }

    pub fn code_theme(&self) -> CodeTheme {
        self.code_theme
    }

    pub fn template(&self) -> TemplateName {
        self.template
    }

    pub fn render_markdown(&self, source: &str) -> Result<RenderedDocument, RenderError> {
        markdown::render_markdown(source, &self.pipeline, &self.components, self.code_theme)
    }

    /// Render one entry to a complete HTML page.
    pub fn render_entry(&self, ctx: &RenderContext<'_>) -> Result<Markup, RenderError> {
        let document = self.render_markdown(ctx.source)?;
        let sections = derive_sections(ctx.collection, ctx.entry);
        let pagination = derive_pagination(ctx.collection, ctx.entry);
        let latest_release = ctx
            .content
            .latest_release()
            .map(|release| (release, relative_time(release.published_at, ctx.now)));
        let edit_url = ctx
            .edit_path
            .and_then(|path| ctx.content.config.edit_url(path));

        let view = PageView {
            title: document.title.as_deref().unwrap_or(&ctx.entry.title),
            entry: ctx.entry,
            document: &document,
            sections: &sections,
            pagination: &pagination,
            site: &ctx.content.config,
            sponsors: &ctx.content.sponsors,
            latest_release,
            edit_url,
            css: ctx.css,
        };
        Ok(templates::render_template(self.template, &view))
    }
}

/// The stock documentation renderer for a `[rendering]` config section.
pub fn default_renderer(config: &RenderingConfig) -> Renderer {
    tracing::debug!(
        code_theme = %config.code_theme,
        template = config.template.as_str(),
        "Configured renderer"
    );
    Renderer::new(RenderingPipeline::docs())
        .code_blocks_theme(config.code_theme)
        .use_template(config.template)
}
