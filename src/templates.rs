//! HTML templates and components.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! every interpolated value is escaped and template variables are plain Rust
//! values handed in through [`PageView`]; nothing is looked up from a global
//! helper namespace.
//!
//! ## Templates
//!
//! - **docs**: header, sidebar sections, article, table of contents, edit
//!   link, previous/next pagination, footer
//! - **page**: header, article, footer
//!
//! ## Components
//!
//! Pipeline hooks may replace a node with a named component. Components are
//! registered in a [`ComponentRegistry`]; the stock registry knows
//! `elements/img`.

use crate::content::{ContentConfig, Release, Sponsor};
use crate::markdown::{RenderedDocument, TocEntry};
use crate::pipeline::{Component, IMAGE_COMPONENT, Node, heading_tag};
use crate::render::RenderError;
use crate::theme::{CodeTheme, TemplateName};
use crate::types::{Entry, PageLink, PaginationLinks, Section};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{HeadingLevel, html as md_html};
use std::collections::HashMap;

pub const CSS_STATIC: &str = include_str!("../static/style.css");

/// Everything a page template needs, passed in explicitly.
#[derive(Debug)]
pub struct PageView<'a> {
    pub title: &'a str,
    pub entry: &'a Entry,
    pub document: &'a RenderedDocument,
    pub sections: &'a [Section],
    pub pagination: &'a PaginationLinks,
    pub site: &'a ContentConfig,
    pub sponsors: &'a [Sponsor],
    /// Most recent release with its relative publish time ("3 days ago").
    pub latest_release: Option<(&'a Release, String)>,
    pub edit_url: Option<String>,
    pub css: &'a str,
}

pub fn render_template(template: TemplateName, view: &PageView<'_>) -> Markup {
    match template {
        TemplateName::Docs => docs_page(view),
        TemplateName::Page => plain_page(view),
    }
}

// ============================================================================
// Document nodes
// ============================================================================

/// Default markup for a lifted node.
pub fn node_markup(node: &Node<'_>, theme: CodeTheme) -> Markup {
    match node {
        Node::Image(img) => html! {
            img src=(img.src) alt=(img.alt) title=[img.title.as_deref()];
        },
        Node::Heading(heading) => {
            let mut inner = String::new();
            for child in &heading.children {
                match child {
                    Node::Event(event) => md_html::push_html(&mut inner, std::iter::once(event.clone())),
                    other => inner.push_str(&node_markup(other, theme).into_string()),
                }
            }
            let classes = (!heading.classes.is_empty()).then(|| heading.classes.join(" "));
            let id = heading.id.as_deref();
            let inner = PreEscaped(inner);
            match heading.level {
                HeadingLevel::H1 => html! { h1 id=[id] class=[classes] { (inner) } },
                HeadingLevel::H2 => html! { h2 id=[id] class=[classes] { (inner) } },
                HeadingLevel::H3 => html! { h3 id=[id] class=[classes] { (inner) } },
                HeadingLevel::H4 => html! { h4 id=[id] class=[classes] { (inner) } },
                HeadingLevel::H5 => html! { h5 id=[id] class=[classes] { (inner) } },
                HeadingLevel::H6 => html! { h6 id=[id] class=[classes] { (inner) } },
            }
        }
        Node::CodeBlock(block) => {
            let lang_class = block.lang.as_ref().map(|l| format!("language-{l}"));
            html! {
                pre.code-block data-theme=(theme.as_str()) data-lang=[block.lang.as_deref()] {
                    code class=[lang_class] { (block.code) }
                }
            }
        }
        Node::Event(event) => {
            let mut out = String::new();
            md_html::push_html(&mut out, std::iter::once(event.clone()));
            PreEscaped(out)
        }
    }
}

// ============================================================================
// Components
// ============================================================================

pub type ComponentFn = fn(&Component<'_>, CodeTheme) -> Markup;

/// Named components available to pipeline hooks.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, ComponentFn>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in components.
    pub fn with_defaults() -> Self {
        Self::new().register(IMAGE_COMPONENT, image_component)
    }

    pub fn register(mut self, name: impl Into<String>, render: ComponentFn) -> Self {
        self.components.insert(name.into(), render);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn render(&self, component: &Component<'_>, theme: CodeTheme) -> Result<Markup, RenderError> {
        let render = self
            .components
            .get(&component.name)
            .ok_or_else(|| RenderError::UnknownComponent(component.name.clone()))?;
        Ok(render(component, theme))
    }
}

/// Themed image: framed, lazy-loaded, with the title as caption.
fn image_component(component: &Component<'_>, theme: CodeTheme) -> Markup {
    let Node::Image(img) = &component.node else {
        return node_markup(&component.node, theme);
    };
    html! {
        span.img-frame {
            img src=(img.src) alt=(img.alt) title=[img.title.as_deref()] loading="lazy";
            @if let Some(caption) = &img.title {
                span.img-caption { (caption) }
            }
        }
    }
}

// ============================================================================
// Page components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Site title and top menu.
fn site_header(site: &ContentConfig) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (site.title) }
            @if !site.menu.is_empty() {
                nav.site-menu {
                    ul {
                        @for link in &site.menu {
                            li { a href=(link.href) { (link.title) } }
                        }
                    }
                }
            }
        }
    }
}

/// Sidebar built from derived sections. Sections without visible items are skipped.
pub fn render_sidebar(sections: &[Section]) -> Markup {
    html! {
        nav.sidebar aria-label="Documentation" {
            @for section in sections.iter().filter(|s| !s.items.is_empty()) {
                div class=(if section.is_active { "sidebar-section active" } else { "sidebar-section" }) {
                    @if let Some(title) = &section.title {
                        h4.sidebar-title { (title) }
                    }
                    ul {
                        @for item in &section.items {
                            li class=[item.is_active.then_some("current")] {
                                a href=(item.href)
                                    aria-current=[item.is_active.then_some("page")] { (item.title) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn pagination_link(link: &PageLink, class: &str, label: &str) -> Markup {
    html! {
        a class=(class) href=(link.url) {
            span.pagination-label {
                (label)
                @if let Some(category) = &link.category {
                    " · " (category)
                }
            }
            span.pagination-title { (link.title) }
        }
    }
}

/// Previous/next links under the article.
pub fn render_pagination(links: &PaginationLinks) -> Markup {
    html! {
        @if links.previous.is_some() || links.next.is_some() {
            nav.pagination {
                @if let Some(previous) = &links.previous {
                    (pagination_link(previous, "pagination-previous", "Previous"))
                }
                @if let Some(next) = &links.next {
                    (pagination_link(next, "pagination-next", "Next"))
                }
            }
        }
    }
}

fn table_of_contents(toc: &[TocEntry]) -> Markup {
    html! {
        @if !toc.is_empty() {
            aside.toc {
                h4 { "On this page" }
                ul {
                    @for item in toc {
                        li class={ "toc-" (heading_tag(level_of(item))) } {
                            a href={ "#" (item.id) } { (item.title) }
                        }
                    }
                }
            }
        }
    }
}

fn level_of(item: &TocEntry) -> HeadingLevel {
    match item.level {
        2 => HeadingLevel::H2,
        _ => HeadingLevel::H3,
    }
}

fn site_footer(
    site: &ContentConfig,
    sponsors: &[Sponsor],
    latest_release: Option<&(&Release, String)>,
) -> Markup {
    html! {
        footer.site-footer {
            @if let Some((release, when)) = latest_release {
                p.latest-release {
                    "Latest release: "
                    @if let Some(url) = &release.url {
                        a href=(url) { (release.name) }
                    } @else {
                        (release.name)
                    }
                    " (" (when) ")"
                }
            }
            @if !sponsors.is_empty() {
                div.sponsors {
                    h4 { "Sponsors" }
                    ul {
                        @for sponsor in sponsors {
                            li {
                                a href=[sponsor.link()] title=(sponsor.display_name()) {
                                    @if let Some(avatar) = &sponsor.avatar_url {
                                        img src=(avatar) alt=(sponsor.display_name()) loading="lazy";
                                    } @else {
                                        (sponsor.display_name())
                                    }
                                }
                            }
                        }
                    }
                }
            }
            @if let Some(copyright) = &site.copyright {
                p.copyright { (copyright) }
            }
        }
    }
}

fn article(view: &PageView<'_>) -> Markup {
    html! {
        article.doc-content data-permalink=(view.entry.permalink) {
            (PreEscaped(&view.document.html))
        }
    }
}

// ============================================================================
// Page templates
// ============================================================================

fn docs_page(view: &PageView<'_>) -> Markup {
    let content = html! {
        (site_header(view.site))
        div.docs-layout {
            (render_sidebar(view.sections))
            main.docs-main {
                (article(view))
                @if let Some(edit_url) = &view.edit_url {
                    p.edit-link { a href=(edit_url) target="_blank" rel="noopener" { "Edit this page" } }
                }
                (render_pagination(view.pagination))
            }
            (table_of_contents(&view.document.toc))
        }
        (site_footer(view.site, view.sponsors, view.latest_release.as_ref()))
    };
    base_document(&page_title(view), view.css, Some("docs"), content)
}

fn plain_page(view: &PageView<'_>) -> Markup {
    let content = html! {
        (site_header(view.site))
        main.page-main {
            (article(view))
        }
        (site_footer(view.site, view.sponsors, view.latest_release.as_ref()))
    };
    base_document(&page_title(view), view.css, None, content)
}

fn page_title(view: &PageView<'_>) -> String {
    if view.site.title.is_empty() {
        view.title.to_string()
    } else {
        format!("{} - {}", view.title, view.site.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MenuLink;
    use crate::pipeline::{CodeBlockNode, ImageNode};
    use crate::test_helpers::entry;
    use crate::types::SectionItem;

    fn item(href: &str, active: bool) -> SectionItem {
        SectionItem {
            href: href.to_string(),
            title: href.trim_start_matches('/').to_string(),
            is_active: active,
        }
    }

    fn site() -> ContentConfig {
        ContentConfig {
            title: "Acme Docs".to_string(),
            menu: vec![MenuLink {
                title: "Guides".to_string(),
                href: "/guides".to_string(),
            }],
            copyright: Some("© Acme".to_string()),
            ..ContentConfig::default()
        }
    }

    fn document() -> RenderedDocument {
        RenderedDocument {
            html: "<p>Hello</p>".to_string(),
            title: Some("Intro".to_string()),
            toc: vec![TocEntry {
                level: 2,
                id: "setup".to_string(),
                title: "Setup".to_string(),
            }],
        }
    }

    #[test]
    fn sidebar_marks_active_section_and_item() {
        let sections = vec![
            Section {
                title: Some("Basics".to_string()),
                is_active: true,
                items: vec![item("/intro", true), item("/setup", false)],
            },
            Section {
                title: Some("HTTP".to_string()),
                is_active: false,
                items: vec![item("/routing", false)],
            },
        ];
        let html = render_sidebar(&sections).into_string();
        assert!(html.contains(r#"class="sidebar-section active""#));
        assert!(html.contains(r#"<li class="current"><a href="/intro" aria-current="page">"#));
        assert!(html.contains("HTTP"));
    }

    #[test]
    fn sidebar_skips_empty_sections_and_untitled_heading() {
        let sections = vec![
            Section {
                title: Some("Drafts".to_string()),
                is_active: false,
                items: vec![],
            },
            Section {
                title: None,
                is_active: false,
                items: vec![item("/loose", false)],
            },
        ];
        let html = render_sidebar(&sections).into_string();
        assert!(!html.contains("Drafts"));
        assert!(!html.contains("sidebar-title"));
        assert!(html.contains("/loose"));
    }

    #[test]
    fn pagination_renders_both_directions() {
        let links = PaginationLinks {
            previous: Some(PageLink {
                category: Some("Basics".to_string()),
                title: "Intro".to_string(),
                url: "/intro".to_string(),
            }),
            next: Some(PageLink {
                category: None,
                title: "Routing".to_string(),
                url: "/routing".to_string(),
            }),
        };
        let html = render_pagination(&links).into_string();
        assert!(html.contains(r#"class="pagination-previous" href="/intro""#));
        assert!(html.contains("Previous · Basics"));
        assert!(html.contains(r#"class="pagination-next" href="/routing""#));
    }

    #[test]
    fn pagination_absent_renders_nothing() {
        assert_eq!(render_pagination(&PaginationLinks::default()).into_string(), "");
    }

    #[test]
    fn code_block_markup_escapes_code() {
        let node = Node::CodeBlock(CodeBlockNode {
            lang: None,
            meta: None,
            code: "<script>".to_string(),
        });
        let html = node_markup(&node, CodeTheme::Nord).into_string();
        assert!(html.contains(r#"data-theme="nord""#));
        assert!(!html.contains("data-lang"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn image_component_wraps_node() {
        let component = Component::new(
            IMAGE_COMPONENT,
            Node::Image(ImageNode {
                src: "/a.png".to_string(),
                alt: "A".to_string(),
                title: None,
            }),
        );
        let html = ComponentRegistry::with_defaults()
            .render(&component, CodeTheme::default())
            .unwrap()
            .into_string();
        assert!(html.starts_with(r#"<span class="img-frame">"#));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(!html.contains("img-caption"));
    }

    #[test]
    fn custom_component_can_be_registered() {
        fn shout(_: &Component<'_>, _: CodeTheme) -> Markup {
            html! { strong { "!" } }
        }
        let registry = ComponentRegistry::new().register("elements/shout", shout);
        assert!(registry.contains("elements/shout"));
        let component = Component::new("elements/shout", Node::Event(pulldown_cmark::Event::Rule));
        let html = registry.render(&component, CodeTheme::default()).unwrap();
        assert_eq!(html.into_string(), "<strong>!</strong>");
    }

    #[test]
    fn docs_template_includes_everything() {
        let current = entry("/intro", "Intro", Some("Basics"));
        let doc = document();
        let site = site();
        let sections = vec![Section {
            title: Some("Basics".to_string()),
            is_active: true,
            items: vec![item("/intro", true)],
        }];
        let pagination = PaginationLinks::default();
        let view = PageView {
            title: "Intro",
            entry: &current,
            document: &doc,
            sections: &sections,
            pagination: &pagination,
            site: &site,
            sponsors: &[],
            latest_release: None,
            edit_url: Some("https://example.com/edit/intro.md".to_string()),
            css: "body {}",
        };
        let html = render_template(TemplateName::Docs, &view).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Intro - Acme Docs</title>"));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains(r#"class="sidebar""#));
        assert!(html.contains(r##"href="#setup""##));
        assert!(html.contains("Edit this page"));
        assert!(html.contains("/guides"));
        assert!(html.contains("© Acme"));
    }

    #[test]
    fn page_template_has_no_sidebar() {
        let current = entry("/about", "About", None);
        let doc = document();
        let site = site();
        let pagination = PaginationLinks::default();
        let view = PageView {
            title: "About",
            entry: &current,
            document: &doc,
            sections: &[],
            pagination: &pagination,
            site: &site,
            sponsors: &[],
            latest_release: None,
            edit_url: None,
            css: "",
        };
        let html = render_template(TemplateName::Page, &view).into_string();
        assert!(html.contains("<p>Hello</p>"));
        assert!(!html.contains("sidebar"));
        assert!(!html.contains("toc"));
    }

    #[test]
    fn html_escape_in_sidebar() {
        let sections = vec![Section {
            title: Some("<script>alert('xss')</script>".to_string()),
            is_active: false,
            items: vec![item("/a", false)],
        }];
        let html = render_sidebar(&sections).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
