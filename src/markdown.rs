//! Markdown to HTML through the rendering pipeline.
//!
//! ```text
//! source ─▶ pulldown-cmark events ─▶ lift_nodes ─▶ pipeline hooks ─▶ HTML
//! ```
//!
//! Lifting collapses an image (`Start(Image) .. End(Image)`), a heading or a
//! code block into a single typed node so hooks can inspect and replace it
//! whole. Hook output is turned back into a single HTML event, which lets the
//! stock `pulldown_cmark::html` writer keep handling tables, lists and the
//! rest of the document structure.

use crate::pipeline::{CodeBlockNode, HeadingNode, HookOutput, ImageNode, Node, RenderingPipeline};
use crate::render::RenderError;
use crate::templates::{self, ComponentRegistry};
use crate::theme::CodeTheme;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use serde::Serialize;

/// Output of rendering one markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html: String,
    /// Text of the first `h1`, if any.
    pub title: Option<String>,
    pub toc: Vec<TocEntry>,
}

/// Table of contents entry for an `h2` or `h3` with an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub title: String,
}

pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render a markdown document.
pub fn render_markdown(
    source: &str,
    pipeline: &RenderingPipeline,
    components: &ComponentRegistry,
    theme: CodeTheme,
) -> Result<RenderedDocument, RenderError> {
    let nodes = lift_nodes(Parser::new_ext(source, parser_options()));

    let mut title = None;
    let mut toc = Vec::new();
    let mut events = Vec::with_capacity(nodes.len());

    for mut node in nodes {
        if let Node::Heading(heading) = &mut node {
            resolve_inline_images(heading, pipeline, components, theme)?;
        }
        let output = pipeline.process(node);
        if let HookOutput::Node(Node::Heading(heading)) = &output {
            record_heading(heading, &mut title, &mut toc);
        }
        events.push(into_event(output, components, theme)?);
    }

    let mut body = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut body, events.into_iter());

    Ok(RenderedDocument {
        html: body,
        title,
        toc,
    })
}

/// Run images nested in a heading through the pipeline and swap in their markup.
fn resolve_inline_images(
    heading: &mut HeadingNode<'_>,
    pipeline: &RenderingPipeline,
    components: &ComponentRegistry,
    theme: CodeTheme,
) -> Result<(), RenderError> {
    for child in &mut heading.children {
        if matches!(child, Node::Image(_)) {
            let image = std::mem::replace(child, Node::Event(Event::SoftBreak));
            *child = Node::Event(into_event(pipeline.process(image), components, theme)?);
        }
    }
    Ok(())
}

fn record_heading(heading: &HeadingNode<'_>, title: &mut Option<String>, toc: &mut Vec<TocEntry>) {
    let level = match heading.level {
        HeadingLevel::H1 => {
            if title.is_none() {
                *title = Some(heading.text().trim().to_string());
            }
            return;
        }
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        _ => return,
    };
    if let Some(id) = &heading.id {
        toc.push(TocEntry {
            level,
            id: id.clone(),
            title: heading.text().trim().to_string(),
        });
    }
}

/// Turn pipeline output back into an event for the HTML writer.
fn into_event<'a>(
    output: HookOutput<'a>,
    components: &ComponentRegistry,
    theme: CodeTheme,
) -> Result<Event<'a>, RenderError> {
    let event = match output {
        HookOutput::Node(Node::Event(event)) => event,
        HookOutput::Node(node @ Node::Image(_)) => {
            Event::InlineHtml(templates::node_markup(&node, theme).into_string().into())
        }
        HookOutput::Node(node) => {
            let mut block = templates::node_markup(&node, theme).into_string();
            block.push('\n');
            Event::Html(block.into())
        }
        HookOutput::Component(component) => {
            Event::InlineHtml(components.render(&component, theme)?.into_string().into())
        }
    };
    Ok(event)
}

/// Group raw parser events into pipeline nodes.
pub fn lift_nodes<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Vec<Node<'a>> {
    let mut nodes = Vec::new();
    let mut iter = events.into_iter();

    while let Some(event) = iter.next() {
        match event {
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => nodes.push(Node::Image(lift_image(dest_url, title, &mut iter))),
            Event::Start(Tag::Heading {
                level, id, classes, ..
            }) => {
                let mut children = Vec::new();
                while let Some(inner) = iter.next() {
                    match inner {
                        Event::End(TagEnd::Heading(_)) => break,
                        Event::Start(Tag::Image {
                            dest_url, title, ..
                        }) => children.push(Node::Image(lift_image(dest_url, title, &mut iter))),
                        other => children.push(Node::Event(other)),
                    }
                }
                nodes.push(Node::Heading(HeadingNode {
                    level,
                    id: id.map(|i| i.into_string()),
                    classes: classes.into_iter().map(|c| c.into_string()).collect(),
                    children,
                }));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let (lang, meta) = match kind {
                    CodeBlockKind::Fenced(info) => parse_fence_info(&info),
                    CodeBlockKind::Indented => (None, None),
                };
                let code = iter
                    .by_ref()
                    .take_while(|e| !matches!(e, Event::End(TagEnd::CodeBlock)))
                    .filter_map(|e| match e {
                        Event::Text(t) => Some(t.into_string()),
                        _ => None,
                    })
                    .collect();
                nodes.push(Node::CodeBlock(CodeBlockNode { lang, meta, code }));
            }
            other => nodes.push(Node::Event(other)),
        }
    }

    nodes
}

/// Consume events up to the image's end tag, collecting alt text.
fn lift_image<'a>(
    dest_url: CowStr<'a>,
    title: CowStr<'a>,
    iter: &mut impl Iterator<Item = Event<'a>>,
) -> ImageNode {
    let mut alt = String::new();
    let mut depth = 0usize;
    for inner in iter.by_ref() {
        match inner {
            Event::End(TagEnd::Image) if depth == 0 => break,
            Event::End(TagEnd::Image) => depth -= 1,
            Event::Start(Tag::Image { .. }) => depth += 1,
            Event::Text(t) | Event::Code(t) => alt.push_str(&t),
            _ => {}
        }
    }
    ImageNode {
        src: dest_url.into_string(),
        alt,
        title: (!title.is_empty()).then(|| title.into_string()),
    }
}

/// Split a fence info string into language and the remaining metadata.
///
/// - `"ts"` → `(Some("ts"), None)`
/// - `"ts title=\"app.ts\""` → `(Some("ts"), Some("title=\"app.ts\""))`
/// - `""` → `(None, None)`
fn parse_fence_info(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    let (lang, rest) = match info.split_once(char::is_whitespace) {
        Some((lang, rest)) => (lang, rest.trim()),
        None => (info, ""),
    };
    let lang = (!lang.is_empty()).then(|| lang.to_string());
    let meta = (!rest.is_empty()).then(|| rest.to_string());
    (lang, meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> RenderedDocument {
        render_markdown(
            source,
            &RenderingPipeline::docs(),
            &ComponentRegistry::with_defaults(),
            CodeTheme::default(),
        )
        .unwrap()
    }

    #[test]
    fn plain_markdown_converts() {
        let doc = render("Some **bold** and *italic* text.");
        assert!(doc.html.contains("<strong>bold</strong>"));
        assert!(doc.html.contains("<em>italic</em>"));
    }

    #[test]
    fn headings_get_slug_ids_and_toc() {
        let doc = render("# Routing\n\n## Route params\n\ntext\n\n### Optional params\n\n#### Deep\n");
        assert!(doc.html.contains(r#"<h2 id="route-params">Route params</h2>"#));
        assert_eq!(doc.title.as_deref(), Some("Routing"));
        let ids: Vec<&str> = doc.toc.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["route-params", "optional-params"]);
        assert_eq!(doc.toc[1].level, 3);
    }

    #[test]
    fn explicit_heading_id_is_kept() {
        let doc = render("## Install {#setup}\n");
        assert!(doc.html.contains(r#"id="setup""#));
        assert_eq!(doc.toc[0].id, "setup");
    }

    #[test]
    fn heading_inline_code_preserved() {
        let doc = render("## The `config` file\n");
        assert!(doc.html.contains("<code>config</code>"));
        assert_eq!(doc.toc[0].title, "The config file");
    }

    #[test]
    fn images_become_component() {
        let doc = render("Look: ![The logo](/logo.png \"Our logo\")");
        assert!(doc.html.contains(r#"class="img-frame""#));
        assert!(doc.html.contains(r#"src="/logo.png""#));
        assert!(doc.html.contains(r#"alt="The logo""#));
        assert!(doc.html.contains("Our logo"));
    }

    #[test]
    fn heading_images_become_component() {
        let doc = render("## ![logo](/logo.png) Title\n\n![plain](/p.png)\n");
        assert_eq!(doc.html.matches(r#"class="img-frame""#).count(), 2);
        assert!(doc.html.contains(r#"<h2 id="title">"#));
        assert_eq!(doc.toc[0].id, "title");
        assert_eq!(doc.toc[0].title, "Title");
    }

    #[test]
    fn image_without_pipeline_hook_renders_plain() {
        let doc = render_markdown(
            "![Alt](/a.png)",
            &RenderingPipeline::new(),
            &ComponentRegistry::with_defaults(),
            CodeTheme::default(),
        )
        .unwrap();
        assert!(doc.html.contains(r#"<img src="/a.png" alt="Alt">"#));
        assert!(!doc.html.contains("img-frame"));
    }

    #[test]
    fn code_block_carries_theme_and_language() {
        let doc = render("```ts title=\"app.ts\"\nconst a = 1 < 2\n```\n");
        assert!(doc.html.contains(r#"data-theme="material-theme-darker""#));
        assert!(doc.html.contains(r#"data-lang="ts""#));
        assert!(doc.html.contains("language-ts"));
        assert!(doc.html.contains("const a = 1 &lt; 2"));
    }

    #[test]
    fn tables_still_render() {
        let doc = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(doc.html.contains("<table>"));
        assert!(doc.html.contains("<th>a</th>"));
        assert!(doc.html.contains("<td>1</td>"));
    }

    #[test]
    fn unknown_component_is_error() {
        let result = render_markdown(
            "![Alt](/a.png)",
            &RenderingPipeline::docs(),
            &ComponentRegistry::new(),
            CodeTheme::default(),
        );
        assert!(matches!(result, Err(RenderError::UnknownComponent(name)) if name == "elements/img"));
    }

    #[test]
    fn lift_collapses_nested_image_alt() {
        let nodes = lift_nodes(Parser::new("![outer ![inner](/i.png) text](/o.png)"));
        let images: Vec<&ImageNode> = nodes
            .iter()
            .filter_map(|n| match n {
                Node::Image(img) => Some(img),
                _ => None,
            })
            .collect();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].src, "/o.png");
        assert!(images[0].alt.starts_with("outer"));
    }

    #[test]
    fn lift_heading_images_as_children() {
        let nodes = lift_nodes(Parser::new("# ![mark](/m.svg) Acme\n"));
        let Node::Heading(heading) = &nodes[0] else {
            panic!("expected heading, got {:?}", nodes[0]);
        };
        assert!(matches!(&heading.children[0], Node::Image(img) if img.src == "/m.svg"));
        assert_eq!(heading.text(), " Acme");
    }

    #[test]
    fn fence_info_parsing() {
        assert_eq!(parse_fence_info("ts"), (Some("ts".to_string()), None));
        assert_eq!(
            parse_fence_info("ts  title=\"a\" "),
            (Some("ts".to_string()), Some("title=\"a\"".to_string()))
        );
        assert_eq!(parse_fence_info("  "), (None, None));
    }
}
