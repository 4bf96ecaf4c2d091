//! Rendering pipeline: ordered hooks over parsed document nodes.
//!
//! Markdown is parsed by `pulldown-cmark`; the [`markdown`](crate::markdown)
//! module lifts images, headings and code blocks into typed [`Node`]s and
//! leaves every other event as [`Node::Event`]. Each node then runs through
//! the pipeline:
//!
//! ```text
//! node ──▶ hook 1 ──▶ hook 2 ──▶ ... ──▶ output
//!            │ None      → next hook sees the same node
//!            │ Node(n)   → next hook sees n
//!            └ Component → chain stops, component is rendered
//! ```
//!
//! The pipeline is built once at startup and shared read-only by every page
//! render, so hooks are `Send + Sync` and take `&self`.

use crate::slug::slugify;
use pulldown_cmark::{Event, HeadingLevel};
use std::fmt;

/// A parsed document node as seen by hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Image(ImageNode),
    Heading(HeadingNode<'a>),
    CodeBlock(CodeBlockNode),
    /// Any other markdown event, passed to the HTML writer as-is.
    Event(Event<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNode {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadingNode<'a> {
    pub level: HeadingLevel,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Inline content between the heading's start and end tags. Images are
    /// lifted to [`Node::Image`]; everything else stays a [`Node::Event`].
    pub children: Vec<Node<'a>>,
}

impl HeadingNode<'_> {
    /// Plain text of the heading, formatting and image alt text dropped.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Event(Event::Text(t) | Event::Code(t)) => Some(t.as_ref()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockNode {
    /// First word of the fence info string.
    pub lang: Option<String>,
    /// Rest of the fence info string (e.g. `title="app.ts"`).
    pub meta: Option<String>,
    pub code: String,
}

impl Node<'_> {
    /// HTML tag this node renders as, `None` for pass-through events.
    pub fn tag_name(&self) -> Option<&'static str> {
        match self {
            Node::Image(_) => Some("img"),
            Node::Heading(h) => Some(heading_tag(h.level)),
            Node::CodeBlock(_) => Some("pre"),
            Node::Event(_) => None,
        }
    }
}

pub(crate) fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// A named markup fragment rendered in place of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Component<'a> {
    pub name: String,
    pub node: Node<'a>,
}

impl<'a> Component<'a> {
    pub fn new(name: impl Into<String>, node: Node<'a>) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }
}

/// What a node becomes after the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutput<'a> {
    Node(Node<'a>),
    Component(Component<'a>),
}

/// A transformation step applied to each parsed node.
pub trait PipelineHook: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Return `None` to leave the node unchanged.
    fn apply<'a>(&self, node: &Node<'a>) -> Option<HookOutput<'a>>;
}

/// Ordered, immutable list of hooks.
#[derive(Default)]
pub struct RenderingPipeline {
    hooks: Vec<Box<dyn PipelineHook>>,
}

impl RenderingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The documentation pipeline: heading anchors, then themed images.
    pub fn docs() -> Self {
        Self::new().use_hook(DocsHook).use_hook(ImageHook)
    }

    /// Append a hook. Hooks run in the order they were added.
    pub fn use_hook(mut self, hook: impl PipelineHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn hook_names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Run one node through every hook.
    pub fn process<'a>(&self, node: Node<'a>) -> HookOutput<'a> {
        let mut node = node;
        for hook in &self.hooks {
            match hook.apply(&node) {
                None => {}
                Some(HookOutput::Node(replacement)) => node = replacement,
                Some(component @ HookOutput::Component(_)) => {
                    tracing::trace!(hook = hook.name(), "Node replaced by component");
                    return component;
                }
            }
        }
        HookOutput::Node(node)
    }
}

impl fmt::Debug for RenderingPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderingPipeline")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

// ============================================================================
// Built-in hooks
// ============================================================================

/// Gives headings without an explicit `{#id}` a slug id so they can be linked.
#[derive(Debug, Clone, Copy)]
pub struct DocsHook;

impl PipelineHook for DocsHook {
    fn name(&self) -> &'static str {
        "docs"
    }

    fn apply<'a>(&self, node: &Node<'a>) -> Option<HookOutput<'a>> {
        let Node::Heading(heading) = node else {
            return None;
        };
        if heading.id.is_some() {
            return None;
        }
        let slug = slugify(&heading.text());
        if slug.is_empty() {
            return None;
        }
        let mut heading = heading.clone();
        heading.id = Some(slug);
        Some(HookOutput::Node(Node::Heading(heading)))
    }
}

/// Name of the component that renders images.
pub const IMAGE_COMPONENT: &str = "elements/img";

/// Swaps `img` nodes for the themed image component.
#[derive(Debug, Clone, Copy)]
pub struct ImageHook;

impl PipelineHook for ImageHook {
    fn name(&self) -> &'static str {
        "image"
    }

    fn apply<'a>(&self, node: &Node<'a>) -> Option<HookOutput<'a>> {
        if node.tag_name() == Some("img") {
            return Some(HookOutput::Component(Component::new(
                IMAGE_COMPONENT,
                node.clone(),
            )));
        }
        None
    }
}
