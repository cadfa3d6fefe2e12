//! HTML renderer for gemtext nodes.
//!
//! Produces a stream of HTML fragments, one per node, without any page
//! wrapper. Embedding the fragments in a template is up to the caller.

use std::io::{self, Write};

use crate::backend::NodeRenderer;
use crate::error::{Error, Result};
use crate::link::{self, DEFAULT_GATEWAY};
use crate::node::Node;
use crate::state::{HeadingState, TocEntry, escape_html};

/// Deepest heading HTML supports.
const MAX_HEADING_LEVEL: u8 = 6;

/// Options controlling HTML output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output level of an H1 node. `0` is treated as `1`.
    pub heading_level: u8,
    /// HTTP gateway prefix for `gemini://` links.
    pub gateway: String,
    /// Append the raw URL to link text that differs from it.
    pub show_link_urls: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_level: 1,
            gateway: DEFAULT_GATEWAY.to_owned(),
            show_link_urls: false,
        }
    }
}

/// Renders gemtext nodes to HTML.
///
/// Keeps heading anchors unique for the lifetime of one document. Use one
/// renderer per document, or call [`reset`](NodeRenderer::reset) in between.
///
/// # Example
///
/// ```
/// use quiltro_gemtext::{HtmlRenderer, Node, NodeRenderer};
///
/// let mut renderer = HtmlRenderer::new().with_heading_level(2);
/// let mut out = Vec::new();
/// renderer.render(&Node::H1("Intro".into()), &mut out).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "<h2 id=\"intro\"><a href=\"#intro\">Intro</a></h2>\n"
/// );
/// ```
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    options: RenderOptions,
    heading: HeadingState,
}

impl HtmlRenderer {
    /// Create a renderer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer from explicit options.
    #[must_use]
    pub fn from_options(options: RenderOptions) -> Self {
        Self {
            options,
            heading: HeadingState::default(),
        }
    }

    /// Render H1 nodes at `level` (H2 at `level + 1`, ...).
    #[must_use]
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.options.heading_level = level;
        self
    }

    /// Route `gemini://` links through `gateway`.
    #[must_use]
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.options.gateway = gateway.into();
        self
    }

    /// Show the raw URL after link text that differs from it.
    #[must_use]
    pub fn with_link_urls(mut self, enabled: bool) -> Self {
        self.options.show_link_urls = enabled;
        self
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Text of the first H1 rendered so far.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.heading.title()
    }

    /// Headings rendered so far.
    #[must_use]
    pub fn toc(&self) -> &[TocEntry] {
        self.heading.toc()
    }

    /// Take the table of contents, leaving it empty.
    pub fn take_toc(&mut self) -> Vec<TocEntry> {
        self.heading.take_toc()
    }

    /// Output level for a heading of `rank` (H1 = 0).
    fn level(&self, rank: u8) -> u8 {
        self.options
            .heading_level
            .max(1)
            .saturating_add(rank)
            .min(MAX_HEADING_LEVEL)
    }

    fn write_node<W: Write + ?Sized>(&mut self, node: &Node, out: &mut W) -> io::Result<()> {
        match node {
            Node::Para(text) | Node::BlockquoteText(text) => {
                writeln!(out, "<p>{}</p>", escape_html(text))
            }
            Node::H1(text) => self.write_heading(0, text, out),
            Node::H2(text) => self.write_heading(1, text, out),
            Node::H3(text) => self.write_heading(2, text, out),
            Node::Link { url, text } => self.write_link(url, text, out),
            Node::ListStart(text) => writeln!(out, "<ul>\n<li>{}</li>", escape_html(text)),
            Node::ListText(text) => writeln!(out, "<li>{}</li>", escape_html(text)),
            Node::ListEnd => writeln!(out, "</ul>"),
            Node::PreformattedStart => write!(out, "<pre>"),
            Node::PreformattedAlt(alt) => {
                write!(out, r#"<pre aria-label="{}">"#, escape_html(alt))
            }
            Node::PreformattedText(text) => writeln!(out, "{text}"),
            Node::PreformattedEnd => writeln!(out, "</pre>"),
            Node::BlockquoteStart(text) => {
                writeln!(out, "<blockquote>\n<p>{}</p>", escape_html(text))
            }
            Node::BlockquoteEnd => writeln!(out, "</blockquote>"),
        }
    }

    fn write_heading<W: Write + ?Sized>(
        &mut self,
        rank: u8,
        text: &str,
        out: &mut W,
    ) -> io::Result<()> {
        let level = self.level(rank);
        let id = self.heading.push_heading(rank, level, text);
        writeln!(
            out,
            r##"<h{level} id="{id}"><a href="#{id}">{}</a></h{level}>"##,
            escape_html(text)
        )
    }

    fn write_link<W: Write + ?Sized>(&self, url: &str, text: &str, out: &mut W) -> io::Result<()> {
        let link = link::resolve(url, &self.options.gateway);
        let href = escape_html(&link.href);
        let label = escape_html(text);
        let described = text != url;

        if link.image {
            writeln!(out, "<figure>")?;
            writeln!(out, r#"<a href="{href}"><img src="{href}" /></a>"#)?;
            if described {
                writeln!(out, "<figcaption>{label}</figcaption>")?;
            }
            return writeln!(out, "</figure>");
        }

        write!(out, r#"<p class="link"><a href="{href}""#)?;
        if link.external {
            write!(out, r#" class="external""#)?;
        }
        if described {
            write!(out, r#" title="{label}""#)?;
        }
        write!(out, ">{label}")?;
        if described && self.options.show_link_urls {
            write!(out, " ({})", escape_html(url))?;
        }
        writeln!(out, "</a></p>")
    }
}

impl NodeRenderer for HtmlRenderer {
    fn render<W: Write + ?Sized>(&mut self, node: &Node, out: &mut W) -> Result<()> {
        self.write_node(node, out).map_err(|source| Error::Write {
            node: node.kind(),
            source,
        })
    }

    fn reset(&mut self) {
        self.heading.reset();
    }
}
