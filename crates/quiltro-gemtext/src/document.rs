//! Driving a parser into a renderer for a whole document.

use std::io::{BufRead, Write};

use crate::backend::NodeRenderer;
use crate::error::Result;
use crate::html::{HtmlRenderer, RenderOptions};
use crate::node::BlockKind;
use crate::parser::Parser;
use crate::state::TocEntry;

/// Outcome of driving one document through a renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Nodes handed to the renderer.
    pub nodes: usize,
    /// Source lines read.
    pub lines: usize,
    /// Block still open when the input ended. No closing node is
    /// synthesized for it.
    pub unterminated: Option<BlockKind>,
}

/// Result of rendering an in-memory document to HTML.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML fragments.
    pub html: String,
    /// Text of the first H1, if any.
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Block still open when the input ended.
    pub unterminated: Option<BlockKind>,
}

/// Feed every node of `parser` to `renderer`, writing into `out`.
///
/// Blank separator lines produce no output. Stops at the first read or
/// write failure.
pub fn write_document<R, W, B>(
    parser: &mut Parser<R>,
    renderer: &mut B,
    out: &mut W,
) -> Result<DocumentSummary>
where
    R: BufRead,
    W: Write + ?Sized,
    B: NodeRenderer,
{
    let mut nodes = 0;
    while parser.advance()? {
        if let Some(node) = parser.current() {
            renderer.render(node, out)?;
            nodes += 1;
        }
    }

    let summary = DocumentSummary {
        nodes,
        lines: parser.line_number(),
        unterminated: parser.open_block(),
    };
    if let Some(block) = summary.unterminated {
        tracing::warn!(
            block = %block,
            line = summary.lines,
            "Document ends inside an unterminated block"
        );
    }
    tracing::debug!(nodes, lines = summary.lines, "Document rendered");
    Ok(summary)
}

/// Render an in-memory gemtext document to HTML.
///
/// # Example
///
/// ```
/// use quiltro_gemtext::{RenderOptions, render_to_string};
///
/// let result = render_to_string("# Hi\n=> /a.gmi A", &RenderOptions::default()).unwrap();
/// assert_eq!(result.title.as_deref(), Some("Hi"));
/// assert!(result.html.contains(r#"href="/a.html""#));
/// ```
pub fn render_to_string(input: &str, options: &RenderOptions) -> Result<RenderResult> {
    let mut parser = Parser::from_str(input);
    let mut renderer = HtmlRenderer::from_options(options.clone());
    let mut out = Vec::with_capacity(input.len() * 2);

    let summary = write_document(&mut parser, &mut renderer, &mut out)?;

    Ok(RenderResult {
        html: String::from_utf8_lossy(&out).into_owned(),
        title: renderer.title().map(str::to_owned),
        toc: renderer.take_toc(),
        unterminated: summary.unterminated,
    })
}
