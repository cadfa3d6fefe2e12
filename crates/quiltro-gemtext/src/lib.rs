//! Streaming gemtext parser and HTML renderer.
//!
//! Gemtext is a line-oriented markup: every line is a heading, link, list
//! item, quote, preformatted toggle or paragraph. This crate parses it one
//! line at a time into [`Node`]s and renders each node to an HTML fragment.
//!
//! # Architecture
//!
//! - [`Parser`]: single-pass cursor over any [`BufRead`](std::io::BufRead)
//!   source, also usable as an iterator of nodes
//! - [`NodeRenderer`]: one-node-at-a-time renderer trait
//! - [`HtmlRenderer`]: HTML implementation with unique heading anchors and
//!   link rewriting (`.gmi` → `.html`, `gemini://` through an HTTP gateway)
//! - [`write_document`]: drives a parser into a renderer and a sink
//!
//! Malformed markup never fails: it degrades to paragraph text. Only the
//! input source and the output sink can produce an [`Error`].
//!
//! # Example
//!
//! ```
//! use quiltro_gemtext::{HtmlRenderer, Parser, write_document};
//!
//! let mut parser = Parser::from_str("# Hello\n\n* one\n* two\n");
//! let mut html = Vec::new();
//! let summary = write_document(&mut parser, &mut HtmlRenderer::new(), &mut html).unwrap();
//! assert_eq!(summary.nodes, 3);
//! assert!(summary.unterminated.is_some());
//! ```

mod backend;
mod document;
mod error;
mod html;
mod link;
mod node;
mod parser;
mod state;

pub use backend::NodeRenderer;
pub use document::{DocumentSummary, RenderResult, render_to_string, write_document};
pub use error::{Error, Result};
pub use html::{HtmlRenderer, RenderOptions};
pub use link::DEFAULT_GATEWAY;
pub use node::{BlockKind, Node, NodeKind};
pub use parser::{Parser, ParserState};
pub use state::{TocEntry, escape_html, slugify};
