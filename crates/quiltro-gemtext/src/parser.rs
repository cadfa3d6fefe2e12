//! Streaming line-oriented gemtext parser.
//!
//! The parser reads one line at a time and keeps a tiny state machine:
//! which block (if any) is open, plus at most one pending line that must be
//! re-read after a list or blockquote is closed by a foreign line.

use std::io::BufRead;

use crate::error::{Error, Result};
use crate::node::{BlockKind, Node};

/// Fence that opens and closes a preformatted block.
const FENCE: &str = "```";

/// Parser state between lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParserState {
    /// Between blocks.
    #[default]
    None,
    Preformatted,
    Blockquote,
    List,
}

impl ParserState {
    /// The open block, or `None` between blocks.
    #[must_use]
    pub fn block(self) -> Option<BlockKind> {
        match self {
            Self::None => None,
            Self::Preformatted => Some(BlockKind::Preformatted),
            Self::Blockquote => Some(BlockKind::Blockquote),
            Self::List => Some(BlockKind::List),
        }
    }
}

/// Single-pass gemtext parser over a buffered reader.
///
/// Use it as a cursor with [`advance`](Self::advance) and
/// [`current`](Self::current), or as an [`Iterator`] of nodes that skips
/// blank separator lines.
///
/// # Example
///
/// ```
/// use quiltro_gemtext::{Node, Parser};
///
/// let nodes: Vec<Node> = Parser::from_str("# Title\n\nHello")
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(nodes, vec![Node::H1("Title".into()), Node::Para("Hello".into())]);
/// ```
pub struct Parser<R> {
    reader: R,
    state: ParserState,
    /// Line that closed a list or blockquote and still has to be parsed.
    pending: Option<String>,
    node: Option<Node>,
    buf: String,
    line_number: usize,
    exhausted: bool,
}

impl<'a> Parser<&'a [u8]> {
    /// Parse an in-memory string.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn from_str(input: &'a str) -> Self {
        Self::new(input.as_bytes())
    }

    /// Parse an in-memory byte buffer. Invalid UTF-8 surfaces as a read error.
    #[must_use]
    pub fn from_bytes(input: &'a [u8]) -> Self {
        Self::new(input)
    }
}

impl<R: BufRead> Parser<R> {
    /// Create a parser bound to `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: ParserState::None,
            pending: None,
            node: None,
            buf: String::new(),
            line_number: 0,
            exhausted: false,
        }
    }

    /// Current parser state.
    #[must_use]
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Block that is still open.
    ///
    /// Once the input is drained, `Some` means the document ended inside a
    /// block that was never terminated.
    #[must_use]
    pub fn open_block(&self) -> Option<BlockKind> {
        self.state.block()
    }

    /// Number of lines read from the source so far.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Node produced by the last successful [`advance`](Self::advance).
    ///
    /// `None` when that call consumed a blank line outside any block.
    #[must_use]
    pub fn current(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    /// Consume one input line.
    ///
    /// Returns `Ok(false)` once the source is drained. `Ok(true)` means the
    /// line was consumed; [`current`](Self::current) may still be `None` for a
    /// blank line between blocks. A read failure ends the sequence.
    pub fn advance(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }

        let line = match self.pending.take() {
            Some(line) => line,
            None => match self.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Err(err) => {
                    self.exhausted = true;
                    self.node = None;
                    return Err(err);
                }
            },
        };

        self.node = if line.is_empty() {
            self.close_block()
        } else {
            Some(self.parse_line(line))
        };
        Ok(true)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let line = self.line_number + 1;
        self.buf.clear();
        let read = self
            .reader
            .read_line(&mut self.buf)
            .map_err(|source| Error::Read { line, source })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number = line;

        let text = self.buf.strip_suffix('\n').unwrap_or(self.buf.as_str());
        let text = text.strip_suffix('\r').unwrap_or(text);
        Ok(Some(text.to_owned()))
    }

    /// Blank line: terminates the open block, if any.
    fn close_block(&mut self) -> Option<Node> {
        let block = self.state.block()?;
        self.state = ParserState::None;
        Some(block.end_node())
    }

    fn parse_line(&mut self, line: String) -> Node {
        match self.state {
            ParserState::None => self.open_line(line),
            ParserState::List => match line.strip_prefix('*') {
                Some(rest) => Node::ListText(rest.trim().to_owned()),
                None => self.requeue(line, Node::ListEnd),
            },
            ParserState::Preformatted => {
                if line.starts_with(FENCE) {
                    self.state = ParserState::None;
                    Node::PreformattedEnd
                } else {
                    Node::PreformattedText(line)
                }
            }
            ParserState::Blockquote => match line.strip_prefix('>') {
                Some(rest) => Node::BlockquoteText(rest.trim().to_owned()),
                None => self.requeue(line, Node::BlockquoteEnd),
            },
        }
    }

    /// Close the current block and keep `line` for the next call.
    fn requeue(&mut self, line: String, end: Node) -> Node {
        self.state = ParserState::None;
        self.pending = Some(line);
        end
    }

    /// Parse a line outside any block.
    fn open_line(&mut self, line: String) -> Node {
        if let Some(rest) = line.strip_prefix("###") {
            Node::H3(rest.trim().to_owned())
        } else if let Some(rest) = line.strip_prefix("##") {
            Node::H2(rest.trim().to_owned())
        } else if let Some(rest) = line.strip_prefix('#') {
            Node::H1(rest.trim().to_owned())
        } else if let Some(rest) = line.strip_prefix('*') {
            self.state = ParserState::List;
            Node::ListStart(rest.trim().to_owned())
        } else if let Some(rest) = line.strip_prefix("=>") {
            parse_link(rest)
        } else if let Some(rest) = line.strip_prefix(FENCE) {
            self.state = ParserState::Preformatted;
            if rest.is_empty() {
                Node::PreformattedStart
            } else {
                Node::PreformattedAlt(rest.trim().to_owned())
            }
        } else if let Some(rest) = line.strip_prefix('>') {
            self.state = ParserState::Blockquote;
            Node::BlockquoteStart(rest.trim().to_owned())
        } else {
            Node::Para(line)
        }
    }
}

/// Split `=> URL text` on the first space; the text after it is kept as is.
/// Without text the URL doubles as it.
fn parse_link(rest: &str) -> Node {
    let rest = rest.trim();
    match rest.split_once(' ') {
        Some((url, text)) => Node::Link {
            url: url.to_owned(),
            text: text.to_owned(),
        },
        None => Node::Link {
            url: rest.to_owned(),
            text: rest.to_owned(),
        },
    }
}

impl<R: BufRead> Iterator for Parser<R> {
    type Item = Result<Node>;

    /// Next node, skipping blank separator lines.
    ///
    /// Takes the node out of the cursor, so [`Parser::current`] is `None`
    /// afterwards.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.advance() {
                Ok(true) => {
                    if let Some(node) = self.node.take() {
                        return Some(Ok(node));
                    }
                }
                Ok(false) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for Parser<R> {}
