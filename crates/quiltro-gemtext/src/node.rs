//! Document nodes produced by the parser.

/// One parsed gemtext node.
///
/// Each variant carries only the data it needs, so a block terminator can
/// never hold stray text and only links carry a URL.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// Plain paragraph line, untrimmed.
    Para(String),
    /// `#` heading, trimmed.
    H1(String),
    /// `##` heading, trimmed.
    H2(String),
    /// `###` heading, trimmed.
    H3(String),
    /// Link line. `url` is the raw, unresolved target.
    Link { url: String, text: String },
    /// First `*` item, which opens a list.
    ListStart(String),
    /// Following `*` item.
    ListText(String),
    /// Closes a list.
    ListEnd,
    /// Opening fence without alt text.
    PreformattedStart,
    /// Opening fence with alt text (used as an accessibility label).
    PreformattedAlt(String),
    /// Line inside a preformatted block, verbatim.
    PreformattedText(String),
    /// Closing fence, or a blank line inside the block.
    PreformattedEnd,
    /// First `>` line, which opens a quote.
    BlockquoteStart(String),
    /// Following `>` line.
    BlockquoteText(String),
    /// Closes a quote.
    BlockquoteEnd,
}

/// Field-less mirror of [`Node`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Para,
    H1,
    H2,
    H3,
    Link,
    ListStart,
    ListText,
    ListEnd,
    PreformattedStart,
    PreformattedAlt,
    PreformattedText,
    PreformattedEnd,
    BlockquoteStart,
    BlockquoteText,
    BlockquoteEnd,
}

/// Multi-line block a parser can be inside of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockKind {
    Preformatted,
    Blockquote,
    List,
}

impl BlockKind {
    /// The node that closes this block.
    #[must_use]
    pub fn end_node(self) -> Node {
        match self {
            Self::Preformatted => Node::PreformattedEnd,
            Self::Blockquote => Node::BlockquoteEnd,
            Self::List => Node::ListEnd,
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Preformatted => "preformatted",
            Self::Blockquote => "blockquote",
            Self::List => "list",
        })
    }
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Para(_) => NodeKind::Para,
            Self::H1(_) => NodeKind::H1,
            Self::H2(_) => NodeKind::H2,
            Self::H3(_) => NodeKind::H3,
            Self::Link { .. } => NodeKind::Link,
            Self::ListStart(_) => NodeKind::ListStart,
            Self::ListText(_) => NodeKind::ListText,
            Self::ListEnd => NodeKind::ListEnd,
            Self::PreformattedStart => NodeKind::PreformattedStart,
            Self::PreformattedAlt(_) => NodeKind::PreformattedAlt,
            Self::PreformattedText(_) => NodeKind::PreformattedText,
            Self::PreformattedEnd => NodeKind::PreformattedEnd,
            Self::BlockquoteStart(_) => NodeKind::BlockquoteStart,
            Self::BlockquoteText(_) => NodeKind::BlockquoteText,
            Self::BlockquoteEnd => NodeKind::BlockquoteEnd,
        }
    }

    /// Textual content, or `""` for variants that carry none.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Para(text)
            | Self::H1(text)
            | Self::H2(text)
            | Self::H3(text)
            | Self::Link { text, .. }
            | Self::ListStart(text)
            | Self::ListText(text)
            | Self::PreformattedAlt(text)
            | Self::PreformattedText(text)
            | Self::BlockquoteStart(text)
            | Self::BlockquoteText(text) => text,
            Self::ListEnd
            | Self::PreformattedStart
            | Self::PreformattedEnd
            | Self::BlockquoteEnd => "",
        }
    }

    /// Raw link target. `None` for everything but [`Node::Link`].
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Link { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Heading rank: H1 = 0, H2 = 1, H3 = 2.
    #[must_use]
    pub fn heading_rank(&self) -> Option<u8> {
        match self {
            Self::H1(_) => Some(0),
            Self::H2(_) => Some(1),
            Self::H3(_) => Some(2),
            _ => None,
        }
    }
}

impl NodeKind {
    /// Block this node opens, if any.
    #[must_use]
    pub fn opens(self) -> Option<BlockKind> {
        match self {
            Self::ListStart => Some(BlockKind::List),
            Self::PreformattedStart | Self::PreformattedAlt => Some(BlockKind::Preformatted),
            Self::BlockquoteStart => Some(BlockKind::Blockquote),
            _ => None,
        }
    }

    /// Block this node closes, if any.
    #[must_use]
    pub fn closes(self) -> Option<BlockKind> {
        match self {
            Self::ListEnd => Some(BlockKind::List),
            Self::PreformattedEnd => Some(BlockKind::Preformatted),
            Self::BlockquoteEnd => Some(BlockKind::Blockquote),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_empty_for_terminators() {
        assert_eq!(Node::ListEnd.text(), "");
        assert_eq!(Node::PreformattedStart.text(), "");
        assert_eq!(Node::PreformattedEnd.text(), "");
        assert_eq!(Node::BlockquoteEnd.text(), "");
    }

    #[test]
    fn test_url_only_on_links() {
        let link = Node::Link {
            url: "/a.gmi".to_owned(),
            text: "A".to_owned(),
        };
        assert_eq!(link.url(), Some("/a.gmi"));
        assert_eq!(link.text(), "A");
        assert_eq!(Node::Para("/a.gmi".to_owned()).url(), None);
    }

    #[test]
    fn test_heading_rank() {
        assert_eq!(Node::H1("a".to_owned()).heading_rank(), Some(0));
        assert_eq!(Node::H3("a".to_owned()).heading_rank(), Some(2));
        assert_eq!(Node::Para("a".to_owned()).heading_rank(), None);
    }

    #[test]
    fn test_open_and_close_pairs() {
        assert_eq!(NodeKind::PreformattedAlt.opens(), Some(BlockKind::Preformatted));
        assert_eq!(NodeKind::ListEnd.closes(), Some(BlockKind::List));
        assert_eq!(NodeKind::ListText.opens(), None);
        assert_eq!(NodeKind::ListText.closes(), None);
        for block in [BlockKind::List, BlockKind::Blockquote, BlockKind::Preformatted] {
            assert_eq!(block.end_node().kind().closes(), Some(block));
        }
    }
}
