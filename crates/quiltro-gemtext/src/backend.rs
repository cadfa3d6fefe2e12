//! Renderer trait used by the document driver.

use std::io::Write;

use crate::error::Result;
use crate::node::Node;

/// Turns parsed nodes into an output format, one node at a time.
///
/// Implementations may keep per-document state (such as heading anchor
/// counters) between calls; [`reset`](Self::reset) clears it before the
/// renderer is reused for an unrelated document.
pub trait NodeRenderer {
    /// Write the fragment for `node` to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`](crate::Error::Write) if the sink fails.
    fn render<W: Write + ?Sized>(&mut self, node: &Node, out: &mut W) -> Result<()>;

    /// Forget all per-document state.
    fn reset(&mut self) {}
}
