//! Status reporting on stderr.
//!
//! stdout is reserved for rendered HTML, so every message here, styled or
//! not, goes to the stderr terminal.

use std::path::Path;

use console::{Style, Term};
use quiltro_gemtext::BlockKind;

pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.green.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.red.apply_to(msg).to_string());
    }

    /// `post.gmi -> public/post.html`, with the arrow dimmed.
    pub(crate) fn rendered(&self, input: &Path, target: &Path) {
        self.line(&format!(
            "{} {} {}",
            self.green.apply_to(input.display()),
            self.dim.apply_to("->"),
            target.display()
        ));
    }

    /// Warn that `path` ended inside an open block after `lines` lines.
    pub(crate) fn unterminated(&self, path: &Path, block: BlockKind, lines: usize) {
        let msg = format!(
            "{}: unterminated {block} block at end of input (line {lines})",
            path.display()
        );
        self.line(&self.yellow.apply_to(msg).to_string());
    }

    /// Terminal write failures are not worth aborting a render for.
    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }
}
