//! `quiltro check` command implementation.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Args;
use quiltro_gemtext::{BlockKind, Parser};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Gemtext files to check.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// What parsing one document found.
#[derive(Debug, PartialEq, Eq)]
struct CheckReport {
    nodes: usize,
    lines: usize,
    unterminated: Option<BlockKind>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or any document ends inside
    /// an unterminated block.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let mut failed = 0;

        for path in &self.files {
            let file = File::open(path).map_err(|source| CliError::File {
                path: path.clone(),
                source,
            })?;
            let report = check_document(BufReader::new(file)).map_err(|source| {
                CliError::Document {
                    path: path.clone(),
                    source,
                }
            })?;

            match report.unterminated {
                Some(block) => {
                    failed += 1;
                    output.unterminated(path, block, report.lines);
                }
                None => output.info(&format!(
                    "{}: {} nodes, {} lines",
                    path.display(),
                    report.nodes,
                    report.lines
                )),
            }
        }

        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} of {} documents end inside an unterminated block",
                self.files.len()
            )));
        }
        output.success(&format!("{} documents OK", self.files.len()));
        Ok(())
    }
}

/// Parse a whole document without rendering it.
fn check_document<R: BufRead>(reader: R) -> quiltro_gemtext::Result<CheckReport> {
    let mut parser = Parser::new(reader);
    let nodes = parser
        .by_ref()
        .try_fold(0usize, |count, node| node.map(|_| count + 1))?;
    Ok(CheckReport {
        nodes,
        lines: parser.line_number(),
        unterminated: parser.open_block(),
    })
}
