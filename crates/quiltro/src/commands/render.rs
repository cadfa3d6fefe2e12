//! `quiltro render` command implementation.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use quiltro_config::{CliSettings, Config};
use quiltro_gemtext::{DocumentSummary, HtmlRenderer, Parser, RenderOptions, write_document};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Gemtext files to render (default: read standard input).
    files: Vec<PathBuf>,

    /// Output directory; each input is written to `<name>.html` (default: stdout).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover quiltro.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output level of H1 headings (overrides config).
    #[arg(long)]
    level: Option<u8>,

    /// HTTP gateway prefix for gemini:// links (overrides config).
    #[arg(long)]
    gateway: Option<String>,

    /// Show raw URLs after link text (overrides config).
    #[arg(long)]
    show_link_urls: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, an input cannot be read or
    /// the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            heading_level: self.level,
            gateway: self.gateway,
            show_link_urls: self.show_link_urls.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        let options = config.render_options();

        if self.files.is_empty() {
            let summary = render_stream(io::stdin().lock(), &options, &mut io::stdout().lock())?;
            warn_unterminated(&output, Path::new("<stdin>"), &summary);
            return Ok(());
        }

        if let Some(dir) = &self.output_dir {
            std::fs::create_dir_all(dir).map_err(|source| CliError::File {
                path: dir.clone(),
                source,
            })?;
        }

        for path in &self.files {
            let summary = match &self.output_dir {
                Some(dir) => {
                    let target = output_path(dir, path);
                    let file = File::create(&target).map_err(|source| CliError::File {
                        path: target.clone(),
                        source,
                    })?;
                    let summary = render_file(path, &options, &mut BufWriter::new(file))?;
                    output.rendered(path, &target);
                    summary
                }
                None => render_file(path, &options, &mut io::stdout().lock())?,
            };
            warn_unterminated(&output, path, &summary);
        }

        Ok(())
    }
}

/// Render one gemtext file with a fresh renderer.
fn render_file<W: Write + ?Sized>(
    path: &Path,
    options: &RenderOptions,
    out: &mut W,
) -> Result<DocumentSummary, CliError> {
    let file = File::open(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Rendering document");
    render_stream(BufReader::new(file), options, out).map_err(|err| match err {
        CliError::Gemtext(source) => CliError::Document {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Render a whole document from `reader` into `out`.
fn render_stream<R: BufRead, W: Write + ?Sized>(
    reader: R,
    options: &RenderOptions,
    out: &mut W,
) -> Result<DocumentSummary, CliError> {
    let mut parser = Parser::new(reader);
    let mut renderer = HtmlRenderer::from_options(options.clone());
    let summary = write_document(&mut parser, &mut renderer, out)?;
    out.flush()?;
    Ok(summary)
}

/// `dir/<file stem>.html` for an input path.
fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "index".into(), |s| s.to_string_lossy());
    dir.join(format!("{stem}.html"))
}

fn warn_unterminated(output: &Output, path: &Path, summary: &DocumentSummary) {
    if let Some(block) = summary.unterminated {
        output.unterminated(path, block, summary.lines);
    }
}
