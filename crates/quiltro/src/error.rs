//! CLI error types.

use std::path::PathBuf;

use quiltro_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Gemtext(#[from] quiltro_gemtext::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Document {
        path: PathBuf,
        source: quiltro_gemtext::Error,
    },

    #[error("{0}")]
    Validation(String),
}
