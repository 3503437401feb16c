//! Unified error type for bideck.
//!
//! Each stage has its own error enum; this type wraps them so the
//! application layer can propagate any failure with `?`.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bideck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Source documents could not be discovered or paired
    #[error(transparent)]
    Discovery(#[from] crate::discovery::DiscoveryError),

    /// Parser matchers could not be built from the configured markers
    #[error(transparent)]
    Parse(#[from] crate::markdown::ParseError),

    /// Output path could not be resolved
    #[error(transparent)]
    Output(#[from] crate::output::OutputError),

    /// Package synthesis failed
    #[error(transparent)]
    Pptx(#[from] crate::pptx::PptxError),

    /// A source document could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source directory holds no matching document pairs
    #[error("no documents found under {}", .0.display())]
    NoDocuments(PathBuf),
}

/// Result type for bideck operations.
pub type Result<T> = std::result::Result<T, Error>;
