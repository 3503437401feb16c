//! Error types for package synthesis.
use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for package synthesis.
pub type Result<T> = std::result::Result<T, PptxError>;

/// Error types for package synthesis.
///
/// Content overflow is not represented here; the fitter resolves it by
/// truncating and reports a [`crate::layout::Warning`] instead.
#[derive(Error, Debug)]
pub enum PptxError {
    /// The deck has no slides; nothing is written
    #[error("cannot write a package without slides")]
    EmptyDeck,

    /// An embedded template part is missing or malformed
    #[error("embedded template part {part} is unusable: {message}")]
    Template { part: String, message: String },

    /// A generated part could not be serialized
    #[error("failed to write XML for {part}: {message}")]
    Xml { part: String, message: String },

    /// Archive assembly failed
    #[error("ZIP error: {0}")]
    Zip(String),

    /// The output file or its directory could not be created
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PptxError {
    pub(crate) fn template(part: &str, message: impl Display) -> Self {
        PptxError::Template {
            part: part.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn xml(part: &str, message: impl Display) -> Self {
        PptxError::Xml {
            part: part.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for PptxError {
    fn from(err: zip::result::ZipError) -> Self {
        PptxError::Zip(err.to_string())
    }
}
