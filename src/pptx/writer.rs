//! Archive assembly and file output.
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use tracing::{info, warn};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

use super::deck::Deck;
use super::error::{PptxError, Result};
use super::package::build_parts;
use super::template::PartMap;

/// Serializes a [`Deck`] into a presentation package.
///
/// # Example
///
/// ```no_run
/// use bideck::pptx::{Deck, DeckWriter};
/// # fn slides() -> Vec<bideck::layout::Slide> { Vec::new() }
///
/// let deck = Deck::new(slides());
/// DeckWriter::write("out/deck.pptx", &deck)?;
/// # Ok::<(), bideck::pptx::PptxError>(())
/// ```
pub struct DeckWriter;

impl DeckWriter {
    /// Write the package for `deck` to `path`, creating its parent directory.
    ///
    /// An empty deck fails before touching the filesystem. If writing fails
    /// part-way, the partial file is removed.
    pub fn write<P: AsRef<Path>>(path: P, deck: &Deck) -> Result<()> {
        let path = path.as_ref();
        if deck.is_empty() {
            return Err(PptxError::EmptyDeck);
        }
        let bytes = Self::to_bytes(deck)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PptxError::Output {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        if let Err(source) = fs::write(path, &bytes) {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "could not remove partial output");
                }
            }
            return Err(PptxError::Output {
                path: path.to_path_buf(),
                source,
            });
        }

        info!(path = %path.display(), slides = deck.slides.len(), bytes = bytes.len(), "wrote package");
        Ok(())
    }

    /// Serialize `deck` to package bytes.
    ///
    /// Identical decks (including [`Deck::created`]) produce identical bytes.
    pub fn to_bytes(deck: &Deck) -> Result<Vec<u8>> {
        let parts = build_parts(deck)?;
        archive(&parts)
    }
}

/// Zips `parts` in name order with a fixed timestamp.
fn archive(parts: &PartMap) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, blob) in parts.iter() {
        zip.start_file(name, options)?;
        zip.write_all(blob).map_err(|e| PptxError::Zip(format!("{name}: {e}")))?;
    }
    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_is_readable() {
        let parts: PartMap = [
            ("b.xml".to_string(), b"<b/>".to_vec()),
            ("a.xml".to_string(), b"<a/>".to_vec()),
        ]
        .into_iter()
        .collect();
        let bytes = archive(&parts).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert_eq!(archive.len(), 2);
        assert!(names.contains(&"a.xml") && names.contains(&"b.xml"));
    }
}
