//! Presentation package synthesis.
//!
//! A [`Deck`] of fitted slides is rendered into a `.pptx` package built on
//! an embedded baseline: a minimal valid presentation with one master, one
//! blank layout and no slides. Per package, five shared parts are
//! rewritten to match the slide count (content types, the presentation
//! part and its relationships, and both document property parts), one
//! slide part and one relationships part are generated per slide, and
//! all members are zipped in name order.
//!
//! # Member names
//!
//! Besides the baseline parts, a package with `N` slides contains
//! `ppt/slides/slide{n}.xml` and `ppt/slides/_rels/slide{n}.xml.rels`
//! for `n` in `1..=N`.
//!
//! # Example
//!
//! ```no_run
//! use bideck::layout::{FitConfig, fit};
//! use bideck::markdown::{ParseOptions, Parser};
//! use bideck::pptx::{Deck, DeckWriter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parser = Parser::new(&ParseOptions::default())?;
//! let (slide, _warnings) = fit(
//!     parser.parse("★ **Energy** $E=mc^2$"),
//!     parser.parse("★ **能量** $E=mc^2$"),
//!     &FitConfig::default(),
//! );
//! DeckWriter::write("deck.pptx", &Deck::new(vec![slide]))?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod deck;
pub mod error;
mod package;
mod slide;
pub mod template;
pub mod writer;
mod xml;

#[cfg(test)]
mod tests;

pub use deck::{Deck, StylePalette};
pub use error::{PptxError, Result};
pub use template::PartMap;
pub use writer::DeckWriter;
