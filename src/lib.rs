//! Bideck - bilingual Markdown to PPTX slide decks
//!
//! Bideck turns pairs of short Markdown documents, one in a source language
//! and one in a target language, into a single PowerPoint deck. Every pair
//! becomes one slide with the source text on the left and the target text
//! on the right.
//!
//! The pipeline has three stages:
//!
//! - [`markdown`]: line-oriented parsing into blocks of styled runs
//! - [`layout`]: picking one font size and per-side column counts, and
//!   truncating content that cannot fit
//! - [`pptx`]: synthesizing the OOXML package from an embedded template
//!
//! [`config`], [`discovery`] and [`output`] feed the pipeline, and [`app`]
//! wires everything together for the command-line tool.
//!
//! # Example
//!
//! ```no_run
//! use bideck::layout::{FitConfig, fit};
//! use bideck::markdown::{ParseOptions, Parser};
//! use bideck::pptx::{Deck, DeckWriter};
//!
//! # fn main() -> bideck::Result<()> {
//! let parser = Parser::new(&ParseOptions::default())?;
//! let (slide, warnings) = fit(
//!     parser.parse("★ **Key** idea"),
//!     parser.parse("★ **要点**"),
//!     &FitConfig::default(),
//! );
//! assert!(warnings.is_empty());
//!
//! DeckWriter::write("deck.pptx", &Deck::new(vec![slide]))?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod common;
pub mod config;
pub mod discovery;
pub mod layout;
pub mod markdown;
pub mod output;
pub mod pptx;

pub use common::{Error, Result};
