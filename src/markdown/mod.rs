//! Line-oriented Markdown parsing for bilingual slide content.
//!
//! Each non-blank source line becomes one [`Block`]: an optional highlight
//! [`Marker`] detected from a configurable leading glyph, followed by a
//! sequence of styled [`Run`]s. Only a small inline vocabulary is
//! recognized: `**strong**`, `*light*`, and a configurable formula
//! delimiter (`$x+y$` by default). Tables, images, links and nesting are
//! not supported.
//!
//! # Quick Start
//!
//! ```rust
//! use bideck::markdown::{Marker, ParseOptions, Parser};
//!
//! # fn main() -> Result<(), bideck::markdown::ParseError> {
//! let parser = Parser::new(&ParseOptions::default())?;
//! let blocks = parser.parse("★ **Key** idea\n- plain $E=mc^2$");
//!
//! assert_eq!(blocks.len(), 2);
//! assert_eq!(blocks[0].marker, Marker::Star);
//! assert!(blocks[0].runs[0].is_strong());
//! assert!(blocks[1].runs[1].is_formula());
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod parser;
pub mod types;

pub use config::ParseOptions;
pub use parser::{ParseError, Parser, parse};
pub use types::{Block, Marker, Run, RunStyle};
