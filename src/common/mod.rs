//! Common types and utilities shared by the parsing, layout and packaging stages.

pub mod color;
pub mod error;
pub mod unit;
pub mod xml;

pub use color::sanitize_hex;
pub use error::{Error, Result};
pub use xml::escape_xml;
