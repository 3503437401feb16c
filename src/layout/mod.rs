//! Fitting parsed content onto a two-column bilingual slide.
//!
//! The fitter picks one font size shared by both sides, lets each side
//! independently spill into a second text column, and truncates whatever
//! still does not fit. Capacity is estimated from a fixed character-width
//! ratio, not measured glyph metrics.

pub mod fit;
pub mod metrics;
pub mod types;

pub use fit::{TRUNCATION_NOTICE, fit};
pub use metrics::{FitConfig, SlideGeometry, Typography};
pub use types::{Column, ColumnCount, Side, Slide, Warning};
