//! Fitted slide model.
use std::fmt;

use crate::markdown::Block;

/// Which language column a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left column
    Source,
    /// Right column
    Target,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Target => "target",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Source => 0,
            Side::Target => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of text sub-columns inside one side's text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ColumnCount {
    #[default]
    Single = 1,
    Double = 2,
}

impl ColumnCount {
    #[inline]
    pub fn get(self) -> usize {
        self as usize
    }
}

/// One language's content area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub side: Side,
    pub blocks: Vec<Block>,
}

impl Column {
    pub fn new(side: Side, blocks: Vec<Block>) -> Self {
        Self { side, blocks }
    }
}

/// One output slide: source column on the left, target on the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Font size in points, shared by both columns
    pub font_size: u32,
    pub source_columns: ColumnCount,
    pub target_columns: ColumnCount,
    /// Whether a visible truncation banner must be drawn
    pub truncated: bool,
    /// Always `[source, target]`
    pub columns: [Column; 2],
}

impl Slide {
    pub fn column(&self, side: Side) -> &Column {
        &self.columns[side.index()]
    }

    pub fn column_count(&self, side: Side) -> ColumnCount {
        match side {
            Side::Source => self.source_columns,
            Side::Target => self.target_columns,
        }
    }
}

/// A side whose content was truncated to fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub side: Side,
    /// Stable machine-readable code, `truncate_source` or `truncate_target`
    pub code: &'static str,
    pub message: String,
}

impl Warning {
    pub(crate) fn truncated(side: Side) -> Self {
        let code = match side {
            Side::Source => "truncate_source",
            Side::Target => "truncate_target",
        };
        Self {
            side,
            code,
            message: format!("{side} content does not fit on the slide and was truncated"),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
