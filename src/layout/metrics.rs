//! Capacity estimation.
//!
//! All lengths are inches. A line holds `column_width * 144 / font_size`
//! characters, i.e. a glyph is assumed to be half the font size wide.
//! A column holds `(height - 2 * padding) * 72 / (font_size * line_spacing)`
//! lines.
use crate::common::unit::POINTS_PER_INCH;
use crate::markdown::Block;

use super::types::{ColumnCount, Side};

/// Characters per inch of column width at a 1pt font.
const CHAR_WIDTH_FACTOR: f64 = 144.0;
/// Lower bound for the characters-per-line estimate.
const MIN_CHARS_PER_LINE: usize = 12;

const DEFAULT_WIDTH: f64 = 13.333;
const DEFAULT_HEIGHT: f64 = 7.5;
const DEFAULT_LEFT_RATIO: f64 = 0.5;
const DEFAULT_GAP: f64 = 0.2;
const DEFAULT_PADDING: f64 = 0.3;
const DEFAULT_BASE_SIZE: u32 = 20;
const DEFAULT_MIN_SIZE: u32 = 12;
const DEFAULT_LINE_SPACING: f64 = 1.2;

/// Slide canvas and column split, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideGeometry {
    pub width: f64,
    pub height: f64,
    /// Share of the usable width given to the source (left) column
    pub left_ratio: f64,
    /// Gap between the two language columns
    pub gap: f64,
    /// Padding on every slide edge
    pub padding: f64,
}

impl Default for SlideGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            left_ratio: DEFAULT_LEFT_RATIO,
            gap: DEFAULT_GAP,
            padding: DEFAULT_PADDING,
        }
    }
}

impl SlideGeometry {
    /// Replace unusable values with defaults.
    ///
    /// Gap and padding may be zero; negative values are reset.
    pub fn normalized(self) -> Self {
        let positive = |value: f64, default: f64| if value > 0.0 { value } else { default };
        let non_negative = |value: f64, default: f64| if value >= 0.0 { value } else { default };
        Self {
            width: positive(self.width, DEFAULT_WIDTH),
            height: positive(self.height, DEFAULT_HEIGHT),
            left_ratio: if self.left_ratio > 0.0 && self.left_ratio < 1.0 {
                self.left_ratio
            } else {
                DEFAULT_LEFT_RATIO
            },
            gap: non_negative(self.gap, DEFAULT_GAP),
            padding: non_negative(self.padding, DEFAULT_PADDING),
        }
    }

    /// Width shared by both language columns.
    pub fn usable_width(&self) -> f64 {
        let usable = self.width - 2.0 * self.padding - self.gap;
        if usable > 0.0 { usable } else { 10.0 }
    }

    /// Width of one side's text box before any sub-column split.
    pub fn side_width(&self, side: Side) -> f64 {
        let ratio = match side {
            Side::Source => self.left_ratio,
            Side::Target => 1.0 - self.left_ratio,
        };
        self.usable_width() * ratio
    }

    /// Height available for text.
    pub fn usable_height(&self) -> f64 {
        let usable = self.height - 2.0 * self.padding;
        if usable > 0.0 { usable } else { 6.0 }
    }

    /// Spacing between the two sub-columns of a split text box.
    pub fn inner_gap(&self) -> f64 {
        let inner = self.gap * 0.5;
        if inner > 0.0 { inner } else { 0.08 }
    }
}

/// Font size bounds and line spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    /// Starting (largest) font size in points
    pub base_size: u32,
    /// Smallest font size the fitter may choose
    pub min_size: u32,
    /// Line height as a multiple of the font size
    pub line_spacing: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            base_size: DEFAULT_BASE_SIZE,
            min_size: DEFAULT_MIN_SIZE,
            line_spacing: DEFAULT_LINE_SPACING,
        }
    }
}

impl Typography {
    /// Replace unusable values with defaults and keep `min_size <= base_size`.
    pub fn normalized(self) -> Self {
        let base_size = if self.base_size > 0 { self.base_size } else { DEFAULT_BASE_SIZE };
        let min_size = if self.min_size > 0 { self.min_size } else { DEFAULT_MIN_SIZE };
        Self {
            base_size,
            min_size: min_size.min(base_size),
            line_spacing: if self.line_spacing > 0.0 {
                self.line_spacing
            } else {
                DEFAULT_LINE_SPACING
            },
        }
    }
}

/// Everything the fitter needs to know about the slide.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitConfig {
    pub geometry: SlideGeometry,
    pub typography: Typography,
}

impl FitConfig {
    pub fn new(geometry: SlideGeometry, typography: Typography) -> Self {
        Self {
            geometry,
            typography,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            geometry: self.geometry.normalized(),
            typography: self.typography.normalized(),
        }
    }

    /// Lines that fit in one sub-column at `font_size`, at least 1.
    pub fn lines_per_column(&self, font_size: u32) -> usize {
        let line_height = font_size.max(1) as f64 * self.typography.line_spacing;
        let lines = (self.geometry.usable_height() * POINTS_PER_INCH / line_height).floor();
        (lines as usize).max(1)
    }

    /// Total lines a side can hold with `columns` sub-columns.
    pub fn capacity(&self, font_size: u32, columns: ColumnCount) -> usize {
        self.lines_per_column(font_size) * columns.get()
    }

    /// Estimated characters per line for one sub-column of `side`.
    pub fn chars_per_line(&self, font_size: u32, side: Side, columns: ColumnCount) -> usize {
        let mut width = self.geometry.side_width(side);
        if columns == ColumnCount::Double {
            width = (width - self.geometry.inner_gap()) / 2.0;
        }
        if width <= 0.0 {
            width = 2.5;
        }
        let chars = (width * CHAR_WIDTH_FACTOR / font_size.max(1) as f64).floor() as usize;
        chars.max(MIN_CHARS_PER_LINE)
    }

    /// Estimated lines used by `blocks`. Blocks without text take no space.
    pub fn estimate_lines(
        &self,
        blocks: &[Block],
        font_size: u32,
        side: Side,
        columns: ColumnCount,
    ) -> usize {
        let chars = self.chars_per_line(font_size, side, columns);
        blocks
            .iter()
            .map(|block| lines_for(block.char_count(), chars))
            .sum()
    }

    pub fn fits(&self, blocks: &[Block], font_size: u32, side: Side, columns: ColumnCount) -> bool {
        self.estimate_lines(blocks, font_size, side, columns) <= self.capacity(font_size, columns)
    }
}

/// Lines taken by a block of `chars` characters; empty blocks take none.
#[inline]
pub(crate) fn lines_for(chars: usize, chars_per_line: usize) -> usize {
    if chars == 0 {
        0
    } else {
        chars.div_ceil(chars_per_line.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{Marker, Run};

    #[test]
    fn test_default_capacity() {
        let config = FitConfig::default();
        // (7.5 - 0.6) * 72 / (20 * 1.2) = 20.7
        assert_eq!(config.lines_per_column(20), 20);
        // (7.5 - 0.6) * 72 / (12 * 1.2) = 34.5
        assert_eq!(config.lines_per_column(12), 34);
        assert_eq!(config.capacity(12, ColumnCount::Double), 68);
    }

    #[test]
    fn test_default_chars_per_line() {
        let config = FitConfig::default();
        // usable = 12.533, half = 6.2665; 6.2665 * 144 / 20 = 45.1
        assert_eq!(config.chars_per_line(20, Side::Source, ColumnCount::Single), 45);
        // (6.2665 - 0.1) / 2 * 144 / 12 = 36.999
        assert_eq!(config.chars_per_line(12, Side::Target, ColumnCount::Double), 36);
    }

    #[test]
    fn test_capacity_shrinks_as_font_grows() {
        let config = FitConfig::default();
        assert!(config.lines_per_column(30) < config.lines_per_column(12));
        assert!(
            config.chars_per_line(30, Side::Source, ColumnCount::Single)
                < config.chars_per_line(12, Side::Source, ColumnCount::Single)
        );
    }

    #[test]
    fn test_left_ratio_splits_width() {
        let geometry = SlideGeometry {
            left_ratio: 0.25,
            ..SlideGeometry::default()
        };
        let config = FitConfig::new(geometry, Typography::default());
        assert!(
            config.chars_per_line(12, Side::Source, ColumnCount::Single)
                < config.chars_per_line(12, Side::Target, ColumnCount::Single)
        );
    }

    #[test]
    fn test_chars_per_line_floor() {
        let geometry = SlideGeometry {
            width: 1.0,
            padding: 0.0,
            gap: 0.0,
            ..SlideGeometry::default()
        };
        let config = FitConfig::new(geometry, Typography::default()).normalized();
        assert_eq!(config.chars_per_line(72, Side::Source, ColumnCount::Double), 12);
    }

    #[test]
    fn test_estimate_lines_skips_empty_blocks() {
        let config = FitConfig::default();
        let blocks = vec![
            Block::new(Marker::None, vec![Run::plain("")]),
            Block::new(Marker::None, vec![Run::plain("a".repeat(46))]),
        ];
        assert_eq!(
            config.estimate_lines(&blocks, 20, Side::Source, ColumnCount::Single),
            2
        );
    }

    #[test]
    fn test_normalized_defaults() {
        let config = FitConfig::new(
            SlideGeometry {
                width: -1.0,
                height: 0.0,
                left_ratio: 1.5,
                gap: -0.1,
                padding: 0.0,
            },
            Typography {
                base_size: 0,
                min_size: 40,
                line_spacing: 0.0,
            },
        )
        .normalized();

        assert_eq!(config.geometry.width, DEFAULT_WIDTH);
        assert_eq!(config.geometry.height, DEFAULT_HEIGHT);
        assert_eq!(config.geometry.left_ratio, DEFAULT_LEFT_RATIO);
        assert_eq!(config.geometry.gap, DEFAULT_GAP);
        assert_eq!(config.geometry.padding, 0.0);
        assert_eq!(config.typography.base_size, DEFAULT_BASE_SIZE);
        assert_eq!(config.typography.min_size, DEFAULT_BASE_SIZE);
        assert_eq!(config.typography.line_spacing, DEFAULT_LINE_SPACING);
    }
}
