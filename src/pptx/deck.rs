//! The aggregate handed to the package synthesizer.
use chrono::{DateTime, Utc};

use crate::common::sanitize_hex;
use crate::layout::{Slide, SlideGeometry};
use crate::markdown::Marker;

pub const DEFAULT_FONT_FAMILY: &str = "Calibri";
pub const DEFAULT_SOURCE_LANG: &str = "en-US";
pub const DEFAULT_TARGET_LANG: &str = "zh-CN";

const DEFAULT_BASE_COLOR: &str = "1F2937";
const DEFAULT_STAR_COLOR: &str = "8A6D1D";
const DEFAULT_DOT_COLOR: &str = "1F2937";
const DEFAULT_WARN_COLOR: &str = "9A3412";
const DEFAULT_FORMULA_COLOR: &str = "111827";
const DEFAULT_FORMULA_HIGHLIGHT: &str = "FFF176";

/// Display colors as six hex digits, without `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePalette {
    /// Text of unmarked blocks
    pub base: String,
    pub star: String,
    pub dot: String,
    pub warn: String,
    /// Text of formula runs
    pub formula: String,
    /// Background behind formula runs
    pub formula_highlight: String,
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_COLOR.to_string(),
            star: DEFAULT_STAR_COLOR.to_string(),
            dot: DEFAULT_DOT_COLOR.to_string(),
            warn: DEFAULT_WARN_COLOR.to_string(),
            formula: DEFAULT_FORMULA_COLOR.to_string(),
            formula_highlight: DEFAULT_FORMULA_HIGHLIGHT.to_string(),
        }
    }
}

impl StylePalette {
    /// Sanitize every color, silently replacing invalid ones with the defaults.
    pub fn normalized(&self) -> Self {
        Self {
            base: sanitize_hex(&self.base, DEFAULT_BASE_COLOR),
            star: sanitize_hex(&self.star, DEFAULT_STAR_COLOR),
            dot: sanitize_hex(&self.dot, DEFAULT_DOT_COLOR),
            warn: sanitize_hex(&self.warn, DEFAULT_WARN_COLOR),
            formula: sanitize_hex(&self.formula, DEFAULT_FORMULA_COLOR),
            formula_highlight: sanitize_hex(&self.formula_highlight, DEFAULT_FORMULA_HIGHLIGHT),
        }
    }

    /// Foreground color of non-formula text in a block with `marker`.
    pub fn text_color(&self, marker: Marker) -> &str {
        match marker {
            Marker::None => &self.base,
            Marker::Star => &self.star,
            Marker::Dot => &self.dot,
            Marker::Warn => &self.warn,
        }
    }
}

/// Ordered slides plus everything needed to render them.
#[derive(Debug, Clone)]
pub struct Deck {
    pub slides: Vec<Slide>,
    pub geometry: SlideGeometry,
    pub palette: StylePalette,
    pub font_family: String,
    /// Language tag of the left column's text
    pub source_lang: String,
    /// Language tag of the right column's text
    pub target_lang: String,
    /// Creation and modification time recorded in the core properties
    pub created: DateTime<Utc>,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            geometry: SlideGeometry::default(),
            palette: StylePalette::default(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            created: Utc::now(),
        }
    }

    pub fn with_geometry(mut self, geometry: SlideGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_palette(mut self, palette: StylePalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    pub fn with_languages(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_lang = source.into();
        self.target_lang = target.into();
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Rendering settings with unusable values replaced by defaults.
    pub(crate) fn style(&self) -> DeckStyle {
        let or_default = |value: &str, default: &str| {
            let value = value.trim();
            if value.is_empty() { default.to_string() } else { value.to_string() }
        };
        DeckStyle {
            geometry: self.geometry.normalized(),
            palette: self.palette.normalized(),
            font_family: or_default(&self.font_family, DEFAULT_FONT_FAMILY),
            source_lang: or_default(&self.source_lang, DEFAULT_SOURCE_LANG),
            target_lang: or_default(&self.target_lang, DEFAULT_TARGET_LANG),
        }
    }
}

/// Sanitized per-deck settings shared by every slide.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DeckStyle {
    pub geometry: SlideGeometry,
    pub palette: StylePalette,
    pub font_family: String,
    pub source_lang: String,
    pub target_lang: String,
}
