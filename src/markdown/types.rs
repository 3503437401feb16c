//! Parsed slide content: blocks of styled runs.
use bitflags::bitflags;

/// Highlight classification of a block, derived from its leading glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    #[default]
    None,
    Star,
    Dot,
    Warn,
}

impl Marker {
    /// Glyph drawn in front of a marked paragraph.
    ///
    /// This is fixed per marker and independent of the configured
    /// detection prefix.
    pub fn display_glyph(self) -> Option<&'static str> {
        match self {
            Marker::None => None,
            Marker::Star => Some("★ "),
            Marker::Dot => Some("● "),
            Marker::Warn => Some("▲ "),
        }
    }
}

bitflags! {
    /// Inline style flags carried by a [`Run`].
    ///
    /// The flags are independent: a run can be strong and a formula at
    /// the same time when the source toggles overlap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RunStyle: u8 {
        /// `**strong**`
        const STRONG = 1;
        /// `*light*`
        const LIGHT = 1 << 1;
        /// formula delimiter pair
        const FORMULA = 1 << 2;
    }
}

/// The smallest styled unit of text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// An unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::empty())
    }

    #[inline]
    pub fn is_strong(&self) -> bool {
        self.style.contains(RunStyle::STRONG)
    }

    #[inline]
    pub fn is_light(&self) -> bool {
        self.style.contains(RunStyle::LIGHT)
    }

    #[inline]
    pub fn is_formula(&self) -> bool {
        self.style.contains(RunStyle::FORMULA)
    }

    /// Number of Unicode scalar values in the run text.
    #[inline]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// One non-blank source line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub marker: Marker,
    pub runs: Vec<Run>,
}

impl Block {
    pub fn new(marker: Marker, runs: Vec<Run>) -> Self {
        Self { marker, runs }
    }

    /// Concatenated text of all runs, without style.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Number of characters across all runs.
    pub fn char_count(&self) -> usize {
        self.runs.iter().map(Run::char_count).sum()
    }
}
