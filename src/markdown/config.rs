/// Options controlling marker detection and inline formula recognition.
///
/// The prefixes are used for detection only. The glyph drawn on the slide
/// is fixed per [`Marker`](super::Marker) and does not depend on them.
///
/// # Examples
///
/// ```rust
/// use bideck::markdown::ParseOptions;
///
/// let options = ParseOptions::new()
///     .with_formula_delimiter("$$")
///     .with_star_prefix("!!");
/// assert_eq!(options.formula_delimiter, "$$");
/// assert_eq!(options.dot_prefix, "●");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Toggle token for inline formulas
    pub formula_delimiter: String,
    /// Leading glyph marking a star highlight line
    pub star_prefix: String,
    /// Leading glyph marking a dot highlight line
    pub dot_prefix: String,
    /// Leading glyph marking a warning line
    pub warn_prefix: String,
}

pub const DEFAULT_FORMULA_DELIMITER: &str = "$";
pub const DEFAULT_STAR_PREFIX: &str = "★";
pub const DEFAULT_DOT_PREFIX: &str = "●";
pub const DEFAULT_WARN_PREFIX: &str = "▲";

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            formula_delimiter: DEFAULT_FORMULA_DELIMITER.to_string(),
            star_prefix: DEFAULT_STAR_PREFIX.to_string(),
            dot_prefix: DEFAULT_DOT_PREFIX.to_string(),
            warn_prefix: DEFAULT_WARN_PREFIX.to_string(),
        }
    }
}

impl ParseOptions {
    /// Create options with the default glyphs and `$` as formula delimiter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formula_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.formula_delimiter = delimiter.into();
        self
    }

    pub fn with_star_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.star_prefix = prefix.into();
        self
    }

    pub fn with_dot_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dot_prefix = prefix.into();
        self
    }

    pub fn with_warn_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.warn_prefix = prefix.into();
        self
    }

    /// Replace empty values with their defaults.
    pub(crate) fn normalized(&self) -> Self {
        fn or_default(value: &str, default: &str) -> String {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        }

        Self {
            formula_delimiter: or_default(&self.formula_delimiter, DEFAULT_FORMULA_DELIMITER),
            star_prefix: or_default(&self.star_prefix, DEFAULT_STAR_PREFIX),
            dot_prefix: or_default(&self.dot_prefix, DEFAULT_DOT_PREFIX),
            warn_prefix: or_default(&self.warn_prefix, DEFAULT_WARN_PREFIX),
        }
    }
}
