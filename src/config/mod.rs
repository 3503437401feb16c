//! YAML configuration.
//!
//! Lookup order for [`Config::load`]: an explicit path, then `bideck.yaml`
//! in the working directory, then the embedded default. Every field is
//! optional; missing or unusable values fall back to the defaults below,
//! which match the embedded `default.yaml`.
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::common::sanitize_hex;
use crate::layout::{FitConfig, SlideGeometry, Typography};
use crate::markdown::ParseOptions;
use crate::pptx::StylePalette;

/// File looked up in the working directory when no path is given.
pub const PROJECT_CONFIG: &str = "bideck.yaml";

/// Source label of the built-in configuration.
pub const EMBEDDED_SOURCE: &str = "embedded:default.yaml";

const EMBEDDED_DEFAULT: &str = include_str!("default.yaml");

const DEFAULT_PATTERN: &str = r"^(\d+)-(\d{3})-(Front|Back)\.md$";

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists (or was named) but cannot be read
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid YAML for this schema
    #[error("cannot parse config {source_name}: {message}")]
    Parse { source_name: String, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub filename: FilenameConfig,
    pub layout: LayoutConfig,
    pub styles: StylesConfig,
}

/// How source file names are matched and ordered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilenameConfig {
    /// Regular expression matched against the bare file name
    pub pattern: String,
    pub groups: FilenameGroups,
    pub order: FilenameOrder,
    /// Skip non-matching `.md` files with a warning instead of failing
    pub ignore_unmatched: bool,
}

impl Default for FilenameConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            groups: FilenameGroups::default(),
            order: FilenameOrder::default(),
            ignore_unmatched: false,
        }
    }
}

/// 1-based capture group indices into [`FilenameConfig::pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilenameGroups {
    pub domain: usize,
    pub card: usize,
    pub side: usize,
}

impl Default for FilenameGroups {
    fn default() -> Self {
        Self {
            domain: 1,
            card: 2,
            side: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilenameOrder {
    /// Side values in slide order; unknown sides sort by domain only
    pub side: Vec<String>,
}

impl Default for FilenameOrder {
    fn default() -> Self {
        Self {
            side: vec!["Front".to_string(), "Back".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct LayoutConfig {
    pub slide: SlideSize,
    pub columns: ColumnsConfig,
    pub typography: TypographyConfig,
}

/// Slide size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SlideSize {
    pub width: f64,
    pub height: f64,
}

impl Default for SlideSize {
    fn default() -> Self {
        let geometry = SlideGeometry::default();
        Self {
            width: geometry.width,
            height: geometry.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub left_ratio: f64,
    pub gap: f64,
    pub padding: f64,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        let geometry = SlideGeometry::default();
        Self {
            left_ratio: geometry.left_ratio,
            gap: geometry.gap,
            padding: geometry.padding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypographyConfig {
    pub font_family: String,
    /// Points; values `<= 0` fall back to the default
    pub base_size: i64,
    pub min_size: i64,
    pub line_spacing: f64,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        let typography = Typography::default();
        Self {
            font_family: crate::pptx::deck::DEFAULT_FONT_FAMILY.to_string(),
            base_size: typography.base_size.into(),
            min_size: typography.min_size.into(),
            line_spacing: typography.line_spacing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Text color of unmarked blocks
    pub base_color: String,
    pub markers: MarkerSet,
    pub inline_formula: InlineFormulaStyle,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            base_color: StylePalette::default().base,
            markers: MarkerSet::default(),
            inline_formula: InlineFormulaStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkerSet {
    pub star: MarkerStyle,
    pub dot: MarkerStyle,
    pub warn: MarkerStyle,
}

impl Default for MarkerSet {
    fn default() -> Self {
        let palette = StylePalette::default();
        let options = ParseOptions::default();
        Self {
            star: MarkerStyle::new(options.star_prefix, palette.star),
            dot: MarkerStyle::new(options.dot_prefix, palette.dot),
            warn: MarkerStyle::new(options.warn_prefix, palette.warn),
        }
    }
}

/// Detection prefix and text color of one marker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct MarkerStyle {
    pub prefix: String,
    pub color: String,
}

impl MarkerStyle {
    fn new(prefix: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InlineFormulaStyle {
    pub delimiter: String,
    pub color: String,
    pub highlight: String,
}

impl Default for InlineFormulaStyle {
    fn default() -> Self {
        let palette = StylePalette::default();
        Self {
            delimiter: ParseOptions::default().formula_delimiter,
            color: palette.formula,
            highlight: palette.formula_highlight,
        }
    }
}

impl Config {
    /// Load the configuration for a run started in `cwd`.
    ///
    /// Returns the configuration and a label naming where it came from:
    /// the resolved file path, or [`EMBEDDED_SOURCE`].
    pub fn load(path_arg: Option<&Path>, cwd: &Path) -> Result<(Config, String)> {
        let (raw, source) = match path_arg {
            Some(path) => {
                let path = cwd.join(path);
                (read(&path)?, path.display().to_string())
            },
            None => {
                let project = cwd.join(PROJECT_CONFIG);
                if project.is_file() {
                    (read(&project)?, project.display().to_string())
                } else {
                    (EMBEDDED_DEFAULT.to_string(), EMBEDDED_SOURCE.to_string())
                }
            },
        };
        debug!(source = %source, "loading configuration");
        let config = Self::from_yaml(&raw, &source)?;
        Ok((config, source))
    }

    /// The built-in configuration.
    pub fn embedded() -> Result<Config> {
        Self::from_yaml(EMBEDDED_DEFAULT, EMBEDDED_SOURCE)
    }

    /// Parse YAML text and apply defaults. `source_name` labels errors.
    pub fn from_yaml(raw: &str, source_name: &str) -> Result<Config> {
        let mut config: Config = if raw.trim().is_empty() {
            Config::default()
        } else {
            serde_saphyr::from_str(raw).map_err(|e| ConfigError::Parse {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?
        };
        config.apply_defaults();
        Ok(config)
    }

    /// Replace empty, non-positive and out-of-range values with defaults.
    pub fn apply_defaults(&mut self) {
        let defaults = Config::default();

        let filename = &mut self.filename;
        if filename.pattern.trim().is_empty() {
            filename.pattern = defaults.filename.pattern;
        }
        let groups = defaults.filename.groups;
        reset_zero(&mut filename.groups.domain, groups.domain);
        reset_zero(&mut filename.groups.card, groups.card);
        reset_zero(&mut filename.groups.side, groups.side);
        if filename.order.side.is_empty() {
            filename.order.side = defaults.filename.order.side;
        }

        let layout = &mut self.layout;
        reset_non_positive(&mut layout.slide.width, defaults.layout.slide.width);
        reset_non_positive(&mut layout.slide.height, defaults.layout.slide.height);
        if !(layout.columns.left_ratio > 0.0 && layout.columns.left_ratio < 1.0) {
            layout.columns.left_ratio = defaults.layout.columns.left_ratio;
        }
        reset_non_positive(&mut layout.columns.gap, defaults.layout.columns.gap);
        reset_non_positive(&mut layout.columns.padding, defaults.layout.columns.padding);
        let typography = &mut layout.typography;
        reset_blank(&mut typography.font_family, defaults.layout.typography.font_family);
        reset_non_positive_int(&mut typography.base_size, defaults.layout.typography.base_size);
        reset_non_positive_int(&mut typography.min_size, defaults.layout.typography.min_size);
        typography.min_size = typography.min_size.min(typography.base_size);
        reset_non_positive(&mut typography.line_spacing, defaults.layout.typography.line_spacing);

        let styles = &mut self.styles;
        let markers = defaults.styles.markers;
        reset_blank(&mut styles.markers.star.prefix, markers.star.prefix);
        reset_blank(&mut styles.markers.dot.prefix, markers.dot.prefix);
        reset_blank(&mut styles.markers.warn.prefix, markers.warn.prefix);
        reset_blank(&mut styles.markers.star.color, markers.star.color);
        reset_blank(&mut styles.markers.dot.color, markers.dot.color);
        reset_blank(&mut styles.markers.warn.color, markers.warn.color);
        reset_blank(&mut styles.base_color, defaults.styles.base_color);
        let formula = defaults.styles.inline_formula;
        reset_blank(&mut styles.inline_formula.delimiter, formula.delimiter);
        reset_blank(&mut styles.inline_formula.color, formula.color);
        reset_blank(&mut styles.inline_formula.highlight, formula.highlight);
    }

    /// Parser options: marker detection prefixes and the formula delimiter.
    pub fn parse_options(&self) -> ParseOptions {
        let markers = &self.styles.markers;
        ParseOptions::new()
            .with_formula_delimiter(self.styles.inline_formula.delimiter.as_str())
            .with_star_prefix(markers.star.prefix.as_str())
            .with_dot_prefix(markers.dot.prefix.as_str())
            .with_warn_prefix(markers.warn.prefix.as_str())
    }

    pub fn geometry(&self) -> SlideGeometry {
        let layout = &self.layout;
        SlideGeometry {
            width: layout.slide.width,
            height: layout.slide.height,
            left_ratio: layout.columns.left_ratio,
            gap: layout.columns.gap,
            padding: layout.columns.padding,
        }
    }

    pub fn fit_config(&self) -> FitConfig {
        let typography = &self.layout.typography;
        FitConfig::new(
            self.geometry(),
            Typography {
                base_size: points(typography.base_size),
                min_size: points(typography.min_size),
                line_spacing: typography.line_spacing,
            },
        )
    }

    /// Display colors; invalid hex values fall back to the defaults.
    pub fn palette(&self) -> StylePalette {
        let defaults = StylePalette::default();
        let styles = &self.styles;
        StylePalette {
            base: sanitize_hex(&styles.base_color, &defaults.base),
            star: sanitize_hex(&styles.markers.star.color, &defaults.star),
            dot: sanitize_hex(&styles.markers.dot.color, &defaults.dot),
            warn: sanitize_hex(&styles.markers.warn.color, &defaults.warn),
            formula: sanitize_hex(&styles.inline_formula.color, &defaults.formula),
            formula_highlight: sanitize_hex(&styles.inline_formula.highlight, &defaults.formula_highlight),
        }
    }

    pub fn font_family(&self) -> &str {
        &self.layout.typography.font_family
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[inline]
fn reset_zero<T: Default + PartialEq>(value: &mut T, default: T) {
    if *value == T::default() {
        *value = default;
    }
}

#[inline]
fn reset_non_positive(value: &mut f64, default: f64) {
    if !(*value > 0.0) {
        *value = default;
    }
}

#[inline]
fn reset_non_positive_int(value: &mut i64, default: i64) {
    if *value <= 0 {
        *value = default;
    }
}

/// Font size in whole points, saturating at the `u32` range.
#[inline]
fn points(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[inline]
fn reset_blank(value: &mut String, default: String) {
    if value.trim().is_empty() {
        *value = default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_embedded_matches_defaults() {
        assert_eq!(Config::embedded().unwrap(), Config::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = "layout:\n  typography:\n    base_size: 28\nstyles:\n  markers:\n    star:\n      prefix: '!!'\n";
        let config = Config::from_yaml(yaml, "test").unwrap();
        assert_eq!(config.layout.typography.base_size, 28);
        assert_eq!(config.layout.typography.min_size, 12);
        assert_eq!(config.styles.markers.star.prefix, "!!");
        assert_eq!(config.styles.markers.star.color, "8A6D1D");
        assert_eq!(config.filename, FilenameConfig::default());
    }

    #[test]
    fn test_unusable_values_fall_back() {
        let yaml = concat!(
            "filename:\n  pattern: ''\n  groups:\n    card: 0\n  order:\n    side: []\n",
            "layout:\n  slide:\n    width: -3\n  columns:\n    left_ratio: 1.5\n    gap: 0\n",
            "  typography:\n    font_family: ' '\n    base_size: 14\n    min_size: 18\n",
            "styles:\n  inline_formula:\n    delimiter: ''\n",
        );
        let config = Config::from_yaml(yaml, "test").unwrap();
        let defaults = Config::default();
        assert_eq!(config.filename.pattern, DEFAULT_PATTERN);
        assert_eq!(config.filename.groups.card, 2);
        assert_eq!(config.filename.order.side, defaults.filename.order.side);
        assert_eq!(config.layout.slide.width, 13.333);
        assert_eq!(config.layout.columns.left_ratio, 0.5);
        assert_eq!(config.layout.columns.gap, 0.2);
        assert_eq!(config.layout.typography.font_family, "Calibri");
        assert_eq!(config.layout.typography.min_size, 14);
        assert_eq!(config.styles.inline_formula.delimiter, "$");
    }

    #[test]
    fn test_blank_colors_fall_back() {
        let yaml = concat!(
            "styles:\n  base_color: ''\n  markers:\n    dot:\n      color: ' '\n",
            "  inline_formula:\n    color: ''\n    highlight: ''\n",
        );
        let config = Config::from_yaml(yaml, "test").unwrap();
        let defaults = Config::default();
        assert_eq!(config.styles.base_color, "1F2937");
        assert_eq!(config.styles.markers, defaults.styles.markers);
        assert_eq!(config.styles.inline_formula, defaults.styles.inline_formula);
    }

    #[test]
    fn test_negative_font_sizes_fall_back() {
        let yaml = "layout:\n  typography:\n    base_size: -4\n    min_size: -1\n";
        let config = Config::from_yaml(yaml, "test").unwrap();
        assert_eq!(config.layout.typography.base_size, 20);
        assert_eq!(config.layout.typography.min_size, 12);
        assert_eq!(config.fit_config().typography, Typography::default());
    }

    #[test]
    fn test_palette_sanitizes_colors() {
        let yaml = "styles:\n  base_color: '#112233'\n  markers:\n    warn:\n      color: orange\n";
        let palette = Config::from_yaml(yaml, "test").unwrap().palette();
        assert_eq!(palette.base, "112233");
        assert_eq!(palette.warn, "9A3412");
        assert_eq!(palette.formula_highlight, "FFF176");
    }

    #[test]
    fn test_projections() {
        let config = Config::default();
        assert_eq!(config.fit_config(), FitConfig::default());
        assert_eq!(config.parse_options(), ParseOptions::default());
        assert_eq!(config.palette(), StylePalette::default());
        assert_eq!(config.font_family(), "Calibri");
    }

    #[test]
    fn test_invalid_yaml_names_source() {
        let err = Config::from_yaml("layout: [unclosed", "custom.yaml").unwrap_err();
        match err {
            ConfigError::Parse { source_name, .. } => assert_eq!(source_name, "custom.yaml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_precedence() {
        let dir = tempfile::tempdir().unwrap();

        let (config, source) = Config::load(None, dir.path()).unwrap();
        assert_eq!(source, EMBEDDED_SOURCE);
        assert_eq!(config, Config::default());

        fs::write(dir.path().join(PROJECT_CONFIG), "layout:\n  typography:\n    base_size: 30\n").unwrap();
        let (config, source) = Config::load(None, dir.path()).unwrap();
        assert!(source.ends_with(PROJECT_CONFIG));
        assert_eq!(config.layout.typography.base_size, 30);

        fs::write(dir.path().join("other.yaml"), "layout:\n  typography:\n    base_size: 16\n").unwrap();
        let (config, source) = Config::load(Some(Path::new("other.yaml")), dir.path()).unwrap();
        assert!(source.ends_with("other.yaml"));
        assert_eq!(config.layout.typography.base_size, 16);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(Path::new("missing.yaml")), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { ref path, .. } if path.ends_with("missing.yaml")));
    }
}
