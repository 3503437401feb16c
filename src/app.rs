//! `build` and `check` orchestration.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use tracing::debug;

use crate::common::{Error, Result};
use crate::config::Config;
use crate::discovery::{Pair, discover};
use crate::layout::{Side, fit};
use crate::markdown::Parser;
use crate::output::{SUFFIX_LEN, resolve_output_path};
use crate::pptx::{Deck, DeckWriter};

/// Inputs of a `build` run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory containing `EN/` and `CN/`
    pub source_dir: PathBuf,
    /// Output file or directory; empty for the working directory
    pub output: String,
    pub config_path: Option<PathBuf>,
    pub cwd: PathBuf,
    /// Used for the default file name and the document properties
    pub now: DateTime<Local>,
    /// Random bytes for the default file name suffix
    pub entropy: [u8; SUFFIX_LEN],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output_path: PathBuf,
    pub slide_count: usize,
    /// Discovery warnings followed by one line per truncated side
    pub warnings: Vec<String>,
    pub config_source: String,
}

/// Inputs of a `check` run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub source_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub cwd: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Pairs in slide order
    pub pairs: Vec<Pair>,
    pub warnings: Vec<String>,
    pub config_source: String,
}

/// Convert every document pair under `options.source_dir` into one deck.
pub fn build(options: &BuildOptions) -> Result<BuildReport> {
    let (config, config_source) = Config::load(options.config_path.as_deref(), &options.cwd)?;
    let output_path = resolve_output_path(&options.output, &options.cwd, &options.now, options.entropy)?;
    let (pairs, mut warnings) = find_pairs(&options.source_dir, &options.cwd, &config)?;

    let parser = Parser::new(&config.parse_options())?;
    let fit_config = config.fit_config();
    let mut slides = Vec::with_capacity(pairs.len());
    for (index, pair) in pairs.iter().enumerate() {
        let source = read_document(&pair.source_path)?;
        let target = read_document(&pair.target_path)?;
        let (slide, truncations) = fit(parser.parse(&source), parser.parse(&target), &fit_config);
        for warning in truncations {
            let path = match warning.side {
                Side::Source => &pair.source_path,
                Side::Target => &pair.target_path,
            };
            warnings.push(truncation_line(index + 1, path));
        }
        slides.push(slide);
    }

    let deck = Deck::new(slides)
        .with_geometry(config.geometry())
        .with_palette(config.palette())
        .with_font_family(config.font_family())
        .with_created(options.now.with_timezone(&Utc));
    DeckWriter::write(&output_path, &deck)?;

    Ok(BuildReport {
        output_path,
        slide_count: deck.slides.len(),
        warnings,
        config_source,
    })
}

/// Validate configuration and pairing without converting anything.
pub fn check(options: &CheckOptions) -> Result<CheckReport> {
    let (config, config_source) = Config::load(options.config_path.as_deref(), &options.cwd)?;
    let (pairs, warnings) = find_pairs(&options.source_dir, &options.cwd, &config)?;
    Ok(CheckReport {
        pairs,
        warnings,
        config_source,
    })
}

fn find_pairs(source_dir: &Path, cwd: &Path, config: &Config) -> Result<(Vec<Pair>, Vec<String>)> {
    let source_dir = cwd.join(source_dir);
    debug!(source = %source_dir.display(), "scanning for document pairs");
    let (pairs, mut warnings) = discover(&source_dir, &config.filename)?;
    if pairs.is_empty() {
        return Err(Error::NoDocuments(source_dir));
    }
    dedupe(&mut warnings);
    Ok((pairs, warnings))
}

/// Drop repeated lines, keeping the first occurrence of each.
fn dedupe(lines: &mut Vec<String>) {
    let mut seen = HashSet::new();
    lines.retain(|line| seen.insert(line.clone()));
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// `[  N] - <path> content truncated`
pub fn truncation_line(slide_no: usize, path: &Path) -> String {
    format!("[{slide_no:>3}] - {} content truncated", path.display())
}
