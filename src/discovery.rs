//! Pairing of source (`EN/`) and target (`CN/`) documents.
//!
//! Both trees are walked recursively. Every `.md` file name must match the
//! configured pattern, and every file must have a counterpart at the same
//! relative path in the other tree. Pairs come back in slide order.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::FilenameConfig;

/// Directory holding the source-language documents.
pub const SOURCE_DIR: &str = "EN";
/// Directory holding the target-language documents.
pub const TARGET_DIR: &str = "CN";

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("invalid file name pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A side directory is missing or unreadable
    #[error("failed to scan {}: {source}", root.display())]
    Scan {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("file name does not match the configured pattern: {0}")]
    Unmatched(String),

    /// A capture group is missing or not a number
    #[error("cannot read group {group} of {rel_path}: {message}")]
    Group {
        rel_path: String,
        group: usize,
        message: String,
    },

    /// Files without a counterpart in the other directory, sorted
    #[error("documents are not paired: {}", .0.join("; "))]
    Unpaired(Vec<String>),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// One source/target document pair, i.e. one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// Path relative to the side directories, `/`-separated
    pub rel_path: String,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub domain: u64,
    pub card: u64,
    pub side: String,
}

#[derive(Debug)]
struct Entry {
    path: PathBuf,
    domain: u64,
    card: u64,
    side: String,
}

/// Find and order all document pairs under `source`.
///
/// Returns the pairs and non-fatal warnings (skipped file names).
pub fn discover(source: &Path, config: &FilenameConfig) -> Result<(Vec<Pair>, Vec<String>)> {
    let pattern = Regex::new(&config.pattern)?;
    let mut warnings = Vec::new();
    let source_files = scan_side(&source.join(SOURCE_DIR), &pattern, config, &mut warnings)?;
    let mut target_files = scan_side(&source.join(TARGET_DIR), &pattern, config, &mut warnings)?;

    let mut unpaired: Vec<String> = source_files
        .keys()
        .filter(|rel| !target_files.contains_key(*rel))
        .map(|rel| format!("missing in {TARGET_DIR}: {rel}"))
        .chain(
            target_files
                .keys()
                .filter(|rel| !source_files.contains_key(*rel))
                .map(|rel| format!("missing in {SOURCE_DIR}: {rel}")),
        )
        .collect();
    if !unpaired.is_empty() {
        unpaired.sort();
        return Err(DiscoveryError::Unpaired(unpaired));
    }

    let mut pairs: Vec<Pair> = source_files
        .into_iter()
        .filter_map(|(rel_path, source)| {
            let target = target_files.remove(&rel_path)?;
            Some(Pair {
                rel_path,
                source_path: source.path,
                target_path: target.path,
                domain: source.domain,
                card: source.card,
                side: source.side,
            })
        })
        .collect();

    // Sides missing from `order.side` rank after every listed one.
    let rank = |side: &str| {
        config
            .order
            .side
            .iter()
            .position(|s| s == side)
            .unwrap_or(config.order.side.len())
    };
    pairs.sort_by(|a, b| {
        a.card
            .cmp(&b.card)
            .then_with(|| rank(&a.side).cmp(&rank(&b.side)))
            .then_with(|| a.domain.cmp(&b.domain))
            .then_with(|| a.rel_path.cmp(&b.rel_path))
    });

    debug!(pairs = pairs.len(), skipped = warnings.len(), "discovered documents");
    Ok((pairs, warnings))
}

fn scan_side(
    root: &Path,
    pattern: &Regex,
    config: &FilenameConfig,
    warnings: &mut Vec<String>,
) -> Result<BTreeMap<String, Entry>> {
    let mut entries = BTreeMap::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoveryError::Scan {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() || !is_markdown(entry.path()) {
            continue;
        }

        let rel_path = relative_key(root, entry.path());
        let name = entry.file_name().to_string_lossy();
        let Some(captures) = pattern.captures(&name) else {
            if config.ignore_unmatched {
                debug!(file = %rel_path, "skipping file that does not match the name pattern");
                warnings.push(format!("skipped file not matching the name pattern: {rel_path}"));
                continue;
            }
            return Err(DiscoveryError::Unmatched(rel_path));
        };

        let groups = config.groups;
        let domain = number_group(&captures, groups.domain, &rel_path)?;
        let card = number_group(&captures, groups.card, &rel_path)?;
        let side = text_group(&captures, groups.side, &rel_path)?.to_string();
        entries.insert(
            rel_path,
            Entry {
                path: entry.into_path(),
                domain,
                card,
                side,
            },
        );
    }
    Ok(entries)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn text_group<'h>(captures: &Captures<'h>, group: usize, rel_path: &str) -> Result<&'h str> {
    captures
        .get(group)
        .filter(|_| group > 0)
        .map(|m| m.as_str())
        .ok_or_else(|| DiscoveryError::Group {
            rel_path: rel_path.to_string(),
            group,
            message: "no such capture group".to_string(),
        })
}

fn number_group(captures: &Captures<'_>, group: usize, rel_path: &str) -> Result<u64> {
    text_group(captures, group, rel_path)?
        .parse()
        .map_err(|e: std::num::ParseIntError| DiscoveryError::Group {
            rel_path: rel_path.to_string(),
            group,
            message: e.to_string(),
        })
}
