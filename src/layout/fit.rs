//! Font size search, per-side column split, and truncation.
use tracing::{debug, warn};

use crate::markdown::{Block, Marker, Run, RunStyle};

use super::metrics::{FitConfig, lines_for};
use super::types::{Column, ColumnCount, Side, Slide, Warning};

/// Text of the synthetic block appended to a truncated column.
pub const TRUNCATION_NOTICE: &str = "[content truncated]";

const ELLIPSIS: &str = " ...";

/// Fit one document pair onto a slide.
///
/// The font size starts at the base size and shrinks until both sides fit
/// in a single column or the minimum size is reached. Each side that still
/// overflows a single column gets a second one; a side that overflows even
/// then is truncated and reported in the returned warnings.
pub fn fit(source: Vec<Block>, target: Vec<Block>, config: &FitConfig) -> (Slide, Vec<Warning>) {
    let config = config.normalized();
    let font_size = choose_font_size(&source, &target, &config);

    let source_columns = column_count(&source, Side::Source, font_size, &config);
    let target_columns = column_count(&target, Side::Target, font_size, &config);

    let mut warnings = Vec::new();
    let source = settle(source, Side::Source, font_size, source_columns, &config, &mut warnings);
    let target = settle(target, Side::Target, font_size, target_columns, &config, &mut warnings);

    debug!(
        font_size,
        source_columns = source_columns.get(),
        target_columns = target_columns.get(),
        truncated = !warnings.is_empty(),
        "fitted slide"
    );

    let slide = Slide {
        font_size,
        source_columns,
        target_columns,
        truncated: !warnings.is_empty(),
        columns: [
            Column::new(Side::Source, source),
            Column::new(Side::Target, target),
        ],
    };
    (slide, warnings)
}

fn choose_font_size(source: &[Block], target: &[Block], config: &FitConfig) -> u32 {
    let mut font_size = config.typography.base_size;
    while font_size > config.typography.min_size {
        let both_fit = config.fits(source, font_size, Side::Source, ColumnCount::Single)
            && config.fits(target, font_size, Side::Target, ColumnCount::Single);
        if both_fit {
            break;
        }
        font_size -= 1;
    }
    font_size
}

fn column_count(blocks: &[Block], side: Side, font_size: u32, config: &FitConfig) -> ColumnCount {
    if config.fits(blocks, font_size, side, ColumnCount::Single) {
        ColumnCount::Single
    } else {
        ColumnCount::Double
    }
}

fn settle(
    blocks: Vec<Block>,
    side: Side,
    font_size: u32,
    columns: ColumnCount,
    config: &FitConfig,
    warnings: &mut Vec<Warning>,
) -> Vec<Block> {
    if config.fits(&blocks, font_size, side, columns) {
        return blocks;
    }

    let capacity = config.capacity(font_size, columns);
    let chars_per_line = config.chars_per_line(font_size, side, columns);
    warn!(side = %side, font_size, capacity, "content overflows, truncating");
    warnings.push(Warning::truncated(side));
    truncate(blocks, capacity, chars_per_line)
}

/// Keep whole blocks while they fit, clip the first overflowing one to the
/// remaining line budget, then append the truncation notice.
fn truncate(blocks: Vec<Block>, capacity: usize, chars_per_line: usize) -> Vec<Block> {
    let mut kept = Vec::with_capacity(blocks.len() + 1);
    let mut used = 0;

    for block in blocks {
        let needed = lines_for(block.char_count(), chars_per_line);
        if needed == 0 {
            continue;
        }
        if used + needed <= capacity {
            used += needed;
            kept.push(block);
            continue;
        }

        let remaining = capacity - used;
        if remaining > 0 {
            let runs = clip_runs(block.runs, remaining * chars_per_line);
            kept.push(Block::new(block.marker, runs));
        }
        break;
    }

    kept.push(Block::new(
        Marker::Warn,
        vec![Run::new(TRUNCATION_NOTICE, RunStyle::STRONG)],
    ));
    kept
}

/// Clip runs to `max_chars` characters and end the last one with an ellipsis.
fn clip_runs(runs: Vec<Run>, max_chars: usize) -> Vec<Run> {
    let mut clipped = Vec::with_capacity(runs.len());
    let mut remaining = max_chars;

    for mut run in runs {
        if remaining == 0 {
            break;
        }
        let count = run.char_count();
        if count > remaining {
            if let Some((cut, _)) = run.text.char_indices().nth(remaining) {
                run.text.truncate(cut);
            }
            remaining = 0;
        } else {
            remaining -= count;
        }
        clipped.push(run);
    }

    match clipped.last_mut() {
        Some(last) => last.text = format!("{}{ELLIPSIS}", last.text.trim()),
        None => clipped.push(Run::plain(ELLIPSIS.trim_start())),
    }
    clipped
}
