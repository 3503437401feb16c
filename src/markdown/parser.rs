//! Block and inline parser.
//!
//! Inline styling is a flat toggle machine: each recognized token flushes
//! the text collected since the previous token with the flags active at
//! that moment, then flips its own flag. Tokens are not required to be
//! balanced; an unterminated toggle styles the rest of the line.
use aho_corasick::{AhoCorasick, Anchored, BuildError, Input, MatchKind, StartKind};
use thiserror::Error;

use super::config::ParseOptions;
use super::types::{Block, Marker, Run, RunStyle};

/// List markers stripped from the start of a line, repeatedly.
const LIST_MARKERS: [&str; 3] = ["* ", "- ", "+ "];

/// Markers in detection priority order, matching the prefix pattern ids.
const MARKERS: [Marker; 3] = [Marker::Star, Marker::Dot, Marker::Warn];

/// Style toggled by each inline token, matching the token pattern ids.
/// `**` comes before the lone `*` so that it wins at the same position.
const TOKEN_STYLES: [RunStyle; 3] = [RunStyle::STRONG, RunStyle::FORMULA, RunStyle::LIGHT];

/// Error building the parser's matchers from the configured options.
#[derive(Error, Debug)]
#[error("invalid marker or delimiter configuration: {0}")]
pub struct ParseError(#[from] BuildError);

/// A reusable parser for one set of [`ParseOptions`].
#[derive(Debug, Clone)]
pub struct Parser {
    prefixes: AhoCorasick,
    tokens: AhoCorasick,
}

impl Parser {
    /// Build a parser. Empty option values fall back to their defaults.
    pub fn new(options: &ParseOptions) -> Result<Self, ParseError> {
        let options = options.normalized();

        let prefixes = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .start_kind(StartKind::Anchored)
            .build([
                &options.star_prefix,
                &options.dot_prefix,
                &options.warn_prefix,
            ])?;
        let tokens = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(["**", options.formula_delimiter.as_str(), "*"])?;

        Ok(Self { prefixes, tokens })
    }

    /// Parse raw document text into blocks, one per non-blank line.
    pub fn parse(&self, raw: &str) -> Vec<Block> {
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.parse_line(line))
            .collect()
    }

    fn parse_line(&self, line: &str) -> Block {
        let (marker, text) = self.split_marker(strip_list_markers(line.trim()));
        let mut runs = self.parse_inline(text);
        if runs.is_empty() {
            runs.push(Run::plain(text));
        }
        Block::new(marker, runs)
    }

    /// Detect a highlight prefix; otherwise strip a heading `#` run.
    fn split_marker<'a>(&self, line: &'a str) -> (Marker, &'a str) {
        let input = Input::new(line).anchored(Anchored::Yes);
        if let Some(found) = self.prefixes.find(input) {
            let marker = MARKERS[found.pattern().as_usize()];
            return (marker, line[found.end()..].trim());
        }
        if line.starts_with('#') {
            return (Marker::None, line.trim_start_matches('#').trim());
        }
        (Marker::None, line)
    }

    fn parse_inline(&self, text: &str) -> Vec<Run> {
        let mut runs = Vec::new();
        let mut style = RunStyle::empty();
        let mut cursor = 0;

        for token in self.tokens.find_iter(text) {
            push_run(&mut runs, &text[cursor..token.start()], style);
            style.toggle(TOKEN_STYLES[token.pattern().as_usize()]);
            cursor = token.end();
        }
        push_run(&mut runs, &text[cursor..], style);
        runs
    }
}

/// Parse `raw` with a one-off parser built from `options`.
pub fn parse(raw: &str, options: &ParseOptions) -> Result<Vec<Block>, ParseError> {
    Ok(Parser::new(options)?.parse(raw))
}

fn strip_list_markers(mut line: &str) -> &str {
    while let Some(rest) = LIST_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
    {
        line = rest.trim();
    }
    line
}

#[inline]
fn push_run(runs: &mut Vec<Run>, text: &str, style: RunStyle) {
    if !text.is_empty() {
        runs.push(Run::new(text, style));
    }
}
