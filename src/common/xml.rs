//! XML text escaping.
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Built once; the pattern set is fixed.
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape the five XML special characters for use in text content.
///
/// Slide text is user content and may contain any of them, e.g. `a < b`
/// inside a formula run. Characters XML 1.0 cannot carry (C0 controls
/// other than tab, newline and carriage return, U+FFFE, U+FFFF) become
/// U+FFFD.
///
/// # Examples
///
/// ```
/// use bideck::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("$x<y$"), "$x&lt;y$");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    let escaped = XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"]);
    if !escaped.chars().any(is_restricted) {
        return escaped;
    }
    escaped
        .chars()
        .map(|c| if is_restricted(c) { char::REPLACEMENT_CHARACTER } else { c })
        .collect()
}

#[inline]
fn is_restricted(c: char) -> bool {
    (c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')) || matches!(c, '\u{FFFE}' | '\u{FFFF}')
}
