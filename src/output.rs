//! Output path resolution.
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use thiserror::Error;

const SUFFIX_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Number of random characters in a default file name.
pub const SUFFIX_LEN: usize = 6;
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("cannot resolve an output path without a working directory")]
    NoWorkingDirectory,
}

pub type Result<T> = std::result::Result<T, OutputError>;

/// Resolve where the package is written.
///
/// - empty `arg`: `cwd/<default name>`
/// - `arg` ending in `.pptx` (any case): that file, relative to `cwd`
/// - anything else: a directory, `arg/<default name>`
///
/// The default name is `YYYYMMDD_HHMMSS_XXXXXX.pptx`, with the suffix
/// derived from `entropy`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use chrono::{TimeZone, Utc};
/// use bideck::output::resolve_output_path;
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
/// let path = resolve_output_path("", Path::new("/work"), &now, *b"abc123").unwrap();
/// assert_eq!(path, Path::new("/work/20250304_050607_ABC123.pptx"));
/// ```
pub fn resolve_output_path<Tz>(
    arg: &str,
    cwd: &Path,
    now: &DateTime<Tz>,
    entropy: [u8; SUFFIX_LEN],
) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if cwd.as_os_str().is_empty() {
        return Err(OutputError::NoWorkingDirectory);
    }

    let arg = arg.trim();
    if arg.is_empty() {
        return Ok(cwd.join(default_name(now, entropy)));
    }
    if arg.to_ascii_lowercase().ends_with(".pptx") {
        return Ok(cwd.join(arg));
    }
    Ok(cwd.join(arg).join(default_name(now, entropy)))
}

/// `YYYYMMDD_HHMMSS_XXXXXX.pptx` for `now` and `entropy`.
pub fn default_name<Tz>(now: &DateTime<Tz>, entropy: [u8; SUFFIX_LEN]) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let suffix: String = entropy.iter().map(|&b| suffix_char(b)).collect();
    format!("{}_{suffix}.pptx", now.format(TIMESTAMP_FORMAT))
}

/// Maps a byte into `[A-Z0-9]`: lower-case letters are upper-cased,
/// characters already in the alphabet are kept, anything else is reduced
/// modulo the alphabet size.
fn suffix_char(byte: u8) -> char {
    let upper = byte.to_ascii_uppercase();
    if SUFFIX_ALPHABET.contains(&upper) {
        upper as char
    } else {
        SUFFIX_ALPHABET[byte as usize % SUFFIX_ALPHABET.len()] as char
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap()
    }

    #[test]
    fn test_default_name_in_cwd() {
        let path = resolve_output_path("  ", Path::new("/tmp/work"), &now(), *b"AZ09az").unwrap();
        assert_eq!(path, Path::new("/tmp/work/20241231_235958_AZ09AZ.pptx"));
    }

    #[test]
    fn test_explicit_file() {
        let cwd = Path::new("/tmp/work");
        assert_eq!(
            resolve_output_path("out/Deck.PPTX", cwd, &now(), [0; 6]).unwrap(),
            Path::new("/tmp/work/out/Deck.PPTX")
        );
        assert_eq!(
            resolve_output_path("/abs/deck.pptx", cwd, &now(), [0; 6]).unwrap(),
            Path::new("/abs/deck.pptx")
        );
    }

    #[test]
    fn test_directory_argument() {
        let path = resolve_output_path("decks", Path::new("/tmp/work"), &now(), [0; 6]).unwrap();
        // 0 % 36 = 0 -> 'A'
        assert_eq!(path, Path::new("/tmp/work/decks/20241231_235958_AAAAAA.pptx"));
    }

    #[test]
    fn test_suffix_mapping() {
        assert_eq!(suffix_char(b'q'), 'Q');
        assert_eq!(suffix_char(b'7'), '7');
        assert_eq!(suffix_char(b'-'), SUFFIX_ALPHABET[45 % 36] as char);
        assert_eq!(suffix_char(255), SUFFIX_ALPHABET[255 % 36] as char);
    }

    #[test]
    fn test_empty_cwd_is_an_error() {
        assert!(resolve_output_path("", Path::new(""), &now(), [0; 6]).is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_suffix_is_alphanumeric(entropy in any::<[u8; 6]>()) {
                let name = default_name(&now(), entropy);
                let suffix = &name[16..22];
                prop_assert!(suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
                prop_assert!(name.ends_with(".pptx"));
            }
        }
    }
}
