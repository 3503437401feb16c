//! sRGB color values as written into `a:srgbClr/@val`.

/// Normalizes a configured color to six upper-case hex digits.
///
/// A leading `#` and surrounding whitespace are ignored. Anything that is
/// not exactly six hex digits yields `fallback` unchanged.
///
/// # Examples
///
/// ```
/// use bideck::common::sanitize_hex;
/// assert_eq!(sanitize_hex("#ff8800", "000000"), "FF8800");
/// assert_eq!(sanitize_hex("red", "000000"), "000000");
/// ```
pub fn sanitize_hex(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();
    if digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        digits.to_ascii_uppercase()
    } else {
        fallback.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_valid() {
        assert_eq!(sanitize_hex("1f2937", "000000"), "1F2937");
        assert_eq!(sanitize_hex("  #ABCDEF ", "000000"), "ABCDEF");
    }

    #[test]
    fn test_sanitize_falls_back() {
        assert_eq!(sanitize_hex("", "8A6D1D"), "8A6D1D");
        assert_eq!(sanitize_hex("#FFF", "8A6D1D"), "8A6D1D");
        assert_eq!(sanitize_hex("GGGGGG", "8A6D1D"), "8A6D1D");
        assert_eq!(sanitize_hex("12345678", "8A6D1D"), "8A6D1D");
    }
}
