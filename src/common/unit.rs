//! Length unit conversions.
//!
//! Layout values are configured in inches; DrawingML positions are EMUs.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const POINTS_PER_INCH: f64 = 72.0;

/// Converts inches to EMUs, truncating toward zero.
#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64) as i64
}

/// Converts a whole point size to the hundredths-of-a-point used by `a:rPr/@sz`.
#[inline]
pub fn pt_to_centipoints(pt: u32) -> u32 {
    pt.saturating_mul(100)
}
