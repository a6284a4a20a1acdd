//! Numeric helpers for resampling and colour conversion.

/// Returns the resampled length for `len` pixels scaled by `factor`.
///
/// Rounds to the nearest integer and never returns zero.
pub(crate) fn scaled_len(len: usize, factor: f32) -> usize {
    let scaled = (len as f64 * f64::from(factor)).round();
    if scaled < 1.0 {
        1
    } else {
        scaled as usize
    }
}

/// Rounds a sample to the nearest integer and clamps it to `[0, 255]`.
pub(crate) fn round_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// ITU-R BT.601 luma with integer rounding.
pub(crate) fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    let sum = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((sum + 500) / 1000) as u8
}
