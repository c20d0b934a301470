//! Gamma lookup table access functions
//!
//! Decoding goes through a 256-entry table generated at compile time by
//! build.rs, since every input is an 8-bit code value. Encoding takes
//! arbitrary floats (accumulated error, clamped results) and uses `powf`.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Exponent applied when re-encoding linear values.
const INV_DISPLAY_GAMMA: f32 = 1.0 / 2.2;

/// Convert a gamma-encoded byte to linear light (0.0..=1.0).
#[inline]
pub fn decode_gamma(encoded: u8) -> f32 {
    DECODE_GAMMA[encoded as usize]
}

/// Convert a linear value back to the encoded 0.0..=255.0 range.
///
/// The input is clamped to 0.0..=1.0 first; the result is not rounded.
#[inline]
pub fn encode_gamma(linear: f32) -> f32 {
    linear.clamp(0.0, 1.0).powf(INV_DISPLAY_GAMMA) * 255.0
}
