//! Zig-zag delta decoding of quantized vertex components.

/// Decode a zig-zag encoded value.
///
/// Zig-zag interleaves signed values into unsigned ones:
/// `0 -> 0, 1 -> -1, 2 -> 1, 3 -> -2, ...`
#[must_use]
pub fn zigzag_decode(value: u16) -> i32 {
    let value = i32::from(value);
    (value >> 1) ^ -(value & 1)
}

/// Decode a zig-zag delta encoded component array.
///
/// Each entry is the zig-zag encoded difference from the previous value,
/// starting from zero. Accumulation wraps at 16 bits, matching the encoder.
#[must_use]
pub fn decode_zigzag_deltas(encoded: &[u16]) -> Vec<u16> {
    let mut value: u16 = 0;

    encoded
        .iter()
        .map(|&delta| {
            // Truncation to the low 16 bits is the wrapping behavior we want.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta = zigzag_decode(delta) as u16;
            value = value.wrapping_add(delta);
            value
        })
        .collect()
}
