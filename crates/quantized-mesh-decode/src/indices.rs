//! Triangle index decoding.

/// Decode high-water-mark encoded triangle indices.
///
/// The encoding tracks the highest index seen so far. Each code `c`
/// produces index `highest - c`; a code of 0 introduces a new vertex and
/// bumps the high-water mark.
///
/// Codes larger than the current mark wrap around. The result is checked
/// against the vertex count by [`crate::create_vertices`].
#[must_use]
pub fn decode_high_water_mark(codes: &[u16]) -> Vec<u16> {
    let mut highest: u16 = 0;

    codes
        .iter()
        .map(|&code| {
            let index = highest.wrapping_sub(code);
            if code == 0 {
                highest = highest.wrapping_add(1);
            }
            index
        })
        .collect()
}
