const TWO_POW_25: f32 = 33_554_432.0;

/// Fraction part of `frexp(v)`: `v = fraction * 2^exp` with `0.5 <= |fraction| < 1`.
///
/// Zero, infinities and NaN are returned unchanged, as C `frexp` does.
pub(crate) fn frexp_fraction(v: f32) -> f32 {
    if v == 0.0 || !v.is_finite() {
        return v;
    }
    // Scaling by a power of two keeps the fraction and lifts subnormals into normal range.
    let v = if v.is_subnormal() { v * TWO_POW_25 } else { v };
    f32::from_bits((v.to_bits() & 0x807F_FFFF) | 0x3F00_0000)
}

/// One channel term of the preview hash: `fmod(mantissa(|id|) * scale, 0.25) * coverage`.
pub(crate) fn preview_term(id: f32, scale: f32, coverage: f32) -> f32 {
    ((frexp_fraction(id.abs()) * scale) % 0.25) * coverage
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
