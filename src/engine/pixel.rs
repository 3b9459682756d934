//! Per-pixel decoding of crypto levels into a matte and a preview color.

use crate::engine::flags::CompositingFlags;
use crate::foundation::core::{LEVEL_COUNT, LevelValues, ObjectId, Rgba};
use crate::foundation::math::preview_term;
use crate::selection::set::SelectionSet;

/// Number of `(id, coverage)` candidates per pixel.
pub const PAIR_COUNT: usize = LEVEL_COUNT * 2;

const PREVIEW_SCALES: [f32; 3] = [1.0, 16.0, 64.0];

#[derive(Clone, Copy, Debug, PartialEq)]
/// The six `(id, coverage)` candidates of one pixel.
///
/// Level `n` contributes `(red, green)` then `(blue, alpha)`.
pub struct PixelSample {
    pairs: [(ObjectId, f32); PAIR_COUNT],
}

impl PixelSample {
    /// Split raw level values into id/coverage pairs.
    pub fn from_levels(levels: &[LevelValues; LEVEL_COUNT]) -> Self {
        let pairs = std::array::from_fn(|j| {
            let [r, g, b, a] = levels[j / 2];
            if j % 2 == 0 {
                (ObjectId::from_f32(r), g)
            } else {
                (ObjectId::from_f32(b), a)
            }
        });
        Self { pairs }
    }

    /// All candidates in level order.
    pub fn pairs(&self) -> &[(ObjectId, f32); PAIR_COUNT] {
        &self.pairs
    }

    /// The two candidates of `level`.
    pub fn level(&self, level: usize) -> [(ObjectId, f32); 2] {
        [self.pairs[level * 2], self.pairs[level * 2 + 1]]
    }
}

/// Sum of the coverage of every selected candidate. The sum is not clamped.
pub fn matte_coverage(sample: &PixelSample, selection: &SelectionSet) -> f32 {
    sample
        .pairs()
        .iter()
        .filter(|(id, _)| selection.contains(*id))
        .fold(0.0, |acc, (_, coverage)| acc + coverage)
}

/// Hash preview `[r, g, b]` built from the level 0 and level 1 pairs.
pub fn preview_color(levels: &[LevelValues; LEVEL_COUNT]) -> [f32; 3] {
    PREVIEW_SCALES.map(|scale| {
        levels[..2]
            .iter()
            .flat_map(|&[r, g, b, a]| [(r, g), (b, a)])
            .map(|(id, coverage)| preview_term(id, scale, coverage))
            .fold(0.0, |acc, t| acc + t)
    })
}

/// Matte value written to alpha.
///
/// With unpremultiply the matte is divided by `alpha`; a zero alpha yields `0.0` instead of a
/// non-finite value.
pub fn matte_alpha(coverage: f32, alpha: f32, unpremultiply: bool) -> f32 {
    if !unpremultiply {
        return coverage;
    }
    if alpha == 0.0 { 0.0 } else { coverage / alpha }
}

/// Decode one pixel into its output RGBA.
pub fn decode_pixel(
    levels: &[LevelValues; LEVEL_COUNT],
    original: Rgba,
    selection: &SelectionSet,
    flags: &CompositingFlags,
) -> Rgba {
    let sample = PixelSample::from_levels(levels);
    let coverage = matte_coverage(&sample, selection);
    let alpha = matte_alpha(coverage, original[3], flags.enable_unpremultiply);

    if flags.matte_only {
        return [alpha, alpha, alpha, alpha];
    }
    if !flags.enable_preview {
        return [original[0], original[1], original[2], alpha];
    }

    let [pr, pg, pb] = preview_color(levels);
    [
        coverage + (1.0 - coverage) * pr,
        coverage + (1.0 - coverage) * pg,
        pb,
        alpha,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/engine/pixel.rs"]
mod tests;
