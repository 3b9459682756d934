use crate::engine::channels::{ResolvedChannels, resolve_channels};
use crate::engine::pixel::PixelSample;
use crate::foundation::core::{ObjectId, SamplePoint};
use crate::host::channel::InputImage;
use crate::host::row::Pixel;
use crate::selection::set::SelectionSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What a pick does to the selection.
pub enum PickMode {
    /// Add the picked id.
    Add,
    /// Remove the picked id.
    Remove,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Result of [`sample_and_toggle`].
///
/// Only [`PickOutcome::Added`] and [`PickOutcome::Removed`] change the selection.
pub enum PickOutcome {
    /// The id was added.
    Added(ObjectId),
    /// The id was removed.
    Removed(ObjectId),
    /// The id was already selected (add) or not selected (remove).
    Unchanged(ObjectId),
    /// Both slots of the examined level are background.
    Background,
    /// The sample point lies outside the input.
    OutOfBounds,
    /// The input lacks the level 0 channels of the layer.
    MissingLayer,
    /// No layer name is configured.
    NoLayerSelected,
}

impl PickOutcome {
    /// Return `true` when the selection was modified.
    pub fn is_mutation(self) -> bool {
        matches!(self, Self::Added(_) | Self::Removed(_))
    }
}

/// Sample the pixel under `point` and toggle its id in `selection`.
///
/// A slot is background when its id is empty or NaN, or its coverage is zero. The first
/// non-background slot of the examined level is acted on; a level with two background slots
/// aborts the pick. In [`PickMode::Add`] with `single_selection`, the selection is replaced by
/// the picked id.
#[tracing::instrument(skip(input, selection))]
pub fn sample_and_toggle(
    mode: PickMode,
    point: SamplePoint,
    input: &impl InputImage,
    layer: &str,
    selection: &mut SelectionSet,
    single_selection: bool,
) -> PickOutcome {
    if layer.is_empty() {
        return PickOutcome::NoLayerSelected;
    }
    let channels = resolve_channels(layer, input);
    if !channels.is_fully_present() {
        return PickOutcome::MissingLayer;
    }
    let Some(pixel) = input.sample(point) else {
        return PickOutcome::OutOfBounds;
    };

    let outcome = match picked_id(&channels, &pixel) {
        Some(id) => toggle(mode, id, selection, single_selection),
        None => PickOutcome::Background,
    };
    tracing::debug!(?outcome, selected = selection.len(), "pick");
    outcome
}

fn picked_id(channels: &ResolvedChannels, pixel: &Pixel) -> Option<ObjectId> {
    let sample = PixelSample::from_levels(&channels.read_pixel(pixel));
    // Level 0 always holds the pixel's strongest ids; a pick never looks past it.
    sample
        .level(0)
        .into_iter()
        .find(|&(id, coverage)| id.is_selectable() && coverage != 0.0)
        .map(|(id, _)| id)
}

fn toggle(
    mode: PickMode,
    id: ObjectId,
    selection: &mut SelectionSet,
    single_selection: bool,
) -> PickOutcome {
    match mode {
        PickMode::Add => {
            if single_selection {
                selection.clear();
            }
            if selection.add(id) {
                PickOutcome::Added(id)
            } else {
                PickOutcome::Unchanged(id)
            }
        }
        PickMode::Remove => {
            if selection.remove(id) {
                PickOutcome::Removed(id)
            } else {
                PickOutcome::Unchanged(id)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/selection/picker.rs"]
mod tests;
