use super::*;
use crate::host::plane::ImagePlane;

fn id(v: f32) -> ObjectId {
    ObjectId::from_f32(v)
}

/// One-pixel crypto layer `id` with the given level 0 values.
fn pixel_plane(level0: [f32; 4]) -> ImagePlane {
    let mut plane = ImagePlane::new(1, 1);
    for (c, v) in ["red", "green", "blue", "alpha"].into_iter().zip(level0) {
        plane.set_channel(format!("id00.{c}"), vec![v]).unwrap();
    }
    plane
}

const CENTER: SamplePoint = SamplePoint { x: 0.5, y: 0.5 };

#[test]
fn add_skips_background_slot_and_picks_real_id() {
    let plane = pixel_plane([0.0, 0.0, 3.5, 0.8]);
    let mut sel = SelectionSet::new();
    let out = sample_and_toggle(PickMode::Add, CENTER, &plane, "id", &mut sel, false);
    assert_eq!(out, PickOutcome::Added(id(3.5)));
    assert!(sel.contains(id(3.5)));
}

#[test]
fn add_prefers_first_slot() {
    let plane = pixel_plane([3.5, 0.6, 7.0, 0.4]);
    let mut sel = SelectionSet::new();
    sample_and_toggle(PickMode::Add, CENTER, &plane, "id", &mut sel, false);
    assert_eq!(sel.iter().collect::<Vec<_>>(), vec![id(3.5)]);
}

#[test]
fn real_id_next_to_empty_second_slot_is_added() {
    let plane = pixel_plane([3.5, 0.6, 0.0, 0.0]);
    let mut sel = SelectionSet::new();
    let out = sample_and_toggle(PickMode::Add, CENTER, &plane, "id", &mut sel, false);
    assert_eq!(out, PickOutcome::Added(id(3.5)));
}

#[test]
fn two_background_slots_abort_without_mutation() {
    let mut sel: SelectionSet = [id(1.5)].into_iter().collect();
    let before = sel.clone();
    for level0 in [[0.0, 0.0, 0.0, 0.0], [3.5, 0.0, 7.0, 0.0], [0.0, 0.5, 0.0, 0.5]] {
        let plane = pixel_plane(level0);
        for mode in [PickMode::Add, PickMode::Remove] {
            let out = sample_and_toggle(mode, CENTER, &plane, "id", &mut sel, true);
            assert_eq!(out, PickOutcome::Background);
            assert!(!out.is_mutation());
            assert_eq!(sel, before);
        }
    }
}

#[test]
fn nan_id_is_background() {
    let mut sel: SelectionSet = [id(1.5)].into_iter().collect();
    let plane = pixel_plane([f32::NAN, 1.0, 0.0, 0.0]);
    let out = sample_and_toggle(PickMode::Add, CENTER, &plane, "id", &mut sel, true);
    assert_eq!(out, PickOutcome::Background);
    assert_eq!(sel.iter().collect::<Vec<_>>(), vec![id(1.5)]);

    let plane = pixel_plane([f32::NAN, 0.5, 3.5, 0.5]);
    let out = sample_and_toggle(PickMode::Add, CENTER, &plane, "id", &mut sel, false);
    assert_eq!(out, PickOutcome::Added(id(3.5)));
}

#[test]
fn single_selection_replaces_previous_ids() {
    let plane = pixel_plane([3.5, 1.0, 0.0, 0.0]);
    let mut sel: SelectionSet = [id(1.5), id(2.5)].into_iter().collect();
    let out = sample_and_toggle(PickMode::Add, CENTER, &plane, "id", &mut sel, true);
    assert_eq!(out, PickOutcome::Added(id(3.5)));
    assert_eq!(sel.iter().collect::<Vec<_>>(), vec![id(3.5)]);
}

#[test]
fn add_existing_is_unchanged_and_remove_missing_is_unchanged() {
    let plane = pixel_plane([3.5, 1.0, 0.0, 0.0]);
    let mut sel: SelectionSet = [id(3.5)].into_iter().collect();
    let out = sample_and_toggle(PickMode::Add, CENTER, &plane, "id", &mut sel, false);
    assert_eq!(out, PickOutcome::Unchanged(id(3.5)));
    assert_eq!(sel.len(), 1);

    let mut empty = SelectionSet::new();
    let out = sample_and_toggle(PickMode::Remove, CENTER, &plane, "id", &mut empty, false);
    assert_eq!(out, PickOutcome::Unchanged(id(3.5)));
}

#[test]
fn remove_drops_picked_id_only() {
    let plane = pixel_plane([3.5, 1.0, 0.0, 0.0]);
    let mut sel: SelectionSet = [id(1.5), id(3.5)].into_iter().collect();
    let out = sample_and_toggle(PickMode::Remove, CENTER, &plane, "id", &mut sel, false);
    assert_eq!(out, PickOutcome::Removed(id(3.5)));
    assert_eq!(sel.iter().collect::<Vec<_>>(), vec![id(1.5)]);
}

#[test]
fn unusable_inputs_report_distinct_outcomes() {
    let plane = pixel_plane([3.5, 1.0, 0.0, 0.0]);
    let mut sel = SelectionSet::new();
    assert_eq!(
        sample_and_toggle(PickMode::Add, SamplePoint::new(4.0, 0.5), &plane, "id", &mut sel, false),
        PickOutcome::OutOfBounds
    );
    assert_eq!(
        sample_and_toggle(PickMode::Add, CENTER, &plane, "other", &mut sel, false),
        PickOutcome::MissingLayer
    );
    assert_eq!(
        sample_and_toggle(PickMode::Add, CENTER, &plane, "", &mut sel, false),
        PickOutcome::NoLayerSelected
    );
    assert!(sel.is_empty());
}
