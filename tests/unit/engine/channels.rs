use super::*;
use crate::foundation::core::SamplePoint;
use crate::host::channel::InputImage;
use crate::host::plane::ImagePlane;

fn plane_with(names: &[&str]) -> ImagePlane {
    let mut plane = ImagePlane::new(2, 1);
    for (i, name) in names.iter().enumerate() {
        plane
            .set_channel(*name, vec![i as f32 + 1.0, -(i as f32) - 1.0])
            .unwrap();
    }
    plane
}

const LEVEL0: [&str; 4] = ["id00.red", "id00.green", "id00.blue", "id00.alpha"];

#[test]
fn level0_alone_is_fully_present() {
    let plane = plane_with(&LEVEL0);
    let resolved = resolve_channels("id", &plane);
    assert!(resolved.is_fully_present());
    assert!(resolved.levels[0].is_present());
    assert!(!resolved.levels[1].is_present());
    assert_eq!(resolved.crypto_channels().len(), 4);
}

#[test]
fn missing_level0_channel_disables_decoding() {
    let plane = plane_with(&["id00.red", "id00.green", "id00.blue"]);
    let resolved = resolve_channels("id", &plane);
    assert!(!resolved.is_fully_present());
    assert_eq!(resolved.levels[0].alpha, None);
}

#[test]
fn names_are_built_from_base_suffix_and_component() {
    let plane = plane_with(&["CryptoObject02.green"]);
    let resolved = resolve_channels("CryptoObject", &plane);
    assert_eq!(resolved.levels[2].green, Some(Channel(4)));
    assert_eq!(resolve_channels("Crypto", &plane).levels[2].green, None);
}

#[test]
fn read_row_zero_fills_unresolved_channels() {
    let plane = plane_with(&[
        "id00.red",
        "id00.green",
        "id00.blue",
        "id00.alpha",
        "id01.red",
    ]);
    let resolved = resolve_channels("id", &plane);
    let row = plane.fetch_row(0, 0, 2);
    let levels = resolved.read_row(&row, 1);
    assert_eq!(levels[0], [-1.0, -2.0, -3.0, -4.0]);
    assert_eq!(levels[1], [-5.0, 0.0, 0.0, 0.0]);
    assert_eq!(levels[2], [0.0; 4]);
}

#[test]
fn read_pixel_matches_read_row() {
    let mut names = LEVEL0.to_vec();
    names.extend(["id01.red", "id01.green", "id01.blue", "id01.alpha"]);
    let plane = plane_with(&names);
    let resolved = resolve_channels("id", &plane);
    let row = plane.fetch_row(0, 0, 2);
    let pixel = plane.sample(SamplePoint::new(0.5, 0.5)).unwrap();
    assert_eq!(resolved.read_pixel(&pixel), resolved.read_row(&row, 0));
}
