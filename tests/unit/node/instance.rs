use super::*;
use crate::foundation::core::ObjectId;
use crate::host::channel::Channel;
use crate::manifest::store::ManifestPolicy;

fn bunny() -> ObjectId {
    ObjectId::from_ne_bytes(*b"abcd")
}

fn teapot() -> ObjectId {
    ObjectId::from_ne_bytes(*b"wxyz")
}

/// 2x1 plane: pixel 0 is the bunny, pixel 1 the teapot; a second layer has no channels.
fn scene() -> ImagePlane {
    let (b, t) = (bunny().to_f32(), teapot().to_f32());
    ImagePlane::new(2, 1)
        .with_channel("rgba.alpha", vec![1.0, 1.0])
        .unwrap()
        .with_channel("CryptoObject00.red", vec![b, t])
        .unwrap()
        .with_channel("CryptoObject00.green", vec![1.0, 0.75])
        .unwrap()
        .with_channel("CryptoObject00.blue", vec![0.0, b])
        .unwrap()
        .with_channel("CryptoObject00.alpha", vec![0.0, 0.25])
        .unwrap()
        .with_channel("motion.u", vec![0.5, -0.5])
        .unwrap()
        .with_metadata("exr/cryptomatte/0001/name", "CryptoObject")
        .with_metadata(
            "exr/cryptomatte/0001/manifest",
            r#"{"bunny": "abcd", "teapot": "wxyz"}"#,
        )
        .with_metadata("exr/cryptomatte/0002/name", "CryptoMaterial")
        .with_metadata("exr/cryptomatte/0002/manifest", r#"{"bad": "ab"}"#)
}

fn ready_node() -> Node {
    let mut node = Node::new(NodeSettings::default()).unwrap();
    node.input_changed(&scene()).unwrap();
    node
}

#[test]
fn input_change_selects_first_layer_and_loads_manifest() {
    let node = ready_node();
    assert_eq!(node.catalog().names(), vec!["CryptoObject", "CryptoMaterial"]);
    assert_eq!(node.settings().layer_name, "CryptoObject");
    assert_eq!(node.manifest().lookup_id("teapot"), Some(teapot()));
}

#[test]
fn locked_layer_survives_input_change() {
    let mut node = Node::new(NodeSettings {
        layer_name: "CryptoAsset".to_string(),
        layer_lock: true,
        ..NodeSettings::default()
    })
    .unwrap();
    node.input_changed(&scene()).unwrap();
    assert_eq!(node.settings().layer_name, "CryptoAsset");
    assert!(node.manifest().is_empty());

    node.select_layer(0).unwrap();
    assert_eq!(node.settings().layer_name, "CryptoAsset");
}

#[test]
fn strict_policy_surfaces_malformed_manifest() {
    let mut node = ready_node();
    let err = node.select_layer(1).unwrap_err();
    assert!(matches!(err, MatteError::ManifestParse { .. }));
    assert!(node.manifest().is_empty());
    assert!(node.select_layer(5).is_err());
}

#[test]
fn lenient_policy_loads_remaining_entries() {
    let mut node = Node::new(NodeSettings {
        manifest_policy: ManifestPolicy::Lenient,
        ..NodeSettings::default()
    })
    .unwrap();
    node.input_changed(&scene()).unwrap();
    node.select_layer(1).unwrap();
    assert_eq!(node.manifest().layer_name(), "CryptoMaterial");
    assert!(node.manifest().is_empty());
}

#[test]
fn pick_persists_selection_and_matte_list() {
    let mut node = ready_node();
    let plane = scene();
    let out = node.pick(PickMode::Add, SamplePoint::new(1.5, 0.5), &plane);
    assert_eq!(out, PickOutcome::Added(teapot()));
    let out = node.pick(PickMode::Add, SamplePoint::new(0.5, 0.5), &plane);
    assert_eq!(out, PickOutcome::Added(bunny()));

    let s = node.settings();
    assert_eq!(s.selection.count, 2);
    assert_eq!(s.selection.count as usize, node.selection().len());
    assert_eq!(s.selection.bytes, node.selection().encode());
    assert_eq!(s.matte_list, "teapot, bunny");

    node.pick(PickMode::Remove, SamplePoint::new(1.5, 0.5), &plane);
    assert_eq!(node.settings().selection.count, 1);
    assert_eq!(node.settings().matte_list, "bunny");
}

#[test]
fn clear_empties_persisted_state() {
    let mut node = ready_node();
    node.pick(PickMode::Add, SamplePoint::new(0.5, 0.5), &scene());
    node.clear();
    assert!(node.selection().is_empty());
    assert_eq!(node.settings().selection.count, 0);
    assert!(node.settings().selection.bytes.is_empty());
    assert!(node.settings().matte_list.is_empty());
}

#[test]
fn force_update_restores_persisted_selection() {
    let persisted = [teapot()].into_iter().collect::<SelectionSet>().persist();
    let mut node = Node::new(NodeSettings {
        layer_name: "CryptoObject".to_string(),
        layer_lock: true,
        selection: persisted,
        ..NodeSettings::default()
    })
    .unwrap();
    node.input_changed(&scene()).unwrap();
    node.force_update().unwrap();
    assert!(node.selection().contains(teapot()));
    assert_eq!(node.manifest().lookup_name(teapot()), Some("teapot"));
}

#[test]
fn matte_list_adds_known_names() {
    let mut node = ready_node();
    let unresolved = node.set_matte_list("bunny, ghost");
    assert_eq!(unresolved, vec!["ghost".to_string()]);
    assert!(node.selection().contains(bunny()));
    assert_eq!(node.settings().selection.count, 1);
    assert_eq!(node.settings().matte_list, "bunny");
}

#[test]
fn repeated_matte_lists_keep_persisted_names_in_sync() {
    let mut node = ready_node();
    node.set_matte_list("bunny");
    node.set_matte_list("teapot");
    let s = node.settings();
    assert_eq!(s.matte_list, "bunny, teapot");
    assert_eq!(s.selection.count, 2);

    let restored = SelectionSet::restore(&s.selection).unwrap();
    assert_eq!(node.manifest().names_for(&restored).join(", "), s.matte_list);
}

#[test]
fn binary_manifest_ids_resolve_by_name() {
    // Negative in either byte order, and not valid UTF-8.
    let bytes = [0x9a, 0xb2, 0x41, 0xc3];
    let neg = ObjectId::from_ne_bytes(bytes);
    assert!(neg.to_f32() < 0.0);
    let mut manifest = br#"{"shadow": ""#.to_vec();
    manifest.extend_from_slice(&bytes);
    manifest.extend_from_slice(br#""}"#);

    let plane = ImagePlane::new(1, 1)
        .with_channel("CryptoAsset00.red", vec![neg.to_f32()])
        .unwrap()
        .with_channel("CryptoAsset00.green", vec![1.0])
        .unwrap()
        .with_channel("CryptoAsset00.blue", vec![0.0])
        .unwrap()
        .with_channel("CryptoAsset00.alpha", vec![0.0])
        .unwrap()
        .with_metadata("exr/cryptomatte/0003/name", "CryptoAsset")
        .with_metadata("exr/cryptomatte/0003/manifest", manifest);
    let mut node = Node::new(NodeSettings::default()).unwrap();
    node.input_changed(&plane).unwrap();

    assert!(node.set_matte_list("shadow").is_empty());
    assert!(node.selection().contains(neg));
    node.pick(PickMode::Remove, SamplePoint::new(0.5, 0.5), &plane);
    assert!(node.selection().is_empty());
    assert!(node.settings().matte_list.is_empty());
}

#[test]
fn empty_layer_validates_to_passthrough() {
    let mut node = Node::new(NodeSettings::default()).unwrap();
    let plane = scene();
    assert_eq!(node.validate(&plane), OutputChannels::None);
    let out = node.engine(&plane, 0, 0, 2);
    assert_eq!(out, plane.fetch_row(0, 0, 2));
}

#[test]
fn engine_decodes_selected_matte() {
    let mut node = ready_node();
    let plane = scene();
    node.set_matte_list("bunny");
    node.set_flags(CompositingFlags {
        matte_only: true,
        ..CompositingFlags::default()
    });
    assert_eq!(node.validate(&plane), OutputChannels::All);
    let out = node.engine(&plane, 0, 0, 2);
    assert_eq!(out.get(Channel::ALPHA).unwrap(), &[1.0, 0.25]);
    let motion = plane.find_channel("motion.u").unwrap();
    assert_eq!(out.get(motion).unwrap(), &[0.5, -0.5]);
}

#[test]
fn render_collects_named_output_channels() {
    let mut node = ready_node();
    let plane = scene();
    node.set_matte_list("teapot");
    node.set_flags(CompositingFlags {
        remove_channels: true,
        ..CompositingFlags::default()
    });
    node.validate(&plane);
    let rendered = node.render(&plane).unwrap();
    assert_eq!(rendered.pixel(Channel::ALPHA, 1, 0), 0.75);
    assert_eq!(rendered.pixel(Channel::ALPHA, 0, 0), 0.0);
    assert!(rendered.find_channel("motion.u").is_some());
    assert!(rendered.find_channel("CryptoObject00.red").is_none());
    assert_eq!(rendered.metadata(), plane.metadata());
}
