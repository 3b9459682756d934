//! Cryptomatte ID-matte decoding, selection and compositing.
//!
//! Crypto layers store up to three levels of `(id, coverage)` pairs per pixel, packed into
//! RGBA channel quadruplets (`<layer>00.red` .. `<layer>02.alpha`). This crate turns a set of
//! selected ids into a soft matte and a hash-colored preview.
//!
//! # Pipeline overview
//!
//! 1. **Discover**: image metadata -> [`LayerCatalog`] -> [`Manifest`] (name ↔ id)
//! 2. **Select**: [`sample_and_toggle`] or a matte list edits the [`SelectionSet`]
//! 3. **Resolve**: layer name -> [`ResolvedChannels`], once per processing pass
//! 4. **Composite**: [`composite_row`] decodes every pixel of a scanline
//!
//! [`Node`] wires these together behind persisted [`NodeSettings`], the way a compositing host
//! drives a node.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Exact ids**: ids compare by bit pattern; `0.0` is the explicit [`ObjectId::None`].
//! - **No hidden text encoding**: manifests and selections carry ids as raw bytes.
//! - **Never fail mid-scanline**: missing channels degrade to pass-through.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Scanline decoding and compositing.
pub mod engine;
/// Host collaborator traits and the in-memory image.
pub mod host;
/// Manifest parsing and layer discovery.
pub mod manifest;
/// Node façade over settings, manifest and selection.
pub mod node;
/// Selection set and picker.
pub mod selection;

pub use crate::engine::channels::{
    LEVEL_SUFFIXES, LevelChannels, ResolvedChannels, resolve_channels,
};
pub use crate::engine::compositor::{composite_row, passthrough_row};
pub use crate::engine::flags::CompositingFlags;
pub use crate::engine::pixel::{
    PAIR_COUNT, PixelSample, decode_pixel, matte_alpha, matte_coverage, preview_color,
};
pub use crate::foundation::core::{LEVEL_COUNT, LevelValues, ObjectId, Rgba, SamplePoint};
pub use crate::foundation::error::{MatteError, MatteResult};
pub use crate::host::channel::{Channel, ChannelLookup, InputImage, RGBA_CHANNEL_NAMES};
pub use crate::host::plane::{ImagePlane, PlaneChannel};
pub use crate::host::row::{Pixel, Row};
pub use crate::manifest::catalog::{CRYPTOMATTE_METADATA_PREFIX, LayerCatalog, LayerEntry};
pub use crate::manifest::store::{Manifest, ManifestPolicy};
pub use crate::node::instance::{Node, OutputChannels};
pub use crate::node::settings::NodeSettings;
pub use crate::selection::picker::{PickMode, PickOutcome, sample_and_toggle};
pub use crate::selection::set::{PersistedSelection, SelectionSet};
