//! Per-graph-node state: settings, manifest, selection and layer catalog.
//!
//! Row processing borrows the node immutably while picks and reloads borrow it mutably, so a
//! single-threaded host cannot interleave them. A host that renders scanlines on several
//! threads shares the node behind a `std::sync::RwLock`: rows take read guards, control
//! actions take the write guard.

use crate::engine::channels::{ResolvedChannels, resolve_channels};
use crate::engine::compositor::{composite_row, passthrough_row};
use crate::engine::flags::CompositingFlags;
use crate::foundation::core::SamplePoint;
use crate::foundation::error::{MatteError, MatteResult};
use crate::host::channel::{ChannelLookup, InputImage};
use crate::host::plane::{ImagePlane, PlaneChannel};
use crate::host::row::Row;
use crate::manifest::catalog::LayerCatalog;
use crate::manifest::store::Manifest;
use crate::node::settings::NodeSettings;
use crate::selection::picker::{PickMode, PickOutcome, sample_and_toggle};
use crate::selection::set::SelectionSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which channels a validated node writes.
pub enum OutputChannels {
    /// Every input channel; RGBA is decoded.
    All,
    /// Nothing is produced by the node; the input passes through.
    None,
}

#[derive(Clone, Debug)]
/// A crypto matte node.
pub struct Node {
    settings: NodeSettings,
    manifest: Manifest,
    selection: SelectionSet,
    catalog: LayerCatalog,
    channels: Option<ResolvedChannels>,
}

impl Node {
    /// Build a node from persisted settings, restoring its selection.
    pub fn new(settings: NodeSettings) -> MatteResult<Self> {
        let selection = SelectionSet::restore(&settings.selection)?;
        Ok(Self {
            manifest: Manifest::empty(&settings.layer_name),
            settings,
            selection,
            catalog: LayerCatalog::default(),
            channels: None,
        })
    }

    /// Current persisted state.
    pub fn settings(&self) -> &NodeSettings {
        &self.settings
    }

    /// Consume the node and keep its persisted state.
    pub fn into_settings(self) -> NodeSettings {
        self.settings
    }

    /// Active manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Active selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Layers found on the last input change.
    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    /// Replace the output toggles.
    pub fn set_flags(&mut self, flags: CompositingFlags) {
        self.settings.flags = flags;
    }

    /// Rescan the input metadata for crypto layers.
    ///
    /// Unless the layer is locked, the first discovered layer becomes active.
    #[tracing::instrument(skip_all)]
    pub fn input_changed(&mut self, input: &impl InputImage) -> MatteResult<()> {
        self.catalog = LayerCatalog::from_metadata(input.metadata());
        self.channels = None;
        if self.settings.layer_lock {
            return self.reload_manifest();
        }
        if self.catalog.is_empty() {
            self.settings.layer_name.clear();
            self.manifest = Manifest::empty("");
            return Ok(());
        }
        self.select_layer(0)
    }

    /// Make the catalog layer at `index` active and load its manifest. Ignored while locked.
    pub fn select_layer(&mut self, index: usize) -> MatteResult<()> {
        if self.settings.layer_lock {
            tracing::debug!(index, "layer selection is locked");
            return Ok(());
        }
        let Some(entry) = self.catalog.get(index) else {
            return Err(MatteError::validation(format!(
                "layer index {index} out of range ({} layers)",
                self.catalog.len()
            )));
        };
        self.settings.layer_name = entry.name.clone();
        self.channels = None;
        self.reload_manifest()
    }

    /// Lock or unlock the active layer.
    pub fn set_layer_lock(&mut self, locked: bool) {
        self.settings.layer_lock = locked;
    }

    /// Empty the selection and its persisted form.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.persist_selection();
    }

    /// Reload the manifest and rebuild the selection from the persisted settings.
    pub fn force_update(&mut self) -> MatteResult<()> {
        self.reload_manifest()?;
        self.selection = SelectionSet::restore(&self.settings.selection)?;
        self.channels = None;
        Ok(())
    }

    /// Add every resolvable name of a comma-separated list to the selection.
    ///
    /// The list extends the selection; it does not replace it. The stored matte list is then
    /// rebuilt from the whole selection, so unresolved names are only reported in the returned
    /// list and never persisted.
    pub fn set_matte_list(&mut self, list: &str) -> Vec<String> {
        let unresolved = self.selection.extend_from_names(list, &self.manifest);
        self.persist_selection();
        unresolved
    }

    /// Toggle the id under `point` and persist the result.
    pub fn pick(
        &mut self,
        mode: PickMode,
        point: SamplePoint,
        input: &impl InputImage,
    ) -> PickOutcome {
        let outcome = sample_and_toggle(
            mode,
            point,
            input,
            &self.settings.layer_name,
            &mut self.selection,
            self.settings.flags.single_selection,
        );
        if outcome.is_mutation() {
            self.persist_selection();
        }
        outcome
    }

    /// Resolve the layer channels for the coming processing pass.
    pub fn validate(&mut self, input: &impl ChannelLookup) -> OutputChannels {
        if self.settings.layer_name.is_empty() {
            self.channels = None;
            return OutputChannels::None;
        }
        self.channels = Some(resolve_channels(&self.settings.layer_name, input));
        OutputChannels::All
    }

    /// Produce `[x, r)` of scanline `y`.
    pub fn engine(&self, input: &impl InputImage, y: i32, x: i32, r: i32) -> Row {
        let row = input.fetch_row(y, x, r);
        let mut out = Row::new(x, r);
        if self.settings.layer_name.is_empty() {
            passthrough_row(&row, &mut out);
            return out;
        }
        let channels = self
            .channels
            .unwrap_or_else(|| resolve_channels(&self.settings.layer_name, input));
        composite_row(
            &row,
            &channels,
            &self.selection,
            &self.settings.flags,
            &mut out,
        );
        out
    }

    /// Run [`Node::engine`] over every scanline and collect the result.
    #[tracing::instrument(skip_all)]
    pub fn render(&self, input: &impl InputImage) -> MatteResult<ImagePlane> {
        let (width, height) = input.size();
        let width_i = i32::try_from(width).map_err(|_| MatteError::validation("width overflow"))?;

        let mut planes: Vec<PlaneChannel> = Vec::new();
        for y in 0..height as i32 {
            let row = self.engine(input, y, 0, width_i);
            if planes.is_empty() {
                for ch in row.channels() {
                    let name = input.channel_name(ch).ok_or_else(|| {
                        MatteError::validation(format!("output channel {ch:?} has no name"))
                    })?;
                    planes.push(PlaneChannel {
                        name: name.to_string(),
                        data: Vec::with_capacity(width as usize * height as usize),
                    });
                }
            }
            for (plane, ch) in planes.iter_mut().zip(row.channels()) {
                plane
                    .data
                    .extend_from_slice(row.get(ch).unwrap_or_default());
            }
        }

        tracing::debug!(width, height, channels = planes.len(), "rendered");
        ImagePlane::from_channels(width, height, planes, input.metadata().clone())
    }

    fn reload_manifest(&mut self) -> MatteResult<()> {
        let layer = self.settings.layer_name.clone();
        self.manifest = Manifest::empty(&layer);
        let Some(entry) = self.catalog.find(&layer) else {
            return Ok(());
        };
        if entry.manifest.is_empty() {
            return Ok(());
        }
        self.manifest = Manifest::load(&layer, &entry.manifest, self.settings.manifest_policy)?;
        Ok(())
    }

    /// Store the selection and mirror its named ids into the matte list.
    fn persist_selection(&mut self) {
        self.settings.selection = self.selection.persist();
        self.settings.matte_list = self.manifest.names_for(&self.selection).join(", ");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/instance.rs"]
mod tests;
