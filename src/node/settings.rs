use std::path::Path;

use anyhow::Context as _;

use crate::engine::flags::CompositingFlags;
use crate::foundation::error::{MatteError, MatteResult};
use crate::manifest::store::ManifestPolicy;
use crate::selection::set::{PersistedSelection, SelectionSet};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Persisted control state of one node.
///
/// This is the value a host saves with its graph; the node rebuilds its selection and manifest
/// from it.
pub struct NodeSettings {
    /// Output mode toggles.
    pub flags: CompositingFlags,
    /// Active crypto layer base name; empty disables decoding.
    pub layer_name: String,
    /// Keep `layer_name` when the input changes.
    pub layer_lock: bool,
    /// Comma-separated object names mirrored from the selection.
    pub matte_list: String,
    /// Selected ids.
    pub selection: PersistedSelection,
    /// Treatment of malformed manifest entries.
    pub manifest_policy: ManifestPolicy,
}

impl NodeSettings {
    /// Parse settings from JSON.
    pub fn from_json_str(s: &str) -> MatteResult<Self> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> MatteResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and validate a settings file.
    pub fn load(path: &Path) -> MatteResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Write the settings file, creating parent directories.
    pub fn save(&self, path: &Path) -> MatteResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create settings dir '{}'", parent.display()))?;
        }
        std::fs::write(path, self.to_json_string()?)
            .with_context(|| format!("write settings '{}'", path.display()))?;
        Ok(())
    }

    /// Check that the persisted selection decodes and agrees with its count.
    pub fn validate(&self) -> MatteResult<()> {
        SelectionSet::restore(&self.selection)
            .map(|_| ())
            .map_err(|e| MatteError::validation(format!("settings selection: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/settings.rs"]
mod tests;
