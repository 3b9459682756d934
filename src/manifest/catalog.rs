use std::collections::BTreeMap;

/// Metadata key prefix under which crypto layers are published.
pub const CRYPTOMATTE_METADATA_PREFIX: &str = "exr/cryptomatte/";

#[derive(Clone, Debug, PartialEq, Eq)]
/// One crypto layer discovered in image metadata.
pub struct LayerEntry {
    /// Metadata id segment (`exr/cryptomatte/<id>/...`).
    pub metadata_id: String,
    /// Base channel layer name, e.g. `CryptoObject`.
    pub name: String,
    /// Raw manifest JSON bytes; empty when the layer publishes none.
    pub manifest: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Ordered list of crypto layers available on the current input.
pub struct LayerCatalog {
    layers: Vec<LayerEntry>,
}

impl LayerCatalog {
    /// Collect layers from a metadata bundle.
    ///
    /// Keys are grouped by their `<id>` segment in sorted order. A group without a `name`
    /// entry is skipped.
    #[tracing::instrument(skip(metadata), fields(keys = metadata.len()))]
    pub fn from_metadata(metadata: &BTreeMap<String, Vec<u8>>) -> Self {
        let mut groups: BTreeMap<&str, BTreeMap<&str, &[u8]>> = BTreeMap::new();
        for (key, value) in metadata {
            let Some(pos) = key.find(CRYPTOMATTE_METADATA_PREFIX) else {
                continue;
            };
            let rest = &key[pos + CRYPTOMATTE_METADATA_PREFIX.len()..];
            let Some((id, field)) = rest.split_once('/') else {
                continue;
            };
            groups.entry(id).or_default().insert(field, value.as_slice());
        }

        let mut layers = Vec::with_capacity(groups.len());
        for (id, fields) in groups {
            let Some(name) = fields.get("name") else {
                tracing::warn!(metadata_id = id, "crypto layer has no name, skipping");
                continue;
            };
            layers.push(LayerEntry {
                metadata_id: id.to_string(),
                name: String::from_utf8_lossy(name).into_owned(),
                manifest: fields.get("manifest").copied().unwrap_or_default().to_vec(),
            });
        }

        tracing::debug!(layers = layers.len(), "crypto layers discovered");
        Self { layers }
    }

    /// Layer names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    /// Layer at `index`.
    pub fn get(&self, index: usize) -> Option<&LayerEntry> {
        self.layers.get(index)
    }

    /// Layer named `name`; the first match wins.
    pub fn find(&self, name: &str) -> Option<&LayerEntry> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Catalog index of the layer named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Return `true` when no layer was found.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/catalog.rs"]
mod tests;
