use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde_bytes::ByteBuf;

use crate::foundation::core::ObjectId;
use crate::foundation::error::{MatteError, MatteResult};
use crate::selection::set::SelectionSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How [`Manifest::load`] treats entries whose value is not a packed 4-byte id.
pub enum ManifestPolicy {
    /// Fail the whole load on the first malformed entry.
    #[default]
    Strict,
    /// Skip malformed entries with a warning.
    Lenient,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Name ↔ id mapping for one crypto layer.
///
/// Values in the manifest JSON are strings whose four raw bytes are the native-endian `f32`
/// id. When two names share an id, the name that appears later in the document owns the
/// reverse mapping; both names keep their forward mapping.
pub struct Manifest {
    layer: String,
    name_to_id: BTreeMap<String, ObjectId>,
    id_to_name: HashMap<ObjectId, String>,
}

impl Manifest {
    /// Manifest with no named objects.
    pub fn empty(layer_name: &str) -> Self {
        Self {
            layer: layer_name.to_string(),
            ..Self::default()
        }
    }

    /// Parse the manifest document `raw_json` for `layer_name`.
    ///
    /// The document is read as bytes: string values are taken verbatim after JSON escape
    /// processing, with no UTF-8 check, so every 4-byte id is representable. Every value must
    /// be a JSON string; any other value makes the document unreadable under both policies.
    #[tracing::instrument(skip(raw_json), fields(bytes = raw_json.len()))]
    pub fn load(layer_name: &str, raw_json: &[u8], policy: ManifestPolicy) -> MatteResult<Self> {
        let RawEntries(entries) = serde_json::from_slice(raw_json)
            .map_err(|e| MatteError::manifest(layer_name, "<root>", e.to_string()))?;

        let mut manifest = Self::empty(layer_name);
        for (name, value) in &entries {
            let name = String::from_utf8_lossy(name);
            match decode_entry(value) {
                Ok(id) => manifest.insert(&name, id),
                Err(reason) => match policy {
                    ManifestPolicy::Strict => {
                        return Err(MatteError::manifest(layer_name, name, reason));
                    }
                    ManifestPolicy::Lenient => {
                        tracing::warn!(
                            layer = layer_name,
                            entry = %name,
                            %reason,
                            "skipping manifest entry"
                        );
                    }
                },
            }
        }

        tracing::debug!(entries = manifest.len(), "manifest loaded");
        Ok(manifest)
    }

    /// Layer this manifest was loaded for.
    pub fn layer_name(&self) -> &str {
        &self.layer
    }

    /// Object name owning `id`.
    pub fn lookup_name(&self, id: ObjectId) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    /// Id of the object called `name`.
    pub fn lookup_id(&self, name: &str) -> Option<ObjectId> {
        self.name_to_id.get(name).copied()
    }

    /// Number of named objects.
    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    /// Return `true` when no object is named.
    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }

    /// `(name, id)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ObjectId)> + '_ {
        self.name_to_id.iter().map(|(n, id)| (n.as_str(), *id))
    }

    /// Names of the selected ids in selection order; ids without a name are skipped.
    pub fn names_for(&self, selection: &SelectionSet) -> Vec<&str> {
        selection
            .iter()
            .filter_map(|id| self.lookup_name(id))
            .collect()
    }

    fn insert(&mut self, name: &str, id: ObjectId) {
        // A repeated name rebinds; drop the reverse entry it owned for its previous id.
        let previous = self.name_to_id.insert(name.to_string(), id);
        if let Some(old) = previous.filter(|&old| old != id) {
            if self.id_to_name.get(&old).is_some_and(|n| n == name) {
                self.id_to_name.remove(&old);
            }
        }
        self.id_to_name.insert(id, name.to_string());
    }
}

/// Top-level `name -> value` pairs in document order, both as raw bytes.
struct RawEntries(Vec<(ByteBuf, ByteBuf)>);

impl<'de> serde::Deserialize<'de> for RawEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object mapping names to 4-byte strings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<ByteBuf, ByteBuf>()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

fn decode_entry(value: &[u8]) -> Result<ObjectId, String> {
    let bytes: [u8; 4] = value
        .try_into()
        .map_err(|_| format!("expected 4 bytes, got {}", value.len()))?;
    let id = ObjectId::from_ne_bytes(bytes);
    if id.is_none() {
        return Err("id decodes to 0.0, which is reserved for empty slots".to_string());
    }
    if !id.is_selectable() {
        return Err("id decodes to NaN".to_string());
    }
    Ok(id)
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/store.rs"]
mod tests;
