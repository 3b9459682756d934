use std::collections::HashSet;

use crate::foundation::core::ObjectId;
use crate::foundation::error::{MatteError, MatteResult};
use crate::manifest::store::Manifest;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Persisted selection: `count` native-endian `f32` ids packed into `bytes`.
///
/// The count is stored next to the buffer, not inside it.
pub struct PersistedSelection {
    /// Number of ids in `bytes`.
    pub count: u32,
    /// `count * 4` bytes of concatenated ids.
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Insertion-ordered set of selected object ids.
pub struct SelectionSet {
    order: Vec<ObjectId>,
    members: HashSet<ObjectId>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`. Returns `false` if it was already selected or is not
    /// [selectable](ObjectId::is_selectable).
    pub fn add(&mut self, id: ObjectId) -> bool {
        if !id.is_selectable() || !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Remove `id`. Returns `false` if it was not selected.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|&x| x != id);
        true
    }

    /// Membership test; [`ObjectId::None`] never matches.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.contains(&id)
    }

    /// Remove every id.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Return `true` when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.order.iter().copied()
    }

    /// Concatenated native-endian ids in insertion order.
    pub fn encode(&self) -> Vec<u8> {
        self.order.iter().flat_map(|id| id.to_ne_bytes()).collect()
    }

    /// Inverse of [`SelectionSet::encode`].
    ///
    /// Repeated ids keep their first position.
    pub fn decode(bytes: &[u8]) -> MatteResult<Self> {
        if !bytes.len().is_multiple_of(4) {
            return Err(MatteError::selection(format!(
                "encoded selection length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        let mut set = Self::new();
        for (i, chunk) in bytes.chunks_exact(4).enumerate() {
            let id = ObjectId::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if id.is_none() {
                return Err(MatteError::selection(format!(
                    "encoded selection holds an empty id at index {i}"
                )));
            }
            if !id.is_selectable() {
                return Err(MatteError::selection(format!(
                    "encoded selection holds a NaN id at index {i}"
                )));
            }
            if !set.add(id) {
                tracing::warn!(%id, index = i, "duplicate id in encoded selection");
            }
        }
        Ok(set)
    }

    /// Snapshot for persistence.
    pub fn persist(&self) -> PersistedSelection {
        PersistedSelection {
            count: self.order.len() as u32,
            bytes: self.encode(),
        }
    }

    /// Rebuild from a persisted snapshot; `count` must agree with the buffer length.
    pub fn restore(persisted: &PersistedSelection) -> MatteResult<Self> {
        let expected = (persisted.count as usize)
            .checked_mul(4)
            .ok_or_else(|| MatteError::selection("persisted count overflow"))?;
        if persisted.bytes.len() != expected {
            return Err(MatteError::selection(format!(
                "persisted count {} needs {expected} bytes, found {}",
                persisted.count,
                persisted.bytes.len()
            )));
        }
        let set = Self::decode(&persisted.bytes)?;
        if set.len() != persisted.count as usize {
            return Err(MatteError::selection(
                "persisted selection contains duplicate ids",
            ));
        }
        Ok(set)
    }

    /// Add every name of a comma-separated matte list that `manifest` knows.
    ///
    /// Blank items are ignored. Returns the names that did not resolve.
    pub fn extend_from_names(&mut self, list: &str, manifest: &Manifest) -> Vec<String> {
        let mut unresolved = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match manifest.lookup_id(name) {
                Some(id) => {
                    self.add(id);
                }
                None => unresolved.push(name.to_string()),
            }
        }
        if !unresolved.is_empty() {
            tracing::warn!(?unresolved, layer = manifest.layer_name(), "unknown matte names");
        }
        unresolved
    }
}

impl FromIterator<ObjectId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.add(id);
        }
        set
    }
}

#[cfg(test)]
#[path = "../../tests/unit/selection/set.rs"]
mod tests;
