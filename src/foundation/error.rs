/// Convenience result type used across the crate.
pub type MatteResult<T> = Result<T, MatteError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MatteError {
    /// A manifest (or one of its entries) could not be decoded.
    #[error("manifest error in layer '{layer}' at '{entry}': {reason}")]
    ManifestParse {
        /// Layer the manifest belongs to.
        layer: String,
        /// Offending entry name, or `<root>` for document-level failures.
        entry: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Persisted selection bytes are inconsistent.
    #[error("selection error: {0}")]
    Selection(String),

    /// Invalid user-provided settings or host data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MatteError {
    /// Build a [`MatteError::ManifestParse`] value.
    pub fn manifest(
        layer: impl Into<String>,
        entry: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ManifestParse {
            layer: layer.into(),
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`MatteError::Selection`] value.
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    /// Build a [`MatteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MatteError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for MatteError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
