//! Object name manifests and the crypto layers that publish them.

/// Layer discovery from image metadata.
pub mod catalog;
/// Name ↔ id manifest parsing.
pub mod store;
