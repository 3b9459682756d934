//! Selected object ids and the interactive picker that edits them.

/// Eyedropper picking.
pub mod picker;
/// Insertion-ordered id set and its persisted encoding.
pub mod set;
