//! Host collaborator model: channel handles, scanline buffers and an in-memory input image.

/// Channel handles and host traits.
pub mod channel;
/// In-memory multi-channel image.
pub mod plane;
/// Scanline and single-pixel buffers.
pub mod row;
