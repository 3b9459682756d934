//! Scanline decoding: channel resolution, per-pixel matte math and row compositing.
//!
//! Nothing in here allocates per pixel or logs; failures degrade to pass-through.

/// Crypto level channel resolution.
pub mod channels;
/// Row-level compositing.
pub mod compositor;
/// Output toggles.
pub mod flags;
/// Per-pixel decode and match.
pub mod pixel;
