#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Output mode toggles. Every combination is valid; `matte_only` wins over `enable_preview`.
pub struct CompositingFlags {
    /// Show the id hash preview blended with the matte.
    pub enable_preview: bool,
    /// Write the matte into RGB.
    pub matte_only: bool,
    /// Drop the active layer's crypto channels from the output.
    pub remove_channels: bool,
    /// Divide the matte by the input alpha.
    pub enable_unpremultiply: bool,
    /// Each pick replaces the selection instead of extending it.
    pub single_selection: bool,
}

impl Default for CompositingFlags {
    fn default() -> Self {
        Self {
            enable_preview: true,
            matte_only: false,
            remove_channels: false,
            enable_unpremultiply: false,
            single_selection: false,
        }
    }
}
