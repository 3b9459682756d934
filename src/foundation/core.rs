use std::hash::{Hash, Hasher};

/// Straight four-channel float pixel `[r, g, b, a]`.
pub type Rgba = [f32; 4];

/// Raw `[red, green, blue, alpha]` values of one crypto level at one pixel.
pub type LevelValues = [f32; 4];

/// Number of crypto levels carried per layer.
pub const LEVEL_COUNT: usize = 3;

/// Object identifier stored in a crypto channel.
///
/// IDs are float-encoded hashes produced upstream. A stored value of `0.0` means "no object"
/// and is represented by [`ObjectId::None`]; the constructors never put `±0.0` in
/// [`ObjectId::Value`], and [`ObjectId::is_none`] treats a hand-built one as empty.
/// Equality and hashing compare the exact bit pattern; there is no epsilon.
#[derive(Clone, Copy, Debug, Default)]
pub enum ObjectId {
    /// Empty slot (stored value `0.0`).
    #[default]
    None,
    /// A real object hash.
    Value(f32),
}

impl ObjectId {
    /// Build an id from a raw channel value, mapping `±0.0` to [`ObjectId::None`].
    pub fn from_f32(v: f32) -> Self {
        if v == 0.0 { Self::None } else { Self::Value(v) }
    }

    /// Build an id from four native-endian bytes.
    pub fn from_ne_bytes(bytes: [u8; 4]) -> Self {
        Self::from_f32(f32::from_ne_bytes(bytes))
    }

    /// Raw channel value; [`ObjectId::None`] is `0.0`.
    pub fn to_f32(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Value(v) => v,
        }
    }

    /// Native-endian byte encoding of [`ObjectId::to_f32`].
    pub fn to_ne_bytes(self) -> [u8; 4] {
        self.to_f32().to_ne_bytes()
    }

    /// Bit pattern of the raw value.
    pub fn to_bits(self) -> u32 {
        self.to_f32().to_bits()
    }

    /// Return `true` for the empty slot. A hand-built `Value(±0.0)` counts as empty too.
    pub fn is_none(self) -> bool {
        self.to_f32() == 0.0
    }

    /// Return `true` if the id can be selected: not empty and not NaN.
    ///
    /// A NaN id never compares equal as a float, so it can never match a pixel.
    pub fn is_selectable(self) -> bool {
        !self.is_none() && !self.to_f32().is_nan()
    }
}

impl PartialEq for ObjectId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Value(a), Self::Value(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for ObjectId {}

impl Hash for ObjectId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::None => state.write_u8(0),
            Self::Value(v) => {
                state.write_u8(1);
                state.write_u32(v.to_bits());
            }
        }
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Value(v) => write!(f, "{:08x}", v.to_bits()),
        }
    }
}

/// Image-space coordinate captured by a host eyedropper.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SamplePoint {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
}

impl SamplePoint {
    /// Create a sample point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
