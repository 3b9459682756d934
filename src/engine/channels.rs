use crate::foundation::core::{LEVEL_COUNT, LevelValues};
use crate::host::channel::{Channel, ChannelLookup};
use crate::host::row::{Pixel, Row};

/// Channel-layer suffix of each crypto level.
pub const LEVEL_SUFFIXES: [&str; LEVEL_COUNT] = ["00", "01", "02"];

const COMPONENTS: [&str; 4] = ["red", "green", "blue", "alpha"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Red/green/blue/alpha handles of one crypto level; `None` when the host lacks the channel.
pub struct LevelChannels {
    /// First id.
    pub red: Option<Channel>,
    /// Coverage of the first id.
    pub green: Option<Channel>,
    /// Second id.
    pub blue: Option<Channel>,
    /// Coverage of the second id.
    pub alpha: Option<Channel>,
}

impl LevelChannels {
    /// Look up `<base><suffix>.<component>` for all four components.
    pub fn resolve(base: &str, level: usize, lookup: &impl ChannelLookup) -> Self {
        let suffix = LEVEL_SUFFIXES[level];
        let [red, green, blue, alpha] =
            COMPONENTS.map(|c| lookup.find_channel(&format!("{base}{suffix}.{c}")));
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Handles in `[red, green, blue, alpha]` order.
    pub fn as_array(&self) -> [Option<Channel>; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Return `true` only if all four channels resolved.
    pub fn is_present(&self) -> bool {
        self.as_array().iter().all(Option::is_some)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Channel handles of every level of one crypto layer.
pub struct ResolvedChannels {
    /// Levels `00`, `01`, `02`.
    pub levels: [LevelChannels; LEVEL_COUNT],
}

impl ResolvedChannels {
    /// Decoding is possible only when level 0 is complete; higher levels are optional.
    pub fn is_fully_present(&self) -> bool {
        self.levels[0].is_present()
    }

    /// Every resolved crypto channel, in level/component order.
    pub fn crypto_channels(&self) -> Vec<Channel> {
        self.levels
            .iter()
            .flat_map(|l| l.as_array())
            .flatten()
            .collect()
    }

    /// Level values at absolute coordinate `i`. Unresolved channels read as `0.0`.
    pub fn read_row(&self, row: &Row, i: i32) -> [LevelValues; LEVEL_COUNT] {
        self.levels
            .map(|l| l.as_array().map(|c| c.map_or(0.0, |c| row.value(c, i))))
    }

    /// Level values of a sampled pixel. Unresolved or unsampled channels read as `0.0`.
    pub fn read_pixel(&self, pixel: &Pixel) -> [LevelValues; LEVEL_COUNT] {
        self.levels.map(|l| {
            l.as_array()
                .map(|c| c.and_then(|c| pixel.get(c)).unwrap_or(0.0))
        })
    }
}

/// Resolve the channel quadruplets of every level of `base`.
pub fn resolve_channels(base: &str, lookup: &impl ChannelLookup) -> ResolvedChannels {
    ResolvedChannels {
        levels: std::array::from_fn(|level| LevelChannels::resolve(base, level, lookup)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/channels.rs"]
mod tests;
