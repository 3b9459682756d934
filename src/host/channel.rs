use std::collections::BTreeMap;

use crate::foundation::core::SamplePoint;
use crate::host::row::{Pixel, Row};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Opaque channel handle handed out by a host.
///
/// Handles order the channel mask. The four RGBA handles are fixed across hosts.
pub struct Channel(pub u16);

impl Channel {
    /// `rgba.red`.
    pub const RED: Channel = Channel(0);
    /// `rgba.green`.
    pub const GREEN: Channel = Channel(1);
    /// `rgba.blue`.
    pub const BLUE: Channel = Channel(2);
    /// `rgba.alpha`.
    pub const ALPHA: Channel = Channel(3);
    /// The RGBA quartet in output order.
    pub const RGBA: [Channel; 4] = [Self::RED, Self::GREEN, Self::BLUE, Self::ALPHA];

    /// Return `true` for one of the fixed RGBA handles.
    pub fn is_rgba(self) -> bool {
        self.0 < 4
    }
}

/// Full names of the fixed RGBA channels, indexed like [`Channel::RGBA`].
pub const RGBA_CHANNEL_NAMES: [&str; 4] = ["rgba.red", "rgba.green", "rgba.blue", "rgba.alpha"];

/// Channel-by-name lookup provided by the host.
pub trait ChannelLookup {
    /// Resolve a full channel name (`layer.component`) to a handle.
    fn find_channel(&self, name: &str) -> Option<Channel>;

    /// Every channel available on the input, in mask order.
    fn channels(&self) -> Vec<Channel>;

    /// Full name of a channel handle.
    fn channel_name(&self, channel: Channel) -> Option<&str>;
}

/// Read access to the node's input image.
pub trait InputImage: ChannelLookup {
    /// Image format as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Fetch `[x, r)` of scanline `y` for every input channel.
    ///
    /// Pixels outside the image read as zero.
    fn fetch_row(&self, y: i32, x: i32, r: i32) -> Row;

    /// Point-sample every channel of the pixel containing `point`.
    ///
    /// Returns `None` when `point` is outside the image.
    fn sample(&self, point: SamplePoint) -> Option<Pixel>;

    /// Metadata bundle attached to the input. Values are raw bytes; manifests carry binary ids.
    fn metadata(&self) -> &BTreeMap<String, Vec<u8>>;
}
