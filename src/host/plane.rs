use std::collections::{BTreeMap, HashMap};

use crate::foundation::core::SamplePoint;
use crate::foundation::error::{MatteError, MatteResult};
use crate::host::channel::{Channel, ChannelLookup, InputImage, RGBA_CHANNEL_NAMES};
use crate::host::row::{Pixel, Row};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One named float channel stored row-major.
pub struct PlaneChannel {
    /// Full channel name (`layer.component`).
    pub name: String,
    /// `width * height` samples, row-major, top row first.
    pub data: Vec<f32>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct PlaneDoc {
    width: u32,
    height: u32,
    channels: Vec<PlaneChannel>,
    #[serde(default)]
    metadata: BTreeMap<String, MetadataValue>,
}

/// Metadata value as stored in JSON: a string when the bytes are UTF-8, a byte array otherwise.
///
/// Strings are read back byte for byte, without UTF-8 validation.
#[derive(Clone, Debug)]
struct MetadataValue(Vec<u8>);

impl serde::Serialize for MetadataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match std::str::from_utf8(&self.0) {
            Ok(s) => serializer.serialize_str(s),
            Err(_) => serializer.serialize_bytes(&self.0),
        }
    }
}

impl<'de> serde::Deserialize<'de> for MetadataValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <serde_bytes::ByteBuf as serde::Deserialize>::deserialize(deserializer)
            .map(|b| Self(b.into_vec()))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "PlaneDoc", into = "PlaneDoc")]
/// In-memory multi-channel float image acting as a host input.
///
/// The RGBA channels always exist and occupy the fixed [`Channel::RGBA`] handles; any other
/// channel gets the next handle in insertion order.
pub struct ImagePlane {
    width: u32,
    height: u32,
    channels: Vec<PlaneChannel>,
    by_name: HashMap<String, Channel>,
    metadata: BTreeMap<String, Vec<u8>>,
}

impl ImagePlane {
    /// Create a plane with zeroed RGBA channels and no metadata.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        let mut plane = Self {
            width,
            height,
            channels: Vec::with_capacity(4),
            by_name: HashMap::new(),
            metadata: BTreeMap::new(),
        };
        for name in RGBA_CHANNEL_NAMES {
            plane.push_channel(name.to_string(), vec![0.0; len]);
        }
        plane
    }

    /// Build a plane from named channels. Missing RGBA channels are zero-filled.
    pub fn from_channels(
        width: u32,
        height: u32,
        channels: impl IntoIterator<Item = PlaneChannel>,
        metadata: BTreeMap<String, Vec<u8>>,
    ) -> MatteResult<Self> {
        let mut plane = Self::new(width, height);
        for ch in channels {
            plane.set_channel(ch.name, ch.data)?;
        }
        plane.metadata = metadata;
        Ok(plane)
    }

    /// Builder form of [`ImagePlane::set_channel`].
    pub fn with_channel(mut self, name: impl Into<String>, data: Vec<f32>) -> MatteResult<Self> {
        self.set_channel(name, data)?;
        Ok(self)
    }

    /// Builder form of [`ImagePlane::set_metadata`].
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.set_metadata(key, value);
        self
    }

    /// Insert or replace a channel, returning its handle.
    pub fn set_channel(&mut self, name: impl Into<String>, data: Vec<f32>) -> MatteResult<Channel> {
        let name = name.into();
        let expected = self.pixel_count();
        if data.len() != expected {
            return Err(MatteError::validation(format!(
                "channel '{name}' has {} samples, expected {expected}",
                data.len()
            )));
        }
        if let Some(&ch) = self.by_name.get(&name) {
            self.channels[ch.0 as usize].data = data;
            return Ok(ch);
        }
        if self.channels.len() >= usize::from(u16::MAX) {
            return Err(MatteError::validation("too many channels"));
        }
        Ok(self.push_channel(name, data))
    }

    /// Insert or replace a metadata entry. Values are raw bytes.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Set one sample. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, channel: Channel, x: u32, y: u32, v: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + x as usize;
        if let Some(ch) = self.channels.get_mut(channel.0 as usize) {
            ch.data[idx] = v;
        }
    }

    /// Read one sample. Out-of-bounds coordinates and unknown channels read as `0.0`.
    pub fn pixel(&self, channel: Channel, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        let idx = (y as usize) * (self.width as usize) + x as usize;
        self.channels
            .get(channel.0 as usize)
            .map_or(0.0, |ch| ch.data[idx])
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Named channels in handle order.
    pub fn plane_channels(&self) -> &[PlaneChannel] {
        &self.channels
    }

    /// Convert RGBA to 8-bit straight RGBA, clamping to `[0, 1]`. NaN maps to 0.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let len = self.pixel_count();
        let mut out = Vec::with_capacity(len * 4);
        for i in 0..len {
            for ch in Channel::RGBA {
                let v = self.channels[ch.0 as usize].data[i];
                let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
                out.push((v * 255.0).round() as u8);
            }
        }
        out
    }

    fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    fn push_channel(&mut self, name: String, data: Vec<f32>) -> Channel {
        let ch = Channel(self.channels.len() as u16);
        self.by_name.insert(name.clone(), ch);
        self.channels.push(PlaneChannel { name, data });
        ch
    }
}

impl ChannelLookup for ImagePlane {
    fn find_channel(&self, name: &str) -> Option<Channel> {
        self.by_name.get(name).copied()
    }

    fn channels(&self) -> Vec<Channel> {
        (0..self.channels.len() as u16).map(Channel).collect()
    }

    fn channel_name(&self, channel: Channel) -> Option<&str> {
        self.channels
            .get(channel.0 as usize)
            .map(|ch| ch.name.as_str())
    }
}

impl InputImage for ImagePlane {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fetch_row(&self, y: i32, x: i32, r: i32) -> Row {
        let mut row = Row::new(x, r);
        let in_rows = y >= 0 && (y as u32) < self.height;
        let lo = x.max(0);
        let hi = r.min(self.width as i32);
        for (idx, ch) in self.channels.iter().enumerate() {
            let out = row.writable(Channel(idx as u16));
            if !in_rows || lo >= hi {
                continue;
            }
            let base = (y as usize) * (self.width as usize);
            let src = &ch.data[base + lo as usize..base + hi as usize];
            out[(lo - x) as usize..(hi - x) as usize].copy_from_slice(src);
        }
        row
    }

    fn sample(&self, point: SamplePoint) -> Option<Pixel> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let (px, py) = (point.x.floor(), point.y.floor());
        if px < 0.0 || py < 0.0 || px >= self.width as f32 || py >= self.height as f32 {
            return None;
        }
        let (px, py) = (px as u32, py as u32);
        let mut pixel = Pixel::new();
        for idx in 0..self.channels.len() {
            let ch = Channel(idx as u16);
            pixel.set(ch, self.pixel(ch, px, py));
        }
        Some(pixel)
    }

    fn metadata(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.metadata
    }
}

impl TryFrom<PlaneDoc> for ImagePlane {
    type Error = MatteError;

    fn try_from(doc: PlaneDoc) -> Result<Self, Self::Error> {
        let metadata = doc.metadata.into_iter().map(|(k, v)| (k, v.0)).collect();
        Self::from_channels(doc.width, doc.height, doc.channels, metadata)
    }
}

impl From<ImagePlane> for PlaneDoc {
    fn from(plane: ImagePlane) -> Self {
        Self {
            width: plane.width,
            height: plane.height,
            channels: plane.channels,
            metadata: plane
                .metadata
                .into_iter()
                .map(|(k, v)| (k, MetadataValue(v)))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/plane.rs"]
mod tests;
