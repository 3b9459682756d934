use std::collections::BTreeMap;

use crate::host::channel::Channel;

#[derive(Clone, Debug, PartialEq)]
/// Scanline buffer covering the half-open pixel span `[x, r)`.
///
/// Values are addressed by absolute pixel coordinate. Channels are kept in mask order.
pub struct Row {
    x: i32,
    r: i32,
    planes: BTreeMap<Channel, Vec<f32>>,
}

impl Row {
    /// Create an empty row. A span with `r < x` is treated as empty.
    pub fn new(x: i32, r: i32) -> Self {
        Self {
            x,
            r: r.max(x),
            planes: BTreeMap::new(),
        }
    }

    /// Inclusive left edge.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Exclusive right edge.
    pub fn r(&self) -> i32 {
        self.r
    }

    /// Number of pixels in the span.
    pub fn width(&self) -> usize {
        (self.r - self.x) as usize
    }

    /// Channels present on this row, in mask order.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.planes.keys().copied()
    }

    /// Return `true` if `channel` has been written or fetched.
    pub fn has(&self, channel: Channel) -> bool {
        self.planes.contains_key(&channel)
    }

    /// Channel samples for the whole span.
    pub fn get(&self, channel: Channel) -> Option<&[f32]> {
        self.planes.get(&channel).map(Vec::as_slice)
    }

    /// Value at absolute coordinate `i`; absent channels and out-of-span reads are `0.0`.
    pub fn value(&self, channel: Channel, i: i32) -> f32 {
        if i < self.x || i >= self.r {
            return 0.0;
        }
        self.planes
            .get(&channel)
            .map_or(0.0, |p| p[(i - self.x) as usize])
    }

    /// Mutable samples for `channel`, zero-filled on first access.
    pub fn writable(&mut self, channel: Channel) -> &mut [f32] {
        let width = self.width();
        self.planes
            .entry(channel)
            .or_insert_with(|| vec![0.0; width])
            .as_mut_slice()
    }

    /// Write one value at absolute coordinate `i`. Out-of-span writes are ignored.
    pub fn set(&mut self, channel: Channel, i: i32, v: f32) {
        if i < self.x || i >= self.r {
            return;
        }
        let x = self.x;
        self.writable(channel)[(i - x) as usize] = v;
    }

    /// Copy `channel` from `src` over the overlapping span.
    pub fn copy_channel(&mut self, src: &Row, channel: Channel) {
        let x = self.x.max(src.x);
        let r = self.r.min(src.r);
        if x >= r {
            self.writable(channel);
            return;
        }
        let Some(from) = src.get(channel) else {
            self.writable(channel);
            return;
        };
        let from = &from[(x - src.x) as usize..(r - src.x) as usize];
        let dst_x = self.x;
        let to = self.writable(channel);
        to[(x - dst_x) as usize..(r - dst_x) as usize].copy_from_slice(from);
    }

    /// Drop a channel from the row.
    pub fn remove(&mut self, channel: Channel) {
        self.planes.remove(&channel);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Every channel value of a single sampled pixel.
pub struct Pixel {
    values: BTreeMap<Channel, f32>,
}

impl Pixel {
    /// Create an empty pixel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of `channel`.
    pub fn set(&mut self, channel: Channel, v: f32) {
        self.values.insert(channel, v);
    }

    /// Value of `channel`, if the host provided it.
    pub fn get(&self, channel: Channel) -> Option<f32> {
        self.values.get(&channel).copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/row.rs"]
mod tests;
