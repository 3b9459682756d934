use crate::engine::channels::ResolvedChannels;
use crate::engine::flags::CompositingFlags;
use crate::engine::pixel::decode_pixel;
use crate::host::channel::Channel;
use crate::host::row::Row;
use crate::selection::set::SelectionSet;

/// Copy every channel of `input` into `out` unchanged.
pub fn passthrough_row(input: &Row, out: &mut Row) {
    for ch in input.channels() {
        out.copy_channel(input, ch);
    }
}

/// Decode and composite `[out.x(), out.r())`.
///
/// RGBA is rewritten from the crypto levels; every other input channel is copied verbatim,
/// except the layer's own crypto channels when `remove_channels` is set. Falls back to
/// [`passthrough_row`] when level 0 is incomplete.
pub fn composite_row(
    input: &Row,
    channels: &ResolvedChannels,
    selection: &SelectionSet,
    flags: &CompositingFlags,
    out: &mut Row,
) {
    if !channels.is_fully_present() {
        passthrough_row(input, out);
        return;
    }

    for i in out.x()..out.r() {
        let levels = channels.read_row(input, i);
        let original = Channel::RGBA.map(|c| input.value(c, i));
        let rgba = decode_pixel(&levels, original, selection, flags);
        for (c, v) in Channel::RGBA.into_iter().zip(rgba) {
            out.set(c, i, v);
        }
    }

    let removed = if flags.remove_channels {
        channels.crypto_channels()
    } else {
        Vec::new()
    };
    for ch in input.channels() {
        if ch.is_rgba() || removed.contains(&ch) {
            continue;
        }
        out.copy_channel(input, ch);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/compositor.rs"]
mod tests;
