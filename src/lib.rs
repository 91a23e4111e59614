#![doc = include_str!("../README.md")]
mod error;
mod expblur;
mod params;

pub use crate::error::{Error, Result};
pub use crate::expblur::{blur_bytes, blur_column, blur_row, Alpha, APREC, MIN_RADIUS, ZPREC};
pub use crate::params::{Boundary, Layout, Params, DEFAULT_PASSES};

use fimg::Image;
use umath::FF32;

/// Blur a image.
pub fn blur<const CHANNELS: usize, T: AsRef<[u8]> + AsMut<[u8]>>(
    image: &mut Image<T, CHANNELS>,
    radius: FF32,
) -> Result<()> {
    blur_with(image, &Params::new(*radius))
}

/// Blur a image with explicit pass count and edge policy.
pub fn blur_with<const CHANNELS: usize, T: AsRef<[u8]> + AsMut<[u8]>>(
    image: &mut Image<T, CHANNELS>,
    params: &Params,
) -> Result<()> {
    let layout = Layout::packed(image.width() as usize, image.height() as usize, CHANNELS);
    // SAFETY: the buffer length is not changed
    let buf: &mut [u8] = unsafe { image.buffer_mut() }.as_mut();
    blur_bytes(buf, &layout, params)
}

/// Soften a single-channel glyph coverage bitmap, leaving a zero border.
///
/// `stride` is the distance in bytes between rows of `bitmap`, as written by
/// a glyph rasterizer into a larger atlas.
pub fn blur_glyph(
    bitmap: &mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    radius: f32,
) -> Result<()> {
    let layout = Layout::packed(width, height, 1).with_stride(stride);
    blur_bytes(bitmap, &layout, &Params::glyph(radius))
}
