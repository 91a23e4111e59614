// Exponential blur: a single-pole IIR low-pass swept forward and backward
// along every row, then every column. Coefficient in Q16, accumulator in Q7.

use crate::error::{Error, Result};
use crate::params::{Boundary, Layout, Params};
use log::{debug, trace};

/// Fractional bits of the decay coefficient.
pub const APREC: u32 = 16;
/// Fractional bits of the running accumulator.
pub const ZPREC: u32 = 7;
/// Radii below this leave the buffer untouched.
pub const MIN_RADIUS: f32 = 0.01;

/// 1 / sqrt(3)
const INV_SQRT_3: f32 = 0.577_350_26;

/// Fixed-point decay coefficient shared by every sweep of one blur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alpha(i32);

impl Alpha {
    /// Derive the coefficient for a blur of roughly `radius` pixels spread over
    /// `passes` sweeps per axis.
    ///
    /// Returns `Ok(None)` when `radius` is under [`MIN_RADIUS`]; no blur should
    /// happen at all in that case.
    ///
    /// The coefficient never drops below 1. Very large radii still darken
    /// [`Boundary::Free`] and [`Boundary::Preserve`] lines, since their
    /// accumulators are seeded with only an `alpha` fraction of the first
    /// sample and barely move afterwards.
    pub fn new(radius: f32, passes: u32) -> Result<Option<Self>> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidRadius(radius));
        }
        if passes == 0 {
            return Err(Error::ZeroPasses);
        }
        if radius < MIN_RADIUS {
            return Ok(None);
        }
        let sigma = radius / passes as f32 * INV_SQRT_3;
        let alpha = ((1 << APREC) as f32 * (1.0 - (-2.3 / (sigma + 1.0)).exp()))
            .round()
            .max(1.0);
        Ok(Some(Self(alpha as i32)))
    }

    /// The Q16 value, in `0..65536`.
    pub const fn get(self) -> i32 {
        self.0
    }
}

#[inline(always)]
fn approx(alpha: i32, sample: u8, acc: i32) -> i32 {
    (alpha * ((i32::from(sample) << ZPREC) - acc)) >> APREC
}

#[inline(always)]
fn blur_pixel<const C: usize>(px: &mut [u8], z: &mut [i32; C], alpha: i32) {
    for (sample, z) in px[..C].iter_mut().zip(z.iter_mut()) {
        *z += approx(alpha, *sample, *z);
        *sample = (*z >> ZPREC) as u8;
    }
}

/// One forward and one backward sweep over `len >= 1` pixels, the first at
/// `start`, each `step` bytes after the previous.
fn blur_line<const C: usize>(
    buf: &mut [u8],
    start: usize,
    len: usize,
    step: usize,
    alpha: i32,
    boundary: Boundary,
) {
    let at = |i: usize| start + i * step;
    let mut z = [0i32; C];

    match boundary {
        Boundary::Free | Boundary::Preserve => {
            for (c, z) in z.iter_mut().enumerate() {
                *z = approx(alpha, buf[start + c], 0);
            }
            let (head, tail) = match boundary {
                Boundary::Preserve => (1, len - 1),
                _ => (0, len),
            };
            for i in 1..tail {
                blur_pixel(&mut buf[at(i)..], &mut z, alpha);
            }
            // the backward sweep picks up where the forward one stopped
            for i in (head..len - 1).rev() {
                blur_pixel(&mut buf[at(i)..], &mut z, alpha);
            }
        }
        Boundary::ForceZero => {
            for i in 1..len {
                blur_pixel(&mut buf[at(i)..], &mut z, alpha);
            }
            buf[at(len - 1)..][..C].fill(0);
            z = [0; C];
            for i in (0..len - 1).rev() {
                blur_pixel(&mut buf[at(i)..], &mut z, alpha);
            }
            buf[start..][..C].fill(0);
        }
    }
}

#[inline]
fn row<const C: usize>(buf: &mut [u8], layout: &Layout, y: usize, alpha: i32, boundary: Boundary) {
    let start = layout.offset + y * layout.stride;
    blur_line::<C>(buf, start, layout.width, C, alpha, boundary);
}

#[inline]
fn column<const C: usize>(
    buf: &mut [u8],
    layout: &Layout,
    x: usize,
    alpha: i32,
    boundary: Boundary,
) {
    let start = layout.offset + x * C;
    blur_line::<C>(buf, start, layout.height, layout.stride, alpha, boundary);
}

fn image<const C: usize>(
    buf: &mut [u8],
    layout: &Layout,
    passes: u32,
    alpha: i32,
    boundary: Boundary,
) {
    for y in 0..layout.height {
        for _ in 0..passes {
            row::<C>(buf, layout, y, alpha, boundary);
        }
    }
    // columns read the horizontally blurred rows, so they go strictly after
    for x in 0..layout.width {
        for _ in 0..passes {
            column::<C>(buf, layout, x, alpha, boundary);
        }
    }
}

macro_rules! dispatch {
    ($channels:expr, $f:ident($($arg:expr),* $(,)?)) => {
        match $channels {
            1 => $f::<1>($($arg),*),
            2 => $f::<2>($($arg),*),
            3 => $f::<3>($($arg),*),
            4 => $f::<4>($($arg),*),
            channels => return Err(Error::UnsupportedChannels { channels }),
        }
    };
}

/// Blur row `y` of `buf` once in each direction.
pub fn blur_row(
    buf: &mut [u8],
    layout: &Layout,
    y: usize,
    alpha: Alpha,
    boundary: Boundary,
) -> Result<()> {
    layout.validate(buf.len())?;
    if y >= layout.height {
        return Err(Error::LineOutOfRange {
            index: y,
            count: layout.height,
        });
    }
    if layout.width == 0 {
        return Ok(());
    }
    dispatch!(layout.channels, row(buf, layout, y, alpha.0, boundary));
    Ok(())
}

/// Blur column `x` of `buf` once in each direction.
pub fn blur_column(
    buf: &mut [u8],
    layout: &Layout,
    x: usize,
    alpha: Alpha,
    boundary: Boundary,
) -> Result<()> {
    layout.validate(buf.len())?;
    if x >= layout.width {
        return Err(Error::LineOutOfRange {
            index: x,
            count: layout.width,
        });
    }
    if layout.height == 0 {
        return Ok(());
    }
    dispatch!(layout.channels, column(buf, layout, x, alpha.0, boundary));
    Ok(())
}

/// Blur the pixels `layout` describes, in place.
///
/// Every row is swept `params.passes` times, then every column. Bytes outside
/// the layout's rectangle are never touched.
///
/// # Errors
///
/// Fails without modifying `buf` when the layout does not fit `buf`, or the
/// parameters are out of range.
pub fn blur_bytes(buf: &mut [u8], layout: &Layout, params: &Params) -> Result<()> {
    layout.validate(buf.len())?;
    let Some(alpha) = Alpha::new(params.radius, params.passes)? else {
        trace!("radius {} is below {MIN_RADIUS}, nothing to blur", params.radius);
        return Ok(());
    };
    if layout.width == 0 || layout.height == 0 {
        return Ok(());
    }
    debug!(
        "exponential blur {}x{}x{} (stride {}): radius {}, {} passes, alpha {}, {:?}",
        layout.width,
        layout.height,
        layout.channels,
        layout.stride,
        params.radius,
        params.passes,
        alpha.0,
        params.boundary,
    );
    dispatch!(
        layout.channels,
        image(buf, layout, params.passes, alpha.0, params.boundary)
    );
    Ok(())
}
