use crate::error::{Error, Result};

/// Passes per axis used by [`Params::new`].
pub const DEFAULT_PASSES: u32 = 1;

/// What happens to the first and last sample of every swept line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Boundary {
    /// Filter the whole line. Accumulators are seeded from the first sample.
    #[default]
    Free,
    /// Leave the first and last sample of every line untouched.
    Preserve,
    /// Start from a zero accumulator and clear both ends after each sweep,
    /// giving glyph masks a hard transparent border.
    ForceZero,
}

/// Where the pixels live inside a byte buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Byte index of the top-left sample.
    pub offset: usize,
    pub width: usize,
    pub height: usize,
    /// Bytes between the starts of consecutive rows.
    pub stride: usize,
    /// Interleaved samples per pixel, 1 to 4.
    pub channels: usize,
}

impl Layout {
    /// Tightly packed rows starting at byte 0.
    ///
    /// An overflowing row size saturates here and is reported by
    /// [`validate`](Self::validate).
    pub const fn packed(width: usize, height: usize, channels: usize) -> Self {
        Self {
            offset: 0,
            width,
            height,
            stride: width.saturating_mul(channels),
            channels,
        }
    }

    pub const fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub const fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Bytes covered by one row of pixels (excluding padding).
    pub(crate) fn row_bytes(&self) -> Result<usize> {
        self.width
            .checked_mul(self.channels)
            .ok_or(Error::GeometryOverflow)
    }

    /// Check this layout against a buffer of `len` bytes.
    ///
    /// The last row does not need trailing padding: the buffer must hold
    /// `offset + (height - 1) * stride + width * channels` bytes.
    pub fn validate(&self, len: usize) -> Result<()> {
        if !(1..=4).contains(&self.channels) {
            return Err(Error::UnsupportedChannels {
                channels: self.channels,
            });
        }
        let row_bytes = self.row_bytes()?;
        if self.stride < row_bytes {
            return Err(Error::StrideTooSmall {
                stride: self.stride,
                row_bytes,
            });
        }
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let needed = (self.height - 1)
            .checked_mul(self.stride)
            .and_then(|n| n.checked_add(row_bytes))
            .and_then(|n| n.checked_add(self.offset))
            .ok_or(Error::GeometryOverflow)?;
        if len < needed {
            return Err(Error::BufferTooShort { len, needed });
        }
        Ok(())
    }
}

/// Blur strength and edge policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
    /// Approximate standard deviation in pixels.
    pub radius: f32,
    /// Sweeps per line per axis. The radius is split across them.
    pub passes: u32,
    pub boundary: Boundary,
}

impl Params {
    pub const fn new(radius: f32) -> Self {
        Self {
            radius,
            passes: DEFAULT_PASSES,
            boundary: Boundary::Free,
        }
    }

    /// Settings for softening a single-channel glyph mask.
    pub const fn glyph(radius: f32) -> Self {
        Self::new(radius).boundary(Boundary::ForceZero)
    }

    pub const fn passes(mut self, passes: u32) -> Self {
        self.passes = passes;
        self
    }

    pub const fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layout_fits_exactly() {
        let layout = Layout::packed(3, 2, 4);
        assert_eq!(layout.stride, 12);
        assert_eq!(layout.validate(24), Ok(()));
        assert_eq!(
            layout.validate(23),
            Err(Error::BufferTooShort { len: 23, needed: 24 })
        );
    }

    #[test]
    fn last_row_needs_no_padding() {
        let layout = Layout::packed(4, 3, 1).with_stride(6).with_offset(2);
        // 2 + 2 * 6 + 4
        assert_eq!(layout.validate(18), Ok(()));
        assert!(layout.validate(17).is_err());
    }

    #[test]
    fn rejects_bad_channels() {
        for channels in [0, 5, 8] {
            assert_eq!(
                Layout::packed(2, 2, channels).validate(1024),
                Err(Error::UnsupportedChannels { channels })
            );
        }
    }

    #[test]
    fn rejects_narrow_stride() {
        assert_eq!(
            Layout::packed(4, 4, 3).with_stride(11).validate(1024),
            Err(Error::StrideTooSmall {
                stride: 11,
                row_bytes: 12
            })
        );
    }

    #[test]
    fn overflow() {
        let layout = Layout {
            offset: 0,
            width: 2,
            height: usize::MAX,
            stride: 8,
            channels: 4,
        };
        assert_eq!(layout.validate(usize::MAX), Err(Error::GeometryOverflow));
    }

    #[test]
    fn packed_row_overflow() {
        let layout = Layout::packed(usize::MAX, 1, 2);
        assert_eq!(layout.stride, usize::MAX);
        assert_eq!(layout.validate(usize::MAX), Err(Error::GeometryOverflow));
    }

    #[test]
    fn empty_geometry_is_valid() {
        assert_eq!(Layout::packed(0, 10, 1).validate(0), Ok(()));
        assert_eq!(Layout::packed(10, 0, 1).validate(0), Ok(()));
    }

    #[test]
    fn presets() {
        let p = Params::glyph(2.0);
        assert_eq!(p.boundary, Boundary::ForceZero);
        assert_eq!(p.passes, DEFAULT_PASSES);
        let p = Params::new(1.5).passes(3).boundary(Boundary::Preserve);
        assert_eq!((p.radius, p.passes, p.boundary), (1.5, 3, Boundary::Preserve));
        assert_eq!(Params::default().radius, 0.0);
    }
}
