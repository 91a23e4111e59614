use thiserror::Error;

/// Errors raised before any pixel is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid geometry: {channels} channels, expected 1 to 4")]
    UnsupportedChannels { channels: usize },
    #[error("invalid geometry: stride {stride} is smaller than a {row_bytes} byte row")]
    StrideTooSmall { stride: usize, row_bytes: usize },
    #[error("invalid geometry: buffer holds {len} bytes, {needed} required")]
    BufferTooShort { len: usize, needed: usize },
    #[error("invalid geometry: size overflows usize")]
    GeometryOverflow,
    #[error("blur radius must be finite and non-negative, got {0}")]
    InvalidRadius(f32),
    #[error("pass count must be at least 1")]
    ZeroPasses,
    #[error("line {index} is outside 0..{count}")]
    LineOutOfRange { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
