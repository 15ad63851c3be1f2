//! Error types for tailor.
//!
//! Every condition is checked before a kernel runs. When an operation
//! returns an error the destination may still hold stale data and must be
//! discarded by the caller.

/// Errors returned by plane construction and the transcoding operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No kernel exists for the requested combination of channels, depth and
    /// alpha handling. Always a caller error.
    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(&'static str),

    /// The buffer is shorter than its stride and row count require.
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes required by stride × rows
        needed: usize,
        /// Bytes actually supplied
        actual: usize,
    },

    /// The codec decoded fewer pixels than the container header promised.
    #[error(
        "corrupted image (dimensions in header: {header_width}x{header_height}, \
         decoded dimensions: {decoded_width}x{decoded_height})"
    )]
    CorruptedImageDimensions {
        /// Width from the container header
        header_width: usize,
        /// Height from the container header
        header_height: usize,
        /// Width the codec produced
        decoded_width: usize,
        /// Height the codec produced
        decoded_height: usize,
    },

    /// Stride is shorter than one row, not a whole number of samples, or the
    /// plane has a zero dimension.
    #[error("invalid stride {stride} for row of {row_bytes} bytes")]
    InvalidStride {
        /// Stride in bytes
        stride: usize,
        /// Meaningful bytes per row
        row_bytes: usize,
    },

    /// Source and destination planes describe different image sizes.
    #[error("plane size mismatch: {src_width}x{src_height} vs {dst_width}x{dst_height}")]
    DimensionMismatch {
        /// Source width
        src_width: usize,
        /// Source height
        src_height: usize,
        /// Destination width
        dst_width: usize,
        /// Destination height
        dst_height: usize,
    },
}

/// Result type for tailor operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;
