//! Borrowed views of one image plane: width, height, stride in bytes and the
//! pixel format of the bytes.
//!
//! Construction validates the geometry once so the operations in
//! [`crate::decode`] and [`crate::encode`] can hand rows straight to kernels.

use crate::error::{Error, Result};
use crate::format::PixelFormat;

/// Check that `len` bytes can hold `height` rows of `width` pixels at `stride`.
///
/// The last row only needs its meaningful bytes; trailing padding after it
/// may be absent, as in sub-image views.
fn check_plane(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
) -> Result<usize> {
    let row_bytes = format.row_bytes(width).ok_or(Error::InvalidStride {
        stride,
        row_bytes: usize::MAX,
    })?;
    if width == 0 || height == 0 || stride < row_bytes || stride % format.bytes_per_sample() != 0
    {
        return Err(Error::InvalidStride { stride, row_bytes });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_bytes))
        .ok_or(Error::BufferTooSmall {
            needed: usize::MAX,
            actual: len,
        })?;
    if len < needed {
        return Err(Error::BufferTooSmall {
            needed,
            actual: len,
        });
    }
    Ok(row_bytes)
}

/// Immutable plane view.
#[derive(Clone, Copy, Debug)]
pub struct PlaneRef<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
}

impl<'a> PlaneRef<'a> {
    /// Wrap `data` as a `width × height` plane with rows `stride` bytes apart.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStride`] for a zero dimension, a stride shorter than
    /// one row or not a whole number of samples; [`Error::BufferTooSmall`]
    /// if `data` ends before the last row does.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        check_plane(data.len(), width, height, stride, format)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Tightly packed plane: stride equals the row length.
    pub fn packed(data: &'a [u8], width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        let stride = packed_stride(width, format)?;
        Self::new(data, width, height, stride, format)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance between row starts, in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Meaningful bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.width * self.format.bytes_per_pixel()
    }

    /// The whole backing slice, padding included.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Meaningful bytes of row `y`.
    ///
    /// # Panics
    ///
    /// If `y >= height`.
    pub fn row(&self, y: usize) -> &'a [u8] {
        assert!(y < self.height, "row {y} out of {}", self.height);
        &self.data[y * self.stride..][..self.row_bytes()]
    }

    /// Rows top to bottom, padding excluded.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Stride in samples rather than bytes.
    pub(crate) fn stride_samples(&self) -> usize {
        self.stride / self.format.bytes_per_sample()
    }

    /// True when the slice covers the padding of the last row too.
    pub(crate) fn covers_full_stride(&self) -> bool {
        self.stride
            .checked_mul(self.height)
            .is_some_and(|n| self.data.len() >= n)
    }
}

/// Mutable plane view.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
}

impl<'a> PlaneMut<'a> {
    /// Mutable counterpart of [`PlaneRef::new`], with the same checks.
    pub fn new(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        check_plane(data.len(), width, height, stride, format)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    pub fn packed(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        let stride = packed_stride(width, format)?;
        Self::new(data, width, height, stride, format)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn row_bytes(&self) -> usize {
        self.width * self.format.bytes_per_pixel()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &*self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }

    /// Give the backing slice back.
    pub fn into_bytes(self) -> &'a mut [u8] {
        self.data
    }

    /// Reborrow as an immutable view.
    pub fn as_plane_ref(&self) -> PlaneRef<'_> {
        PlaneRef {
            data: &*self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
        }
    }

    /// # Panics
    ///
    /// If `y >= height`.
    pub fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.height, "row {y} out of {}", self.height);
        let n = self.row_bytes();
        &self.data[y * self.stride..][..n]
    }

    /// # Panics
    ///
    /// If `y >= height`.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of {}", self.height);
        let n = self.row_bytes();
        &mut self.data[y * self.stride..][..n]
    }

    pub(crate) fn stride_samples(&self) -> usize {
        self.stride / self.format.bytes_per_sample()
    }

    pub(crate) fn covers_full_stride(&self) -> bool {
        self.stride
            .checked_mul(self.height)
            .is_some_and(|n| self.data.len() >= n)
    }

    /// Re-describe the same bytes after an in-place transform.
    pub(crate) fn reshape(
        self,
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        Self::new(self.data, width, height, stride, format)
    }
}

/// Row length in bytes for a packed plane of `width` pixels.
///
/// # Errors
///
/// [`Error::InvalidStride`] if `width` is zero or the row length overflows.
pub fn packed_stride(width: usize, format: PixelFormat) -> Result<usize> {
    match format.row_bytes(width) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidStride {
            stride: 0,
            row_bytes: 0,
        }),
    }
}
