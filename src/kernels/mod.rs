//! Row kernels over raw byte planes.
//!
//! Each kernel is one fixed combination of source container, destination
//! container, channel count and order swap, so the pixel loop never branches
//! on format. Lookups resolve a [`KernelKey`] to a function pointer once per
//! plane; each pointer dispatches once per call to the best SIMD tier via
//! `incant!` and then walks every row.
//!
//! Strides inside this module are in samples of the respective container,
//! not bytes. Callers in [`crate::decode`] and [`crate::encode`] validate
//! every length before a kernel runs; kernels index-panic rather than
//! silently truncate if that contract is broken.

use crate::error::{Error, Result};
use crate::format::{BitDepth, Container};
use archmage::incant;
use paste::paste;

// ===========================================================================
// Kernel tables
//
// One entry per specialization: (name, source container, destination
// container, channels, swap channel 0 and 2). The tier files and the
// dispatchers below expand the same lists.
// ===========================================================================

macro_rules! copy_kernels {
    ($callback:ident) => {
        $callback! {
            (u8_u8_c1, U8, U8, 1, false),
            (u8_u8_c2, U8, U8, 2, false),
            (u8_u8_c3, U8, U8, 3, false),
            (u8_u8_c3_swap, U8, U8, 3, true),
            (u8_u8_c4, U8, U8, 4, false),
            (u8_u8_c4_swap, U8, U8, 4, true),
            (u16_u16_c1, U16, U16, 1, false),
            (u16_u16_c2, U16, U16, 2, false),
            (u16_u16_c3, U16, U16, 3, false),
            (u16_u16_c3_swap, U16, U16, 3, true),
            (u16_u16_c4, U16, U16, 4, false),
            (u16_u16_c4_swap, U16, U16, 4, true),
            (u8_u16_c1, U8, U16, 1, false),
            (u8_u16_c2, U8, U16, 2, false),
            (u8_u16_c3, U8, U16, 3, false),
            (u8_u16_c3_swap, U8, U16, 3, true),
            (u8_u16_c4, U8, U16, 4, false),
            (u8_u16_c4_swap, U8, U16, 4, true),
            (u16_u8_c1, U16, U8, 1, false),
            (u16_u8_c2, U16, U8, 2, false),
            (u16_u8_c3, U16, U8, 3, false),
            (u16_u8_c3_swap, U16, U8, 3, true),
            (u16_u8_c4, U16, U8, 4, false),
            (u16_u8_c4_swap, U16, U8, 4, true),
        }
    };
}

// In place the destination container may not be wider than the source.
macro_rules! in_place_kernels {
    ($callback:ident) => {
        $callback! {
            (u8_u8_c1, U8, U8, 1, false),
            (u8_u8_c2, U8, U8, 2, false),
            (u8_u8_c3, U8, U8, 3, false),
            (u8_u8_c3_swap, U8, U8, 3, true),
            (u8_u8_c4, U8, U8, 4, false),
            (u8_u8_c4_swap, U8, U8, 4, true),
            (u16_u16_c1, U16, U16, 1, false),
            (u16_u16_c2, U16, U16, 2, false),
            (u16_u16_c3, U16, U16, 3, false),
            (u16_u16_c3_swap, U16, U16, 3, true),
            (u16_u16_c4, U16, U16, 4, false),
            (u16_u16_c4_swap, U16, U16, 4, true),
            (u16_u8_c1, U16, U8, 1, false),
            (u16_u8_c2, U16, U8, 2, false),
            (u16_u8_c3, U16, U8, 3, false),
            (u16_u8_c3_swap, U16, U8, 3, true),
            (u16_u8_c4, U16, U8, 4, false),
            (u16_u8_c4_swap, U16, U8, 4, true),
        }
    };
}

// (name, source container, destination container)
macro_rules! split_kernels {
    ($callback:ident) => {
        $callback! {
            (u8_u8, U8, U8),
            (u16_u16, U16, U16),
            (u8_u16, U8, U16),
            (u16_u8, U16, U8),
        }
    };
}

// (name, container, channels with alpha last)
macro_rules! unpremultiply_kernels {
    ($callback:ident) => {
        $callback! {
            (u8_c2, U8, 2),
            (u8_c4, U8, 4),
            (u16_c2, U16, 2),
            (u16_c4, U16, 4),
        }
    };
}

// (name, swap)
macro_rules! composite_kernels {
    ($callback:ident) => {
        $callback! {
            (keep, false),
            (swap, true),
        }
    };
}

mod rows;

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2::*;


// ===========================================================================
// Kernel parameters
// ===========================================================================

/// Depth change applied to every sample as `(v << left) >> right`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Shift {
    pub(crate) left: u32,
    pub(crate) right: u32,
}

impl Shift {
    pub(crate) const NONE: Self = Self { left: 0, right: 0 };

    /// Shift that maps samples of depth `from` onto depth `to`.
    pub(crate) const fn between(from: BitDepth, to: BitDepth) -> Self {
        let (f, t) = (from.bits(), to.bits());
        if t >= f {
            Self { left: t - f, right: 0 }
        } else {
            Self { left: 0, right: f - t }
        }
    }

    pub(crate) const fn is_none(self) -> bool {
        self.left == 0 && self.right == 0
    }

    #[inline(always)]
    pub(crate) const fn apply(self, v: u32) -> u32 {
        (v << self.left) >> self.right
    }
}

/// Plane walk for the conversion and composite kernels.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Geometry {
    pub(crate) width: usize,
    pub(crate) rows: usize,
    /// Source stride in source samples
    pub(crate) src_stride: usize,
    /// Destination stride in destination samples
    pub(crate) dst_stride: usize,
    pub(crate) shift: Shift,
}

/// Plane walk for the luma/alpha split.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SplitGeometry {
    pub(crate) width: usize,
    pub(crate) rows: usize,
    pub(crate) src_stride: usize,
    pub(crate) luma_stride: usize,
    pub(crate) alpha_stride: usize,
    pub(crate) shift: Shift,
}

/// Plane walk for un-premultiplication.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AlphaGeometry {
    pub(crate) width: usize,
    pub(crate) rows: usize,
    pub(crate) stride: usize,
    /// Largest sample value at the plane's bit depth
    pub(crate) max: u32,
}

/// Selects a conversion kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KernelKey {
    pub(crate) src: Container,
    pub(crate) dst: Container,
    pub(crate) channels: usize,
    /// Exchange channels 0 and 2 (RGB ↔ BGR)
    pub(crate) swap: bool,
}

pub(crate) type CopyKernel = fn(&[u8], &mut [u8], &Geometry);
pub(crate) type InPlaceKernel = fn(&mut [u8], &Geometry);
pub(crate) type SplitKernel = fn(&[u8], &mut [u8], &mut [u8], &SplitGeometry);
pub(crate) type UnpremultiplyKernel = fn(&mut [u8], &AlphaGeometry);
pub(crate) type CompositeKernel = fn(&[u8], &mut [u8], &Geometry);

// ===========================================================================
// Dispatchers and lookups
// ===========================================================================

macro_rules! dispatch_copy {
    ($(($name:ident, $s:ident, $d:ident, $ch:literal, $swap:literal)),* $(,)?) => {
        paste! {
            $(
                fn [<copy_ $name>](src: &[u8], dst: &mut [u8], g: &Geometry) {
                    incant!([<copy_ $name _impl>](src, dst, g), [v3, scalar]);
                }
            )*

            /// Buffer-to-buffer kernel for `key`, if one exists.
            pub(crate) fn copy_kernel(key: KernelKey) -> Option<CopyKernel> {
                match (key.src, key.dst, key.channels, key.swap) {
                    $((Container::$s, Container::$d, $ch, $swap) => Some([<copy_ $name>] as CopyKernel),)*
                    _ => None,
                }
            }
        }
    };
}

macro_rules! dispatch_in_place {
    ($(($name:ident, $s:ident, $d:ident, $ch:literal, $swap:literal)),* $(,)?) => {
        paste! {
            $(
                fn [<in_place_ $name>](buf: &mut [u8], g: &Geometry) {
                    incant!([<in_place_ $name _impl>](buf, g), [v3, scalar]);
                }
            )*

            /// Single-buffer kernel for `key`. `None` when the destination
            /// container is wider than the source or the combination is unknown.
            pub(crate) fn in_place_kernel(key: KernelKey) -> Option<InPlaceKernel> {
                match (key.src, key.dst, key.channels, key.swap) {
                    $((Container::$s, Container::$d, $ch, $swap) => Some([<in_place_ $name>] as InPlaceKernel),)*
                    _ => None,
                }
            }
        }
    };
}

macro_rules! dispatch_split {
    ($(($name:ident, $s:ident, $d:ident)),* $(,)?) => {
        paste! {
            $(
                fn [<split_ $name>](src: &[u8], luma: &mut [u8], alpha: &mut [u8], g: &SplitGeometry) {
                    incant!([<split_ $name _impl>](src, luma, alpha, g), [v3, scalar]);
                }
            )*

            pub(crate) fn split_kernel(src: Container, dst: Container) -> SplitKernel {
                match (src, dst) {
                    $((Container::$s, Container::$d) => [<split_ $name>] as SplitKernel,)*
                }
            }
        }
    };
}

macro_rules! dispatch_unpremultiply {
    ($(($name:ident, $s:ident, $ch:literal)),* $(,)?) => {
        paste! {
            $(
                fn [<unpremultiply_ $name>](buf: &mut [u8], g: &AlphaGeometry) {
                    incant!([<unpremultiply_ $name _impl>](buf, g), [v3, scalar]);
                }
            )*

            /// Alpha must be the last of `channels`.
            pub(crate) fn unpremultiply_kernel(container: Container, channels: usize) -> Option<UnpremultiplyKernel> {
                match (container, channels) {
                    $((Container::$s, $ch) => Some([<unpremultiply_ $name>] as UnpremultiplyKernel),)*
                    _ => None,
                }
            }
        }
    };
}

macro_rules! dispatch_composite {
    ($(($name:ident, $swap:literal)),* $(,)?) => {
        paste! {
            $(
                fn [<composite_ $name>](src: &[u8], dst: &mut [u8], g: &Geometry) {
                    incant!([<composite_ $name _impl>](src, dst, g), [v3, scalar]);
                }
            )*

            /// 8-bit four-channel → three-channel, scaling colour by alpha.
            pub(crate) fn composite_kernel(swap: bool) -> CompositeKernel {
                match swap {
                    $($swap => [<composite_ $name>] as CompositeKernel,)*
                }
            }
        }
    };
}

copy_kernels!(dispatch_copy);
in_place_kernels!(dispatch_in_place);
split_kernels!(dispatch_split);
unpremultiply_kernels!(dispatch_unpremultiply);
composite_kernels!(dispatch_composite);

// ===========================================================================
// Byte-level copies
// ===========================================================================

fn check_rows(len: usize, stride: usize, row_len: usize, rows: usize) -> Result<()> {
    let needed = (rows - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
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
    Ok(())
}

/// Copy `rows` rows from `src` to `dst`, strides in bytes.
///
/// With equal strides this is a single bulk copy of `stride × rows` bytes,
/// padding included. Otherwise each row copies the first
/// `min(src_stride, dst_stride)` bytes and the rest of the destination row is
/// left untouched.
///
/// # Errors
///
/// [`Error::InvalidStride`] if either stride is zero, [`Error::BufferTooSmall`]
/// if either buffer cannot hold its rows.
pub fn copy_image_data(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    rows: usize,
) -> Result<()> {
    if rows == 0 {
        return Ok(());
    }
    if src_stride == 0 || dst_stride == 0 {
        return Err(Error::InvalidStride {
            stride: 0,
            row_bytes: 0,
        });
    }
    let row_len = src_stride.min(dst_stride);
    check_rows(src.len(), src_stride, row_len, rows)?;
    check_rows(dst.len(), dst_stride, row_len, rows)?;
    if src_stride == dst_stride {
        let n = src_stride * rows;
        dst[..n].copy_from_slice(&src[..n]);
    } else {
        for (s, d) in src
            .chunks(src_stride)
            .zip(dst.chunks_mut(dst_stride))
            .take(rows)
        {
            d[..row_len].copy_from_slice(&s[..row_len]);
        }
    }
    Ok(())
}

/// Move `rows` rows of `row_len` bytes from stride `in_stride` down to the
/// smaller `out_stride`, inside one buffer. Row 0 never moves.
///
/// # Errors
///
/// [`Error::InvalidStride`] if `out_stride` is larger than `in_stride` or
/// shorter than `row_len`, [`Error::BufferTooSmall`] if `buf` cannot hold the
/// input rows.
pub fn restride_in_place(
    buf: &mut [u8],
    in_stride: usize,
    out_stride: usize,
    row_len: usize,
    rows: usize,
) -> Result<()> {
    if out_stride > in_stride || row_len > out_stride {
        return Err(Error::InvalidStride {
            stride: out_stride,
            row_bytes: row_len,
        });
    }
    if rows == 0 || in_stride == out_stride {
        return Ok(());
    }
    check_rows(buf.len(), in_stride, row_len, rows)?;
    for y in 1..rows {
        buf.copy_within(y * in_stride..y * in_stride + row_len, y * out_stride);
    }
    Ok(())
}
