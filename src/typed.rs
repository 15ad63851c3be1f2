//! Plane views over [`rgb`] crate pixel slices, via bytemuck.
//!
//! A pixel type fixes the channel layout and the sample container; the bit
//! depth and alpha mode come from the caller since `Rgb<u16>` may hold 10,
//! 12 or 16-bit samples.
//!
//! ```rust
//! use rgb::Rgb;
//! use tailor::{BitDepth, AlphaMode, PostprocessOptions, postprocess_decoded};
//!
//! let mut pixels = vec![Rgb::new(1023u16, 512, 0); 4];
//! let plane = tailor::typed::as_plane_mut(&mut pixels, 2, 2, 2, BitDepth::Ten, AlphaMode::None).unwrap();
//! let out = postprocess_decoded(plane, &PostprocessOptions::new().bgr(true)).unwrap();
//! assert_eq!(out.format().to_string(), "BGR;10");
//! ```

use crate::error::{Error, Result};
use crate::format::{AlphaMode, BitDepth, Layout, PixelFormat};
use crate::plane::{PlaneMut, PlaneRef};
use rgb::{Bgr, Bgra, Gray, GrayAlpha, Rgb, Rgba};

/// An `rgb` pixel type usable as plane storage.
pub trait PixelType: bytemuck::Pod {
    /// Channel layout of one pixel
    const LAYOUT: Layout;
    /// Bytes per sample
    const SAMPLE_BYTES: usize;

    /// Format of a plane of this pixel type at `depth`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedPixelFormat`] if `depth` does not fit the sample
    /// type or `alpha` does not match the layout.
    fn pixel_format(depth: BitDepth, alpha: AlphaMode) -> Result<PixelFormat> {
        if depth.bytes_per_sample() != Self::SAMPLE_BYTES {
            return Err(Error::UnsupportedPixelFormat(
                "bit depth does not fit the pixel type",
            ));
        }
        PixelFormat::new(Self::LAYOUT, depth, alpha)
    }
}

macro_rules! pixel_types {
    ($($ty:ident => $layout:ident),* $(,)?) => {
        $(
            impl PixelType for $ty<u8> {
                const LAYOUT: Layout = Layout::$layout;
                const SAMPLE_BYTES: usize = 1;
            }

            impl PixelType for $ty<u16> {
                const LAYOUT: Layout = Layout::$layout;
                const SAMPLE_BYTES: usize = 2;
            }
        )*
    };
}

pixel_types! {
    Gray => Gray,
    GrayAlpha => GrayAlpha,
    Rgb => Rgb,
    Bgr => Bgr,
    Rgba => Rgba,
    Bgra => Bgra,
}

fn byte_stride<P: PixelType>(stride: usize) -> Result<usize> {
    stride
        .checked_mul(core::mem::size_of::<P>())
        .ok_or(Error::InvalidStride {
            stride: usize::MAX,
            row_bytes: 0,
        })
}

/// View `pixels` as a plane. `stride` counts pixels, not bytes.
///
/// 16-bit pixel types are read as little-endian samples.
pub fn as_plane<P: PixelType>(
    pixels: &[P],
    width: usize,
    height: usize,
    stride: usize,
    depth: BitDepth,
    alpha: AlphaMode,
) -> Result<PlaneRef<'_>> {
    let format = P::pixel_format(depth, alpha)?;
    PlaneRef::new(
        bytemuck::cast_slice(pixels),
        width,
        height,
        byte_stride::<P>(stride)?,
        format,
    )
}

/// Mutable counterpart of [`as_plane`].
pub fn as_plane_mut<P: PixelType>(
    pixels: &mut [P],
    width: usize,
    height: usize,
    stride: usize,
    depth: BitDepth,
    alpha: AlphaMode,
) -> Result<PlaneMut<'_>> {
    let format = P::pixel_format(depth, alpha)?;
    PlaneMut::new(
        bytemuck::cast_slice_mut(pixels),
        width,
        height,
        byte_stride::<P>(stride)?,
        format,
    )
}

/// Check that a plane's bytes can be reinterpreted as `P`.
pub(crate) fn check_pixel_type<P: PixelType>(format: PixelFormat) -> Result<()> {
    if format.layout() != P::LAYOUT || format.bytes_per_sample() != P::SAMPLE_BYTES {
        return Err(Error::UnsupportedPixelFormat(
            "plane format does not match the pixel type",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn formats_follow_pixel_type() {
        assert_eq!(
            Rgba::<u16>::pixel_format(BitDepth::Twelve, AlphaMode::Premultiplied)
                .unwrap()
                .to_string(),
            "RGBa;12"
        );
        assert_eq!(
            Gray::<u8>::pixel_format(BitDepth::Eight, AlphaMode::None).unwrap(),
            PixelFormat::straight(Layout::Gray, BitDepth::Eight)
        );
        assert!(Rgb::<u8>::pixel_format(BitDepth::Ten, AlphaMode::None).is_err());
        assert!(Bgr::<u16>::pixel_format(BitDepth::Sixteen, AlphaMode::Straight).is_err());
    }

    #[test]
    fn stride_counts_pixels() {
        let pixels = [Bgra::<u8>::default(); 6];
        let plane = as_plane(&pixels, 2, 2, 3, BitDepth::Eight, AlphaMode::Straight).unwrap();
        assert_eq!(plane.stride(), 12);
        assert_eq!(plane.row_bytes(), 8);
        assert!(check_pixel_type::<Bgra<u8>>(plane.format()).is_ok());
        assert!(check_pixel_type::<Rgba<u8>>(plane.format()).is_err());
    }

    #[test]
    fn overflowing_stride_is_rejected() {
        let mut pixels = [Rgba::<u16>::default(); 4];
        let huge = usize::MAX / 4;
        assert!(matches!(
            as_plane(&pixels, 2, 2, huge, BitDepth::Sixteen, AlphaMode::Straight),
            Err(Error::InvalidStride { .. })
        ));
        assert!(matches!(
            as_plane_mut(&mut pixels, 2, 2, huge, BitDepth::Sixteen, AlphaMode::Straight),
            Err(Error::InvalidStride { .. })
        ));
    }

    #[test]
    fn gray_alpha_planes_split() {
        let src = [GrayAlpha::<u8>::new(10, 200), GrayAlpha::new(20, 100)];
        let mut l = [Gray::new(0u8); 2];
        let mut a = [Gray::new(0u8); 2];
        let src = as_plane(&src, 2, 1, 2, BitDepth::Eight, AlphaMode::Straight).unwrap();
        let mut luma = as_plane_mut(&mut l, 2, 1, 2, BitDepth::Eight, AlphaMode::None).unwrap();
        let mut alpha = as_plane_mut(&mut a, 2, 1, 2, BitDepth::Eight, AlphaMode::None).unwrap();
        crate::deinterleave_luma_alpha(&src, &mut luma, &mut alpha).unwrap();
        assert_eq!(bytemuck::cast_slice::<_, u8>(&l[..]), &[10, 20]);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&a[..]), &[200, 100]);
    }
}
