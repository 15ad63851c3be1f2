//! Whole-image adapters for [`imgref`] types.
//!
//! Borrow an [`ImgRef`] as a [`PlaneRef`] without copying, or collect a plane
//! into a packed [`ImgVec`].
//!
//! ```rust
//! use imgref::ImgVec;
//! use rgb::{Bgr, Rgb};
//! use tailor::{AlphaMode, BitDepth, img};
//!
//! let src = ImgVec::new(vec![Rgb::new(1023u16, 0, 4); 4], 2, 2);
//! let out: ImgVec<Bgr<u8>> = img::convert_img(src.as_ref(), BitDepth::Ten, BitDepth::Eight, AlphaMode::None).unwrap();
//! assert_eq!(out.buf()[0], Bgr { b: 1, g: 0, r: 255 });
//! ```

use alloc::vec;

use bytemuck::Zeroable;
use imgref::{ImgRef, ImgRefMut, ImgVec};

use crate::error::Result;
use crate::format::{AlphaMode, BitDepth};
use crate::plane::{PlaneMut, PlaneRef};
use crate::typed::{PixelType, as_plane, as_plane_mut, check_pixel_type};

/// View an image as a plane. Zero-copy; strided images keep their stride.
pub fn plane_from_img<P: PixelType>(
    img: ImgRef<'_, P>,
    depth: BitDepth,
    alpha: AlphaMode,
) -> Result<PlaneRef<'_>> {
    let (w, h, stride) = (img.width(), img.height(), img.stride());
    as_plane(img.into_buf(), w, h, stride, depth, alpha)
}

/// Mutable counterpart of [`plane_from_img`], e.g. for
/// [`postprocess_decoded`](crate::postprocess_decoded) on a decoder's image.
pub fn plane_from_img_mut<P: PixelType>(
    img: ImgRefMut<'_, P>,
    depth: BitDepth,
    alpha: AlphaMode,
) -> Result<PlaneMut<'_>> {
    let (w, h, stride) = (img.width(), img.height(), img.stride());
    as_plane_mut(img.into_buf(), w, h, stride, depth, alpha)
}

/// Copy a plane into a packed image of pixel type `P`.
///
/// # Errors
///
/// [`Error::UnsupportedPixelFormat`](crate::Error::UnsupportedPixelFormat)
/// if the plane's layout or sample size does not match `P`.
pub fn to_imgvec<P: PixelType>(plane: &PlaneRef<'_>) -> Result<ImgVec<P>> {
    check_pixel_type::<P>(plane.format())?;
    let (w, h) = (plane.width(), plane.height());
    let mut buf = vec![P::zeroed(); w * h];
    for (row, src) in buf.chunks_exact_mut(w).zip(plane.rows()) {
        bytemuck::cast_slice_mut::<P, u8>(row).copy_from_slice(src);
    }
    Ok(ImgVec::new(buf, w, h))
}

/// Convert an image between pixel types and depths with [`convert`](crate::convert).
///
/// `alpha` describes the source; the target keeps it when `D` has alpha.
/// Premultiplied 8-bit RGBA into an 8-bit RGB type composites.
pub fn convert_img<S: PixelType, D: PixelType>(
    img: ImgRef<'_, S>,
    src_depth: BitDepth,
    dst_depth: BitDepth,
    alpha: AlphaMode,
) -> Result<ImgVec<D>> {
    let src = plane_from_img(img, src_depth, alpha)?;
    let dst_alpha = if D::LAYOUT.has_alpha() {
        alpha
    } else {
        AlphaMode::None
    };
    let (w, h) = (src.width(), src.height());
    let mut buf = vec![D::zeroed(); w * h];
    let mut dst = as_plane_mut(&mut buf, w, h, w, dst_depth, dst_alpha)?;
    crate::convert(&src, &mut dst)?;
    Ok(ImgVec::new(buf, w, h))
}
