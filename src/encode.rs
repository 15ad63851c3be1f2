//! Encode path: pack caller pixels into the plane an encoder allocated.
//!
//! Source and destination are distinct buffers, so every conversion is a
//! single buffer-to-buffer kernel over the plane, widening included.

use crate::error::{Error, Result};
use crate::format::{AlphaMode, BitDepth, Layout, PixelFormat};
use crate::kernels::{
    Geometry, KernelKey, Shift, SplitGeometry, composite_kernel, copy_image_data, copy_kernel,
    split_kernel,
};
use crate::plane::{PlaneMut, PlaneRef};

fn check_dimensions(src: &PlaneRef<'_>, dst: &PlaneMut<'_>) -> Result<()> {
    if src.width() != dst.width() || src.height() != dst.height() {
        return Err(Error::DimensionMismatch {
            src_width: src.width(),
            src_height: src.height(),
            dst_width: dst.width(),
            dst_height: dst.height(),
        });
    }
    Ok(())
}

/// Same-format copy. One bulk copy when strides agree and both slices cover
/// the last row's padding, otherwise row by row with padding left alone.
fn copy_rows(src: &PlaneRef<'_>, dst: &mut PlaneMut<'_>) -> Result<()> {
    if src.stride() == dst.stride() && src.covers_full_stride() && dst.covers_full_stride() {
        let stride = src.stride();
        return copy_image_data(
            src.as_bytes(),
            stride,
            dst.as_bytes_mut(),
            stride,
            src.height(),
        );
    }
    for (y, row) in src.rows().enumerate() {
        dst.row_mut(y).copy_from_slice(row);
    }
    Ok(())
}

/// Pack a caller plane into an encoder plane of the same size.
///
/// The caller's buffer must hold a full `stride × height` bytes, padding of
/// the last row included. Beyond that this is [`convert`].
///
/// # Errors
///
/// - [`Error::BufferTooSmall`] if `src` is shorter than `stride × height`
/// - [`Error::DimensionMismatch`] if the planes differ in size
/// - [`Error::UnsupportedPixelFormat`] if no kernel maps `src` onto `dst`
///
/// On error `dst` has not been modified.
pub fn pack_for_encode(src: &PlaneRef<'_>, dst: &mut PlaneMut<'_>) -> Result<()> {
    if !src.covers_full_stride() {
        return Err(Error::BufferTooSmall {
            needed: src.stride().saturating_mul(src.height()),
            actual: src.as_bytes().len(),
        });
    }
    convert(src, dst)
}

/// Convert `src` into `dst`: depth shift, channel order swap, and for 8-bit
/// premultiplied RGBA/BGRA into RGB/BGR, alpha compositing.
///
/// Any bit depth pair works since the buffers are distinct. Channel count
/// and alpha mode must otherwise match.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if the planes differ in size
/// - [`Error::UnsupportedPixelFormat`] for a channel count or alpha change
pub fn convert(src: &PlaneRef<'_>, dst: &mut PlaneMut<'_>) -> Result<()> {
    check_dimensions(src, dst)?;
    let (s, d) = (src.format(), dst.format());
    if s == d {
        log::trace!("convert {s}: copy");
        return copy_rows(src, dst);
    }
    if s.alpha() == AlphaMode::Premultiplied
        && s.channels() == 4
        && s.depth() == BitDepth::Eight
        && d.channels() == 3
        && d.depth() == BitDepth::Eight
    {
        return composite_rgba_to_rgb(src, dst);
    }
    if s.channels() != d.channels() {
        return Err(Error::UnsupportedPixelFormat(
            "channel count change is not supported",
        ));
    }
    if s.alpha() != d.alpha() {
        return Err(Error::UnsupportedPixelFormat(
            "alpha mode change is not supported",
        ));
    }
    let key = KernelKey {
        src: s.container(),
        dst: d.container(),
        channels: s.channels(),
        swap: s.layout().is_bgr() != d.layout().is_bgr(),
    };
    let kernel = copy_kernel(key).ok_or(Error::UnsupportedPixelFormat(
        "no conversion kernel for this combination",
    ))?;
    let g = Geometry {
        width: src.width(),
        rows: src.height(),
        src_stride: src.stride_samples(),
        dst_stride: dst.stride_samples(),
        shift: Shift::between(s.depth(), d.depth()),
    };
    log::trace!("convert {s} -> {d}: {:?}", g);
    kernel(src.as_bytes(), dst.as_bytes_mut(), &g);
    Ok(())
}

/// Scale 8-bit RGBA/BGRA colour by alpha into RGB/BGR, dropping alpha.
///
/// `out = round(c × a / 255)`, so zero alpha gives black. Channel order
/// follows `dst`.
///
/// # Errors
///
/// [`Error::UnsupportedPixelFormat`] unless `src` is 8-bit four-channel
/// colour and `dst` 8-bit three-channel colour; [`Error::DimensionMismatch`]
/// if the planes differ in size.
pub fn composite_rgba_to_rgb(src: &PlaneRef<'_>, dst: &mut PlaneMut<'_>) -> Result<()> {
    check_dimensions(src, dst)?;
    let (s, d) = (src.format(), dst.format());
    if !matches!(s.layout(), Layout::Rgba | Layout::Bgra) || s.depth() != BitDepth::Eight {
        return Err(Error::UnsupportedPixelFormat(
            "compositing needs an 8-bit RGBA or BGRA source",
        ));
    }
    if !matches!(d.layout(), Layout::Rgb | Layout::Bgr) || d.depth() != BitDepth::Eight {
        return Err(Error::UnsupportedPixelFormat(
            "compositing needs an 8-bit RGB or BGR target",
        ));
    }
    let swap = s.layout().is_bgr() != d.layout().is_bgr();
    log::trace!("composite {s} -> {d}");
    let g = Geometry {
        width: src.width(),
        rows: src.height(),
        src_stride: src.stride(),
        dst_stride: dst.stride(),
        shift: Shift::NONE,
    };
    composite_kernel(swap)(src.as_bytes(), dst.as_bytes_mut(), &g);
    Ok(())
}

/// Split an interleaved luma + alpha plane into two gray planes.
///
/// Both outputs must share one bit depth; the source may be any depth and
/// is shifted to it.
///
/// # Errors
///
/// [`Error::UnsupportedPixelFormat`] unless `src` is gray + alpha and both
/// targets are gray at the same depth; [`Error::DimensionMismatch`] if any
/// plane differs in size.
pub fn deinterleave_luma_alpha(
    src: &PlaneRef<'_>,
    luma: &mut PlaneMut<'_>,
    alpha: &mut PlaneMut<'_>,
) -> Result<()> {
    check_dimensions(src, luma)?;
    check_dimensions(src, alpha)?;
    let s = src.format();
    if s.layout() != Layout::GrayAlpha {
        return Err(Error::UnsupportedPixelFormat(
            "luma/alpha split needs a gray + alpha source",
        ));
    }
    let target: PixelFormat = luma.format();
    if target.layout() != Layout::Gray || alpha.format() != target {
        return Err(Error::UnsupportedPixelFormat(
            "luma/alpha split needs two gray targets of one depth",
        ));
    }
    let g = SplitGeometry {
        width: src.width(),
        rows: src.height(),
        src_stride: src.stride_samples(),
        luma_stride: luma.stride_samples(),
        alpha_stride: alpha.stride_samples(),
        shift: Shift::between(s.depth(), target.depth()),
    };
    log::trace!("split {s} -> 2 x {target}");
    split_kernel(s.container(), target.container())(
        src.as_bytes(),
        luma.as_bytes_mut(),
        alpha.as_bytes_mut(),
        &g,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn le16(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn fmt(mode: &str) -> PixelFormat {
        mode.parse().unwrap()
    }

    #[test]
    fn pack_same_format_drops_padding() {
        let src_bytes = [1, 2, 3, 0xEE, 4, 5, 6, 0xEE];
        let src = PlaneRef::new(&src_bytes, 1, 2, 4, fmt("RGB")).unwrap();
        let mut out = [0u8; 6];
        let mut dst = PlaneMut::packed(&mut out, 1, 2, fmt("RGB")).unwrap();
        pack_for_encode(&src, &mut dst).unwrap();
        assert_eq!(out, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn pack_equal_strides_is_bulk_copy() {
        let src_bytes: Vec<u8> = (0..32).collect();
        let src = PlaneRef::new(&src_bytes, 3, 4, 8, fmt("L;16")).unwrap();
        let mut out = vec![0u8; 32];
        let mut dst = PlaneMut::new(&mut out, 3, 4, 8, fmt("L;16")).unwrap();
        pack_for_encode(&src, &mut dst).unwrap();
        assert_eq!(out, src_bytes);
    }

    #[test]
    fn pack_narrows_sixteen_to_ten() {
        let src_bytes = le16(&[0xFFFF, 0x8000, 0x0040]);
        let src = PlaneRef::packed(&src_bytes, 1, 1, fmt("RGB;16")).unwrap();
        let mut out = [0u8; 6];
        let mut dst = PlaneMut::packed(&mut out, 1, 1, fmt("RGB;10")).unwrap();
        pack_for_encode(&src, &mut dst).unwrap();
        assert_eq!(&out[..], &le16(&[1023, 512, 1])[..]);
    }

    #[test]
    fn pack_swaps_and_narrows_bgra() {
        let src_bytes = le16(&[0x1000, 0x2000, 0x3000, 0xFFFF]);
        let src = PlaneRef::packed(&src_bytes, 1, 1, fmt("BGRA;16")).unwrap();
        let mut out = [0u8; 8];
        let mut dst = PlaneMut::packed(&mut out, 1, 1, fmt("RGBA;12")).unwrap();
        pack_for_encode(&src, &mut dst).unwrap();
        assert_eq!(&out[..], &le16(&[0x300, 0x200, 0x100, 0xFFF])[..]);
    }

    #[test]
    fn pack_requires_full_caller_buffer() {
        // Valid as a view (last row has no padding) but not for encoding
        let src_bytes = [0u8; 7];
        let src = PlaneRef::new(&src_bytes, 1, 2, 4, fmt("RGB")).unwrap();
        let mut out = [0u8; 6];
        let mut dst = PlaneMut::packed(&mut out, 1, 2, fmt("RGB")).unwrap();
        assert_eq!(
            pack_for_encode(&src, &mut dst),
            Err(Error::BufferTooSmall {
                needed: 8,
                actual: 7
            })
        );
    }

    #[test]
    fn pack_rejects_size_mismatch() {
        let src_bytes = [0u8; 6];
        let src = PlaneRef::packed(&src_bytes, 2, 1, fmt("RGB")).unwrap();
        let mut out = [0u8; 6];
        let mut dst = PlaneMut::packed(&mut out, 1, 2, fmt("RGB")).unwrap();
        assert!(matches!(
            pack_for_encode(&src, &mut dst),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn unsupported_conversions_leave_target_untouched() {
        let src_bytes = [10u8; 8];
        let mut out = [0xCCu8; 16];

        let src = PlaneRef::packed(&src_bytes, 2, 1, fmt("LA")).unwrap();
        let mut dst = PlaneMut::packed(&mut out[..6], 2, 1, fmt("RGB")).unwrap();
        assert!(matches!(
            convert(&src, &mut dst),
            Err(Error::UnsupportedPixelFormat(_))
        ));

        let src = PlaneRef::packed(&src_bytes, 2, 1, fmt("RGBa")).unwrap();
        let mut dst = PlaneMut::packed(&mut out, 2, 1, fmt("RGBA;16")).unwrap();
        assert!(matches!(
            convert(&src, &mut dst),
            Err(Error::UnsupportedPixelFormat(_))
        ));
        assert_eq!(out, [0xCC; 16]);
    }

    #[test]
    fn composite_scales_by_alpha() {
        let src_bytes = [200, 100, 50, 128, 255, 255, 255, 0];
        let src = PlaneRef::packed(&src_bytes, 2, 1, fmt("RGBa")).unwrap();
        let mut out = [0u8; 6];
        let mut dst = PlaneMut::packed(&mut out, 2, 1, fmt("RGB")).unwrap();
        pack_for_encode(&src, &mut dst).unwrap();
        assert_eq!(out, [100, 50, 25, 0, 0, 0]);
    }

    #[test]
    fn composite_to_bgr_swaps() {
        let src_bytes = [200, 100, 50, 128, 255, 0, 0, 255];
        let src = PlaneRef::packed(&src_bytes, 2, 1, fmt("RGBa")).unwrap();
        let mut out = [0u8; 6];
        let mut dst = PlaneMut::packed(&mut out, 2, 1, fmt("BGR")).unwrap();
        composite_rgba_to_rgb(&src, &mut dst).unwrap();
        assert_eq!(out, [25, 50, 100, 0, 0, 255]);
    }

    #[test]
    fn convert_ten_bit_rgb_to_sixteen_bit_bgr() {
        let src_bytes = le16(&[1, 2, 1023]);
        let src = PlaneRef::packed(&src_bytes, 1, 1, fmt("RGB;10")).unwrap();
        let mut out = [0u8; 6];
        let mut dst = PlaneMut::packed(&mut out, 1, 1, fmt("BGR;16")).unwrap();
        convert(&src, &mut dst).unwrap();
        assert_eq!(&out[..], &le16(&[1023 << 6, 2 << 6, 1 << 6])[..]);
    }

    #[test]
    fn convert_widens_eight_bit_into_padded_target() {
        let src_bytes = [0x12, 0xFF];
        let src = PlaneRef::packed(&src_bytes, 1, 2, fmt("L")).unwrap();
        let mut out = [0xCCu8; 8];
        let mut dst = PlaneMut::new(&mut out, 1, 2, 4, fmt("L;16")).unwrap();
        convert(&src, &mut dst).unwrap();
        assert_eq!(out, [0x00, 0x12, 0xCC, 0xCC, 0x00, 0xFF, 0xCC, 0xCC]);
    }

    #[test]
    fn deinterleave_four_by_three() {
        let src_bytes: Vec<u8> = (0..24).collect();
        let src = PlaneRef::packed(&src_bytes, 4, 3, fmt("LA")).unwrap();
        let mut l = [0u8; 12];
        let mut a = [0u8; 12];
        let mut luma = PlaneMut::packed(&mut l, 4, 3, fmt("L")).unwrap();
        let mut alpha = PlaneMut::packed(&mut a, 4, 3, fmt("L")).unwrap();
        deinterleave_luma_alpha(&src, &mut luma, &mut alpha).unwrap();
        let evens: Vec<u8> = (0..24).step_by(2).collect();
        let odds: Vec<u8> = (1..24).step_by(2).collect();
        assert_eq!(&l[..], &evens[..]);
        assert_eq!(&a[..], &odds[..]);
    }

    #[test]
    fn deinterleave_narrows_into_padded_planes() {
        let src_bytes = le16(&[0x0FFF, 0x0800, 0x0010, 0x0001]);
        let src = PlaneRef::packed(&src_bytes, 2, 1, fmt("LA;12")).unwrap();
        let mut l = [0xCCu8; 3];
        let mut a = [0xCCu8; 2];
        let mut luma = PlaneMut::new(&mut l, 2, 1, 3, fmt("L")).unwrap();
        let mut alpha = PlaneMut::packed(&mut a, 2, 1, fmt("L")).unwrap();
        deinterleave_luma_alpha(&src, &mut luma, &mut alpha).unwrap();
        assert_eq!(l, [0xFF, 0x01, 0xCC]);
        assert_eq!(a, [0x80, 0x00]);
    }

    #[test]
    fn deinterleave_rejects_mixed_targets() {
        let src_bytes = [0u8; 4];
        let src = PlaneRef::packed(&src_bytes, 2, 1, fmt("LA")).unwrap();
        let mut l = [0u8; 2];
        let mut a = [0u8; 4];
        let mut luma = PlaneMut::packed(&mut l, 2, 1, fmt("L")).unwrap();
        let mut alpha = PlaneMut::packed(&mut a, 2, 1, fmt("L;16")).unwrap();
        assert!(deinterleave_luma_alpha(&src, &mut luma, &mut alpha).is_err());
    }
}
