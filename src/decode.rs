//! Decode path: turn the plane a codec just produced into the layout the
//! caller asked for, in the codec's own buffer.
//!
//! One call reconciles header and decoded dimensions, picks the target
//! format, and runs at most one in-place kernel over the plane. Every check
//! happens before the first byte is written.

use crate::error::{Error, Result};
use crate::format::{AlphaMode, BitDepth};
use crate::kernels::{
    AlphaGeometry, Geometry, KernelKey, Shift, in_place_kernel, restride_in_place,
    unpremultiply_kernel,
};
use crate::plane::{PlaneMut, packed_stride};

/// Options for [`postprocess_decoded`].
#[derive(Debug, Clone, Default)]
pub struct PostprocessOptions {
    pub(crate) bgr: bool,
    pub(crate) packed: bool,
    pub(crate) target_depth: Option<BitDepth>,
    pub(crate) unpremultiply: bool,
    pub(crate) header_dimensions: Option<(usize, usize)>,
    pub(crate) allow_incorrect_headers: bool,
}

impl PostprocessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request B,G,R channel order for colour planes. Gray planes ignore it.
    pub fn bgr(mut self, bgr: bool) -> Self {
        self.bgr = bgr;
        self
    }

    /// Drop row padding so the output stride equals its row length.
    pub fn packed(mut self, packed: bool) -> Self {
        self.packed = packed;
        self
    }

    /// Shift samples to `depth`. Defaults to the decoded depth.
    ///
    /// The output container may not be wider than the decoded one: an
    /// 8-bit plane cannot be widened in place.
    pub fn target_depth(mut self, depth: BitDepth) -> Self {
        self.target_depth = Some(depth);
        self
    }

    /// Convert premultiplied alpha to straight alpha after the transform.
    pub fn unpremultiply(mut self, unpremultiply: bool) -> Self {
        self.unpremultiply = unpremultiply;
        self
    }

    /// Dimensions the container header announced for this image.
    pub fn header_dimensions(mut self, width: usize, height: usize) -> Self {
        self.header_dimensions = Some((width, height));
        self
    }

    /// Adopt the decoded dimensions when they are smaller than the header's
    /// instead of failing.
    pub fn allow_incorrect_headers(mut self, allow: bool) -> Self {
        self.allow_incorrect_headers = allow;
        self
    }
}

/// Pick the dimensions to process.
///
/// With no header the decoded size is used. A header no larger than the
/// decoded plane wins, and anything beyond it is ignored, whether or not
/// `allow_incorrect_headers` is set. A header larger in either direction is
/// an error unless `allow_incorrect_headers`, in which case the decoded size
/// is adopted.
///
/// # Errors
///
/// [`Error::CorruptedImageDimensions`] when the codec produced fewer pixels
/// than the header promised.
pub fn reconcile_dimensions(
    header: Option<(usize, usize)>,
    decoded: (usize, usize),
    allow_incorrect_headers: bool,
) -> Result<(usize, usize)> {
    let Some((header_width, header_height)) = header else {
        return Ok(decoded);
    };
    let (decoded_width, decoded_height) = decoded;
    if header_width <= decoded_width && header_height <= decoded_height {
        return Ok((header_width, header_height));
    }
    if allow_incorrect_headers {
        log::debug!(
            "header says {header_width}x{header_height}, decoded {decoded_width}x{decoded_height}; using decoded size"
        );
        return Ok(decoded);
    }
    Err(Error::CorruptedImageDimensions {
        header_width,
        header_height,
        decoded_width,
        decoded_height,
    })
}

/// Post-process a freshly decoded plane in place.
///
/// Returns a view of the same bytes described by the output format and
/// stride. With default options this is a no-op.
///
/// # Errors
///
/// - [`Error::CorruptedImageDimensions`], see [`reconcile_dimensions`]
/// - [`Error::UnsupportedPixelFormat`] when the target depth needs a wider
///   container than the decoded one, or no kernel covers the combination
///
/// On error the plane has not been modified.
pub fn postprocess_decoded<'a>(
    mut plane: PlaneMut<'a>,
    opts: &PostprocessOptions,
) -> Result<PlaneMut<'a>> {
    let (width, height) = reconcile_dimensions(
        opts.header_dimensions,
        (plane.width(), plane.height()),
        opts.allow_incorrect_headers,
    )?;

    let src = plane.format();
    let mut target = src.with_depth(opts.target_depth.unwrap_or(src.depth()));
    if src.layout().is_color() {
        target = target.with_bgr(opts.bgr);
    }
    if target.container() > src.container() {
        return Err(Error::UnsupportedPixelFormat(
            "cannot widen an 8-bit plane in place",
        ));
    }
    let unpremultiply = opts.unpremultiply && src.alpha() == AlphaMode::Premultiplied;
    let straight_kernel = if unpremultiply {
        Some(
            unpremultiply_kernel(target.container(), target.channels()).ok_or(
                Error::UnsupportedPixelFormat("no un-premultiply kernel for this layout"),
            )?,
        )
    } else {
        None
    };

    let shift = Shift::between(src.depth(), target.depth());
    let swap = src.layout().is_bgr() != target.layout().is_bgr();
    let in_stride = plane.stride();
    let out_stride = if opts.packed {
        packed_stride(width, target)?
    } else {
        in_stride
    };
    let src_row = width * src.bytes_per_pixel();

    if shift.is_none() && !swap {
        if out_stride == in_stride {
            log::trace!("postprocess {src}: nothing to do");
        } else {
            log::trace!("postprocess {src}: restride {in_stride} -> {out_stride}");
            restride_in_place(plane.as_bytes_mut(), in_stride, out_stride, src_row, height)?;
        }
    } else {
        let key = KernelKey {
            src: src.container(),
            dst: target.container(),
            channels: src.channels(),
            swap,
        };
        let kernel = in_place_kernel(key).ok_or(Error::UnsupportedPixelFormat(
            "no in-place kernel for this conversion",
        ))?;
        log::trace!(
            "postprocess {src} -> {target}: {width}x{height}, stride {in_stride} -> {out_stride}, {shift:?}"
        );
        let g = Geometry {
            width,
            rows: height,
            src_stride: in_stride / src.bytes_per_sample(),
            dst_stride: out_stride / target.bytes_per_sample(),
            shift,
        };
        kernel(plane.as_bytes_mut(), &g);
    }

    if let Some(kernel) = straight_kernel {
        log::trace!("postprocess {target}: un-premultiply");
        let g = AlphaGeometry {
            width,
            rows: height,
            stride: out_stride / target.bytes_per_sample(),
            max: target.depth().max_value(),
        };
        kernel(plane.as_bytes_mut(), &g);
        target = target.with_alpha(AlphaMode::Straight);
    }

    plane.reshape(width, height, out_stride, target)
}

/// Convert a premultiplied plane to straight alpha in place.
///
/// `straight = round(p × max / a)` clamped to `max`; fully transparent
/// pixels get zero colour and opaque pixels are unchanged.
///
/// # Errors
///
/// [`Error::UnsupportedPixelFormat`] if the plane is not premultiplied.
pub fn unpremultiply(mut plane: PlaneMut<'_>) -> Result<PlaneMut<'_>> {
    let format = plane.format();
    if format.alpha() != AlphaMode::Premultiplied {
        return Err(Error::UnsupportedPixelFormat("plane is not premultiplied"));
    }
    let kernel = unpremultiply_kernel(format.container(), format.channels())
        .ok_or(Error::UnsupportedPixelFormat("no un-premultiply kernel for this layout"))?;
    let g = AlphaGeometry {
        width: plane.width(),
        rows: plane.height(),
        stride: plane.stride_samples(),
        max: format.depth().max_value(),
    };
    kernel(plane.as_bytes_mut(), &g);
    let (width, height, stride) = (plane.width(), plane.height(), plane.stride());
    plane.reshape(width, height, stride, format.with_alpha(AlphaMode::Straight))
}
