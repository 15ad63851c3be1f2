// ---------------------------------------------------------------------------
// Generic row bodies.
//
// Everything here is #[inline(always)] and monomorphic per (container in,
// container out, channel count, swap) so the tier wrappers in scalar.rs and
// avx2.rs each get their own copy compiled under their target features.
// No format branching happens inside a pixel loop.
// ---------------------------------------------------------------------------

use super::{AlphaGeometry, Geometry, Shift, SplitGeometry};

/// Sample container: how one channel value is laid out in bytes.
pub(super) trait Sample {
    const BYTES: usize;
    fn load(b: &[u8]) -> u32;
    fn store(v: u32, b: &mut [u8]);
}

/// One byte per sample.
pub(super) enum U8 {}

/// Little-endian `u16` per sample.
pub(super) enum U16 {}

impl Sample for U8 {
    const BYTES: usize = 1;

    #[inline(always)]
    fn load(b: &[u8]) -> u32 {
        b[0] as u32
    }

    #[inline(always)]
    fn store(v: u32, b: &mut [u8]) {
        b[0] = v as u8;
    }
}

impl Sample for U16 {
    const BYTES: usize = 2;

    #[inline(always)]
    fn load(b: &[u8]) -> u32 {
        u16::from_le_bytes([b[0], b[1]]) as u32
    }

    #[inline(always)]
    fn store(v: u32, b: &mut [u8]) {
        let [lo, hi] = (v as u16).to_le_bytes();
        b[0] = lo;
        b[1] = hi;
    }
}

#[inline(always)]
const fn source_channel<const SWAP: bool>(c: usize) -> usize {
    match (SWAP, c) {
        (true, 0) => 2,
        (true, 2) => 0,
        _ => c,
    }
}

#[inline(always)]
fn load_pixel<S: Sample, const CH: usize>(px: &[u8]) -> [u32; 4] {
    let mut out = [0u32; 4];
    for (c, v) in out.iter_mut().enumerate().take(CH) {
        *v = S::load(&px[c * S::BYTES..]);
    }
    out
}

#[inline(always)]
fn store_pixel<D: Sample, const CH: usize, const SWAP: bool>(
    px: [u32; 4],
    out: &mut [u8],
    shift: Shift,
) {
    for c in 0..CH {
        D::store(shift.apply(px[source_channel::<SWAP>(c)]), &mut out[c * D::BYTES..]);
    }
}

// ===========================================================================
// Depth shift + order swap
// ===========================================================================

/// Convert one row between two disjoint buffers.
#[inline(always)]
pub(super) fn convert_row<S: Sample, D: Sample, const CH: usize, const SWAP: bool>(
    src: &[u8],
    dst: &mut [u8],
    shift: Shift,
) {
    for (s, d) in src
        .chunks_exact(CH * S::BYTES)
        .zip(dst.chunks_exact_mut(CH * D::BYTES))
    {
        for c in 0..CH {
            let v = S::load(&s[source_channel::<SWAP>(c) * S::BYTES..]);
            D::store(shift.apply(v), &mut d[c * D::BYTES..]);
        }
    }
}

/// Convert one row inside a single buffer.
///
/// `row` starts at the write offset and ends at the last input byte; the
/// input pixels start `lag` bytes in. Requires `D::BYTES <= S::BYTES` so a
/// written pixel never reaches an input pixel that has not been read yet.
#[inline(always)]
pub(super) fn convert_row_in_place<S: Sample, D: Sample, const CH: usize, const SWAP: bool>(
    row: &mut [u8],
    lag: usize,
    width: usize,
    shift: Shift,
) {
    let src_bpp = CH * S::BYTES;
    let dst_bpp = CH * D::BYTES;
    if lag == 0 && src_bpp == dst_bpp {
        for px in row[..width * src_bpp].chunks_exact_mut(src_bpp) {
            let p = load_pixel::<S, CH>(px);
            store_pixel::<D, CH, SWAP>(p, px, shift);
        }
    } else if lag >= width * dst_bpp {
        let (dst, src) = row.split_at_mut(lag);
        convert_row::<S, D, CH, SWAP>(&src[..width * src_bpp], &mut dst[..width * dst_bpp], shift);
    } else {
        // Overlapping: forward order, whole pixel read before any byte of it is written.
        for x in 0..width {
            let p = load_pixel::<S, CH>(&row[lag + x * src_bpp..]);
            store_pixel::<D, CH, SWAP>(p, &mut row[x * dst_bpp..], shift);
        }
    }
}

#[inline(always)]
pub(super) fn convert_plane<S: Sample, D: Sample, const CH: usize, const SWAP: bool>(
    src: &[u8],
    dst: &mut [u8],
    g: &Geometry,
) {
    let src_row = g.width * CH * S::BYTES;
    let dst_row = g.width * CH * D::BYTES;
    let ss = g.src_stride * S::BYTES;
    let ds = g.dst_stride * D::BYTES;
    for y in 0..g.rows {
        convert_row::<S, D, CH, SWAP>(&src[y * ss..][..src_row], &mut dst[y * ds..][..dst_row], g.shift);
    }
}

/// Rows are processed top to bottom; row `y` is written at `y * dst_stride`,
/// which never passes its own read offset `y * src_stride`.
#[inline(always)]
pub(super) fn convert_plane_in_place<S: Sample, D: Sample, const CH: usize, const SWAP: bool>(
    buf: &mut [u8],
    g: &Geometry,
) {
    let src_row = g.width * CH * S::BYTES;
    let ss = g.src_stride * S::BYTES;
    let ds = g.dst_stride * D::BYTES;
    for y in 0..g.rows {
        let read = y * ss;
        let write = y * ds;
        debug_assert!(write <= read);
        convert_row_in_place::<S, D, CH, SWAP>(
            &mut buf[write..read + src_row],
            read - write,
            g.width,
            g.shift,
        );
    }
}

// ===========================================================================
// Luma + alpha de-interleave
// ===========================================================================

#[inline(always)]
pub(super) fn split_row<S: Sample, D: Sample>(
    src: &[u8],
    luma: &mut [u8],
    alpha: &mut [u8],
    shift: Shift,
) {
    for ((s, l), a) in src
        .chunks_exact(2 * S::BYTES)
        .zip(luma.chunks_exact_mut(D::BYTES))
        .zip(alpha.chunks_exact_mut(D::BYTES))
    {
        D::store(shift.apply(S::load(s)), l);
        D::store(shift.apply(S::load(&s[S::BYTES..])), a);
    }
}

#[inline(always)]
pub(super) fn split_plane<S: Sample, D: Sample>(
    src: &[u8],
    luma: &mut [u8],
    alpha: &mut [u8],
    g: &SplitGeometry,
) {
    let src_row = g.width * 2 * S::BYTES;
    let dst_row = g.width * D::BYTES;
    let ss = g.src_stride * S::BYTES;
    let ls = g.luma_stride * D::BYTES;
    let als = g.alpha_stride * D::BYTES;
    for y in 0..g.rows {
        split_row::<S, D>(
            &src[y * ss..][..src_row],
            &mut luma[y * ls..][..dst_row],
            &mut alpha[y * als..][..dst_row],
            g.shift,
        );
    }
}

// ===========================================================================
// Alpha
// ===========================================================================

/// `round(c * a / 255)`; zero alpha gives zero.
#[inline(always)]
fn scale_by_alpha8(c: u32, a: u32) -> u32 {
    (c * a + 127) / 255
}

/// 8-bit RGBA/BGRA → RGB/BGR, colour scaled by alpha and alpha dropped.
#[inline(always)]
pub(super) fn composite_row<const SWAP: bool>(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
        let word = u32::from_le_bytes([s[0], s[1], s[2], s[3]]);
        let a = word >> 24;
        let px = [word & 0xFF, (word >> 8) & 0xFF, (word >> 16) & 0xFF];
        for c in 0..3 {
            d[c] = scale_by_alpha8(px[source_channel::<SWAP>(c)], a) as u8;
        }
    }
}

#[inline(always)]
pub(super) fn composite_plane<const SWAP: bool>(src: &[u8], dst: &mut [u8], g: &Geometry) {
    for y in 0..g.rows {
        composite_row::<SWAP>(
            &src[y * g.src_stride..][..g.width * 4],
            &mut dst[y * g.dst_stride..][..g.width * 3],
        );
    }
}

/// Premultiplied → straight, alpha last: `round(p * max / a)` clamped to
/// `max`. Zero alpha zeroes the colour; opaque pixels are left alone.
#[inline(always)]
pub(super) fn unpremultiply_row<S: Sample, const CH: usize>(row: &mut [u8], max: u32) {
    let alpha_at = (CH - 1) * S::BYTES;
    for px in row.chunks_exact_mut(CH * S::BYTES) {
        let a = S::load(&px[alpha_at..]);
        if a >= max {
            continue;
        }
        for c in 0..CH - 1 {
            let v = if a == 0 {
                0
            } else {
                ((S::load(&px[c * S::BYTES..]) * max + a / 2) / a).min(max)
            };
            S::store(v, &mut px[c * S::BYTES..]);
        }
    }
}

#[inline(always)]
pub(super) fn unpremultiply_plane<S: Sample, const CH: usize>(buf: &mut [u8], g: &AlphaGeometry) {
    let row = g.width * CH * S::BYTES;
    let stride = g.stride * S::BYTES;
    for y in 0..g.rows {
        unpremultiply_row::<S, CH>(&mut buf[y * stride..][..row], g.max);
    }
}
