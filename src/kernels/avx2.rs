use archmage::prelude::*;
use paste::paste;

use super::rows::{
    U8, U16, composite_plane, convert_plane, convert_plane_in_place, split_plane,
    unpremultiply_plane,
};
use super::{AlphaGeometry, Geometry, SplitGeometry};

// ===========================================================================
// x86-64 v3 wrappers
//
// The generic bodies are #[inline(always)], so each one is compiled here with
// AVX2 enabled and the per-channel loops auto-vectorize.
// ===========================================================================

macro_rules! v3_copy {
    ($(($name:ident, $s:ident, $d:ident, $ch:literal, $swap:literal)),* $(,)?) => {
        paste! {$(
            #[arcane]
            pub(super) fn [<copy_ $name _impl_v3>](_t: X64V3Token, src: &[u8], dst: &mut [u8], g: &Geometry) {
                convert_plane::<$s, $d, { $ch }, { $swap }>(src, dst, g);
            }
        )*}
    };
}

macro_rules! v3_in_place {
    ($(($name:ident, $s:ident, $d:ident, $ch:literal, $swap:literal)),* $(,)?) => {
        paste! {$(
            #[arcane]
            pub(super) fn [<in_place_ $name _impl_v3>](_t: X64V3Token, buf: &mut [u8], g: &Geometry) {
                convert_plane_in_place::<$s, $d, { $ch }, { $swap }>(buf, g);
            }
        )*}
    };
}

macro_rules! v3_split {
    ($(($name:ident, $s:ident, $d:ident)),* $(,)?) => {
        paste! {$(
            #[arcane]
            pub(super) fn [<split_ $name _impl_v3>](
                _t: X64V3Token,
                src: &[u8],
                luma: &mut [u8],
                alpha: &mut [u8],
                g: &SplitGeometry,
            ) {
                split_plane::<$s, $d>(src, luma, alpha, g);
            }
        )*}
    };
}

macro_rules! v3_unpremultiply {
    ($(($name:ident, $s:ident, $ch:literal)),* $(,)?) => {
        paste! {$(
            #[arcane]
            pub(super) fn [<unpremultiply_ $name _impl_v3>](_t: X64V3Token, buf: &mut [u8], g: &AlphaGeometry) {
                unpremultiply_plane::<$s, { $ch }>(buf, g);
            }
        )*}
    };
}

macro_rules! v3_composite {
    ($(($name:ident, $swap:literal)),* $(,)?) => {
        paste! {$(
            #[arcane]
            pub(super) fn [<composite_ $name _impl_v3>](_t: X64V3Token, src: &[u8], dst: &mut [u8], g: &Geometry) {
                composite_plane::<{ $swap }>(src, dst, g);
            }
        )*}
    };
}

copy_kernels!(v3_copy);
in_place_kernels!(v3_in_place);
split_kernels!(v3_split);
unpremultiply_kernels!(v3_unpremultiply);
composite_kernels!(v3_composite);
