use archmage::prelude::*;
use paste::paste;

use super::rows::{
    U8, U16, composite_plane, convert_plane, convert_plane_in_place, split_plane,
    unpremultiply_plane,
};
use super::{AlphaGeometry, Geometry, SplitGeometry};

// ===========================================================================
// Scalar fallbacks
// ===========================================================================

macro_rules! scalar_copy {
    ($(($name:ident, $s:ident, $d:ident, $ch:literal, $swap:literal)),* $(,)?) => {
        paste! {$(
            pub(super) fn [<copy_ $name _impl_scalar>](_token: ScalarToken, src: &[u8], dst: &mut [u8], g: &Geometry) {
                convert_plane::<$s, $d, { $ch }, { $swap }>(src, dst, g);
            }
        )*}
    };
}

macro_rules! scalar_in_place {
    ($(($name:ident, $s:ident, $d:ident, $ch:literal, $swap:literal)),* $(,)?) => {
        paste! {$(
            pub(super) fn [<in_place_ $name _impl_scalar>](_token: ScalarToken, buf: &mut [u8], g: &Geometry) {
                convert_plane_in_place::<$s, $d, { $ch }, { $swap }>(buf, g);
            }
        )*}
    };
}

macro_rules! scalar_split {
    ($(($name:ident, $s:ident, $d:ident)),* $(,)?) => {
        paste! {$(
            pub(super) fn [<split_ $name _impl_scalar>](
                _token: ScalarToken,
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

macro_rules! scalar_unpremultiply {
    ($(($name:ident, $s:ident, $ch:literal)),* $(,)?) => {
        paste! {$(
            pub(super) fn [<unpremultiply_ $name _impl_scalar>](_token: ScalarToken, buf: &mut [u8], g: &AlphaGeometry) {
                unpremultiply_plane::<$s, { $ch }>(buf, g);
            }
        )*}
    };
}

macro_rules! scalar_composite {
    ($(($name:ident, $swap:literal)),* $(,)?) => {
        paste! {$(
            pub(super) fn [<composite_ $name _impl_scalar>](_token: ScalarToken, src: &[u8], dst: &mut [u8], g: &Geometry) {
                composite_plane::<{ $swap }>(src, dst, g);
            }
        )*}
    };
}

copy_kernels!(scalar_copy);
in_place_kernels!(scalar_in_place);
split_kernels!(scalar_split);
unpremultiply_kernels!(scalar_unpremultiply);
composite_kernels!(scalar_composite);
