//! # tailor
//!
//! *Alter decoded pixels to fit.*
//!
//! HEIF and AVIF codecs hand out planes with whatever row padding, bit depth
//! and channel order they like. tailor takes them in at the stride and lets
//! the depth out until they fit the caller, then does the reverse on the way
//! into an encoder.
//!
//! Row kernels are specialized per sample container, channel count and
//! channel order, and dispatched once per plane to the best SIMD tier
//! (x86-64 AVX2 or scalar).
//!
//! ## Operations
//!
//! - [`postprocess_decoded`]: in place on a codec's buffer. Strips row
//!   padding, shifts 16-bit containers down to 8 or between 10/12/16 bits,
//!   swaps RGB ↔ BGR, optionally un-premultiplies, and reconciles header
//!   dimensions with what was actually decoded.
//! - [`pack_for_encode`] / [`convert`]: caller plane into an encoder plane,
//!   any depth pair, order swap, premultiplied RGBA compositing.
//! - [`deinterleave_luma_alpha`]: gray + alpha into two gray planes.
//!
//! Pixel formats use the usual mode names:
//!
//! ```rust
//! use tailor::{PixelFormat, PlaneMut, PostprocessOptions, BitDepth, postprocess_decoded};
//!
//! // 2x1 RGB, 16-bit little-endian samples, 4 bytes of row padding
//! let mut buf = [0u8; 16];
//! let format: PixelFormat = "RGB;16".parse().unwrap();
//! let plane = PlaneMut::new(&mut buf, 2, 1, 16, format).unwrap();
//!
//! let opts = PostprocessOptions::new()
//!     .bgr(true)
//!     .packed(true)
//!     .target_depth(BitDepth::Eight);
//! let out = postprocess_decoded(plane, &opts).unwrap();
//! assert_eq!(out.format().to_string(), "BGR");
//! assert_eq!(out.stride(), 6);
//! ```
//!
//! ## Feature flags
//!
//! - **`std`** (default): runtime CPU feature detection for the SIMD tiers.
//! - **`rgb`**: plane views over [`rgb`] crate pixel slices via bytemuck.
//! - **`imgref`**: [`imgref`] image adapters. Implies `rgb`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod decode;
mod encode;
mod error;
mod format;
mod kernels;
mod plane;

pub use decode::{PostprocessOptions, postprocess_decoded, reconcile_dimensions, unpremultiply};
pub use encode::{composite_rgba_to_rgb, convert, deinterleave_luma_alpha, pack_for_encode};
pub use error::{Error, Result};
pub use format::{AlphaMode, BitDepth, Layout, PixelFormat};
pub use kernels::{copy_image_data, restride_in_place};
pub use plane::{PlaneMut, PlaneRef, packed_stride};

#[cfg(feature = "rgb")]
pub mod typed;

#[cfg(feature = "imgref")]
pub mod img;
