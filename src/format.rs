//! Pixel format descriptors: bit depth, channel layout and alpha mode.
//!
//! ```rust
//! use tailor::{AlphaMode, BitDepth, Layout, PixelFormat};
//!
//! let fmt: PixelFormat = "BGRa;10".parse().unwrap();
//! assert_eq!(fmt.layout(), Layout::Bgra);
//! assert_eq!(fmt.depth(), BitDepth::Ten);
//! assert_eq!(fmt.alpha(), AlphaMode::Premultiplied);
//! assert_eq!(fmt.bytes_per_pixel(), 8);
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Bit depth
// ---------------------------------------------------------------------------

/// Significant bits per sample.
///
/// 8-bit samples occupy one byte; 10, 12 and 16-bit samples occupy a
/// little-endian `u16`, with the significant bits in the low end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BitDepth {
    /// 8 bits per sample.
    Eight = 8,
    /// 10 bits per sample, stored in a `u16`.
    Ten = 10,
    /// 12 bits per sample, stored in a `u16`.
    Twelve = 12,
    /// 16 bits per sample.
    Sixteen = 16,
}

impl BitDepth {
    /// Number of significant bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Bytes one sample occupies in memory (1 or 2).
    #[inline]
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::Eight => 1,
            _ => 2,
        }
    }

    /// Largest representable sample value.
    #[inline]
    pub const fn max_value(self) -> u32 {
        (1u32 << self.bits()) - 1
    }

    /// Map a bit count reported by a codec to a depth.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::Eight),
            10 => Some(Self::Ten),
            12 => Some(Self::Twelve),
            16 => Some(Self::Sixteen),
            _ => None,
        }
    }

    #[inline]
    pub(crate) const fn container(self) -> Container {
        match self {
            Self::Eight => Container::U8,
            _ => Container::U16,
        }
    }
}

/// Storage width of a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Container {
    U8,
    U16,
}

impl Container {
    #[inline]
    pub(crate) const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Channel layout
// ---------------------------------------------------------------------------

/// Channel count and order of an interleaved plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Single luminance channel.
    Gray,
    /// Luminance + alpha.
    GrayAlpha,
    /// Red, green, blue.
    Rgb,
    /// Blue, green, red.
    Bgr,
    /// Red, green, blue, alpha.
    Rgba,
    /// Blue, green, red, alpha.
    Bgra,
}

impl Layout {
    /// Number of interleaved channels.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra => 4,
        }
    }

    /// Whether the last channel is alpha.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba | Self::Bgra)
    }

    /// Whether the layout carries three colour channels.
    #[inline]
    pub const fn is_color(self) -> bool {
        !matches!(self, Self::Gray | Self::GrayAlpha)
    }

    /// Whether the colour channels are stored blue first.
    #[inline]
    pub const fn is_bgr(self) -> bool {
        matches!(self, Self::Bgr | Self::Bgra)
    }

    /// The same channels in RGB or BGR order. Gray layouts are returned as is.
    pub const fn with_bgr(self, bgr: bool) -> Self {
        match (self, bgr) {
            (Self::Rgb | Self::Bgr, false) => Self::Rgb,
            (Self::Rgb | Self::Bgr, true) => Self::Bgr,
            (Self::Rgba | Self::Bgra, false) => Self::Rgba,
            (Self::Rgba | Self::Bgra, true) => Self::Bgra,
            (other, _) => other,
        }
    }

    /// The same layout with the alpha channel dropped.
    pub const fn without_alpha(self) -> Self {
        match self {
            Self::GrayAlpha => Self::Gray,
            Self::Rgba => Self::Rgb,
            Self::Bgra => Self::Bgr,
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Alpha
// ---------------------------------------------------------------------------

/// How the alpha channel relates to the colour channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AlphaMode {
    /// No alpha channel.
    #[default]
    None,
    /// Colour channels are independent of alpha.
    Straight,
    /// Colour channels are already scaled by alpha.
    Premultiplied,
}

// ---------------------------------------------------------------------------
// Pixel format
// ---------------------------------------------------------------------------

/// Complete description of one interleaved pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    layout: Layout,
    depth: BitDepth,
    alpha: AlphaMode,
}

impl PixelFormat {
    /// Build a format, rejecting alpha modes that contradict the layout.
    pub const fn new(layout: Layout, depth: BitDepth, alpha: AlphaMode) -> Result<Self> {
        match (layout.has_alpha(), alpha) {
            (false, AlphaMode::None) | (true, AlphaMode::Straight | AlphaMode::Premultiplied) => {
                Ok(Self {
                    layout,
                    depth,
                    alpha,
                })
            }
            (false, _) => Err(Error::UnsupportedPixelFormat(
                "alpha mode given for a layout without alpha",
            )),
            (true, AlphaMode::None) => Err(Error::UnsupportedPixelFormat(
                "layout with alpha needs a straight or premultiplied alpha mode",
            )),
        }
    }

    /// Format with straight alpha when the layout has an alpha channel.
    pub const fn straight(layout: Layout, depth: BitDepth) -> Self {
        let alpha = if layout.has_alpha() {
            AlphaMode::Straight
        } else {
            AlphaMode::None
        };
        Self {
            layout,
            depth,
            alpha,
        }
    }

    #[inline]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub const fn depth(&self) -> BitDepth {
        self.depth
    }

    #[inline]
    pub const fn alpha(&self) -> AlphaMode {
        self.alpha
    }

    #[inline]
    pub const fn channels(&self) -> usize {
        self.layout.channels()
    }

    #[inline]
    pub const fn bytes_per_sample(&self) -> usize {
        self.depth.bytes_per_sample()
    }

    /// Bytes per interleaved pixel.
    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        self.channels() * self.bytes_per_sample()
    }

    /// Tight row length for `width` pixels, or `None` on overflow.
    #[inline]
    pub const fn row_bytes(&self, width: usize) -> Option<usize> {
        width.checked_mul(self.bytes_per_pixel())
    }

    /// Same format at another depth.
    #[inline]
    pub const fn with_depth(self, depth: BitDepth) -> Self {
        Self { depth, ..self }
    }

    /// Same format with the colour channels in RGB or BGR order.
    #[inline]
    pub const fn with_bgr(self, bgr: bool) -> Self {
        Self {
            layout: self.layout.with_bgr(bgr),
            ..self
        }
    }

    pub(crate) const fn with_alpha(self, alpha: AlphaMode) -> Self {
        Self { alpha, ..self }
    }

    #[inline]
    pub(crate) const fn container(&self) -> Container {
        self.depth.container()
    }
}

// ---------------------------------------------------------------------------
// Mode strings
// ---------------------------------------------------------------------------

impl FromStr for PixelFormat {
    type Err = Error;

    /// Parse a mode name such as `RGB`, `BGRA;16`, `RGBa;10` or `L;12`.
    ///
    /// A lowercase `a` marks premultiplied alpha. `I;16` and `I;16L` are
    /// accepted as 16-bit luminance.
    fn from_str(s: &str) -> Result<Self> {
        let (base, depth) = match s.split_once(';') {
            None => (s, BitDepth::Eight),
            Some(("I", "16" | "16L")) => ("L", BitDepth::Sixteen),
            Some((base, "10")) => (base, BitDepth::Ten),
            Some((base, "12")) => (base, BitDepth::Twelve),
            Some((base, "16")) => (base, BitDepth::Sixteen),
            Some(_) => return Err(Error::UnsupportedPixelFormat("unknown mode bit depth")),
        };
        let (layout, alpha) = match base {
            "L" => (Layout::Gray, AlphaMode::None),
            "LA" => (Layout::GrayAlpha, AlphaMode::Straight),
            "La" => (Layout::GrayAlpha, AlphaMode::Premultiplied),
            "RGB" => (Layout::Rgb, AlphaMode::None),
            "BGR" => (Layout::Bgr, AlphaMode::None),
            "RGBA" => (Layout::Rgba, AlphaMode::Straight),
            "RGBa" => (Layout::Rgba, AlphaMode::Premultiplied),
            "BGRA" => (Layout::Bgra, AlphaMode::Straight),
            "BGRa" => (Layout::Bgra, AlphaMode::Premultiplied),
            _ => return Err(Error::UnsupportedPixelFormat("unknown mode name")),
        };
        PixelFormat::new(layout, depth, alpha)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let premul = self.alpha == AlphaMode::Premultiplied;
        let base = match (self.layout, premul) {
            (Layout::Gray, _) => "L",
            (Layout::GrayAlpha, false) => "LA",
            (Layout::GrayAlpha, true) => "La",
            (Layout::Rgb, _) => "RGB",
            (Layout::Bgr, _) => "BGR",
            (Layout::Rgba, false) => "RGBA",
            (Layout::Rgba, true) => "RGBa",
            (Layout::Bgra, false) => "BGRA",
            (Layout::Bgra, true) => "BGRa",
        };
        f.write_str(base)?;
        match self.depth {
            BitDepth::Eight => Ok(()),
            depth => write!(f, ";{}", depth.bits()),
        }
    }
}
