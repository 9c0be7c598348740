//! Handles for converters resolved from untyped input.

use crate::{ColorConverter, Profile};

/// Luma returned when no converter could be resolved.
pub const FALLBACK_LUMA: u8 = 0;

/// Chroma returned when no converter could be resolved, i.e., neutral gray.
pub const FALLBACK_CHROMA: u8 = 0x80;

/// A converter obtained from untyped input, see [`Registry::get_raw`](crate::Registry::get_raw).
///
/// If the input did not describe a valid [`Profile`] you get [`ConverterHandle::Fallback`] (in release
/// builds only, debug builds panic earlier). The fallback never fails; it produces
/// [`FALLBACK_LUMA`] and [`FALLBACK_CHROMA`] so a pixel pipeline keeps running with visibly
/// neutral output.
#[derive(Copy, Clone, Debug)]
pub enum ConverterHandle<'a> {
    /// A valid, cached converter.
    Resolved(&'a ColorConverter),
    /// Stand-in for an invalid profile.
    Fallback,
}

impl<'a> ConverterHandle<'a> {
    /// The underlying converter, if any.
    #[must_use]
    pub const fn converter(&self) -> Option<&'a ColorConverter> {
        match self {
            Self::Resolved(conv) => Some(*conv),
            Self::Fallback => None,
        }
    }

    /// The resolved profile, if any.
    #[must_use]
    pub const fn profile(&self) -> Option<Profile> {
        match self {
            Self::Resolved(conv) => Some(conv.profile()),
            Self::Fallback => None,
        }
    }

    /// See [`ColorConverter::scale_luma`]; the fallback scales by exactly `1.0`.
    #[must_use]
    pub fn scale_luma(&self, y: u8) -> i32 {
        match self {
            Self::Resolved(conv) => conv.scale_luma(y),
            Self::Fallback => i32::from(y) << 16,
        }
    }

    /// See [`ColorConverter::rgb_to_luma`]; the fallback returns [`FALLBACK_LUMA`].
    #[must_use]
    pub fn rgb_to_luma(&self, r: u8, g: u8, b: u8) -> u8 {
        match self {
            Self::Resolved(conv) => conv.rgb_to_luma(r, g, b),
            Self::Fallback => FALLBACK_LUMA,
        }
    }

    /// See [`ColorConverter::chroma_u`]; the fallback returns [`FALLBACK_CHROMA`].
    #[must_use]
    pub fn chroma_u(&self, scaled_luma: i32, b: u8) -> u8 {
        match self {
            Self::Resolved(conv) => conv.chroma_u(scaled_luma, b),
            Self::Fallback => FALLBACK_CHROMA,
        }
    }

    /// See [`ColorConverter::chroma_v`]; the fallback returns [`FALLBACK_CHROMA`].
    #[must_use]
    pub fn chroma_v(&self, scaled_luma: i32, r: u8) -> u8 {
        match self {
            Self::Resolved(conv) => conv.chroma_v(scaled_luma, r),
            Self::Fallback => FALLBACK_CHROMA,
        }
    }

    /// See [`ColorConverter::rgb_to_yuv`].
    #[must_use]
    pub fn rgb_to_yuv(&self, r: u8, g: u8, b: u8) -> (u8, u8, u8) {
        match self {
            Self::Resolved(conv) => conv.rgb_to_yuv(r, g, b),
            Self::Fallback => (FALLBACK_LUMA, FALLBACK_CHROMA, FALLBACK_CHROMA),
        }
    }
}

impl<'a> From<&'a ColorConverter> for ConverterHandle<'a> {
    fn from(conv: &'a ColorConverter) -> Self {
        Self::Resolved(conv)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConverterHandle, FALLBACK_CHROMA, FALLBACK_LUMA};
    use crate::{ColorConverter, ColorMatrix, Level};

    #[test]
    fn fallback_is_neutral() {
        let handle = ConverterHandle::Fallback;

        assert!(handle.converter().is_none());
        assert!(handle.profile().is_none());
        assert_eq!(handle.rgb_to_luma(255, 255, 255), FALLBACK_LUMA);
        assert_eq!(handle.chroma_u(0, 255), FALLBACK_CHROMA);
        assert_eq!(handle.chroma_v(0, 255), FALLBACK_CHROMA);
        assert_eq!(handle.scale_luma(3), 3 << 16);
        assert_eq!(handle.rgb_to_yuv(1, 2, 3), (0, 0x80, 0x80));
    }

    #[test]
    fn resolved_forwards() {
        let conv = ColorConverter::new(Level::Tv, ColorMatrix::Bt601);
        let handle = ConverterHandle::from(&conv);

        assert_eq!(handle.rgb_to_luma(0, 0, 0), conv.rgb_to_luma(0, 0, 0));
        assert_eq!(handle.scale_luma(100), conv.scale_luma(100));
        assert_eq!(handle.chroma_u(0, 200), conv.chroma_u(0, 200));
        assert_eq!(handle.chroma_v(0, 200), conv.chroma_v(0, 200));
        assert_eq!(handle.rgb_to_yuv(255, 0, 0), (81, 90, 240));
    }
}
