//! Signal levels, color matrices and the coefficients derived from them.

use crate::Error;

/// Signal range of the video the subtitles get blended onto.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// Full range, luma and chroma use all of `[0, 255]`.
    Pc = 0,
    /// Studio range, luma in `[16, 235]`, chroma in `[16, 240]`.
    Tv = 1,
}

/// Luma / chroma weighting standard.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorMatrix {
    /// ITU-R BT.601, standard definition.
    Bt601 = 0,
    /// ITU-R BT.709, high definition.
    Bt709 = 1,
}

impl Level {
    /// All levels, in index order.
    pub const ALL: [Self; 2] = [Self::Pc, Self::Tv];

    /// Position of this level in [`Level::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Scale applied to luma, `219 / 255` for studio range.
    #[must_use]
    pub const fn luma_range(self) -> f32 {
        match self {
            Self::Pc => 1.0,
            Self::Tv => 219.0 / 255.0,
        }
    }

    /// Scale applied to chroma, `224 / 255` for studio range.
    #[must_use]
    pub const fn chroma_range(self) -> f32 {
        match self {
            Self::Pc => 1.0,
            Self::Tv => 224.0 / 255.0,
        }
    }
}

impl ColorMatrix {
    /// All matrices, in index order.
    pub const ALL: [Self; 2] = [Self::Bt601, Self::Bt709];

    /// Position of this matrix in [`ColorMatrix::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Luma weight of the red channel.
    #[must_use]
    pub const fn kr(self) -> f32 {
        match self {
            Self::Bt601 => 0.299,
            Self::Bt709 => 0.2125,
        }
    }

    /// Luma weight of the green channel.
    #[must_use]
    pub const fn kg(self) -> f32 {
        match self {
            Self::Bt601 => 0.587,
            Self::Bt709 => 0.7154,
        }
    }

    /// Luma weight of the blue channel.
    #[must_use]
    pub const fn kb(self) -> f32 {
        match self {
            Self::Bt601 => 0.114,
            Self::Bt709 => 0.0721,
        }
    }
}

impl TryFrom<i32> for Level {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pc),
            1 => Ok(Self::Tv),
            _ => Err(Error::InvalidLevel(value)),
        }
    }
}

impl TryFrom<i32> for ColorMatrix {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bt601),
            1 => Ok(Self::Bt709),
            _ => Err(Error::InvalidColorMatrix(value)),
        }
    }
}

/// A fully resolved `(level, matrix)` pair, i.e., one conversion profile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Profile {
    /// Signal level.
    pub level: Level,
    /// Color matrix.
    pub color_matrix: ColorMatrix,
}

impl Profile {
    /// Creates a new profile.
    #[must_use]
    pub const fn new(level: Level, color_matrix: ColorMatrix) -> Self {
        Self { level, color_matrix }
    }

    /// Resolves a profile from raw integers, as handed over by host pipelines.
    ///
    /// The level is checked first, so if both values are bad you get [`Error::InvalidLevel`].
    ///
    /// # Errors
    ///
    /// Fails if either value is not a known [`Level`] or [`ColorMatrix`].
    pub fn from_raw(level: i32, color_matrix: i32) -> Result<Self, Error> {
        Ok(Self::new(Level::try_from(level)?, ColorMatrix::try_from(color_matrix)?))
    }
}

/// Rounds half away from zero into an `i32`.
pub fn round_fixed(value: f32) -> i32 {
    value.round() as i32
}
