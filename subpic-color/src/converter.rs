//! Fixed-point RGB to YUV conversion engine.

use crate::profile::{ColorMatrix, Level, Profile, round_fixed};
use log::debug;

/// Offset of the identity section inside the clip table.
const CLIP_BIAS: i32 = 256;

/// Number of entries in the clip table, `[-256, 511]` biased by [`CLIP_BIAS`].
pub const CLIP_TABLE_LEN: usize = 256 * 3;

/// `16.5` in 16.16, moves luma into studio range and rounds to nearest.
const LUMA_OFFSET_TV: i32 = 0x0010_8000;

/// `128` in 16.16, chroma is centered on `0x80`.
const CHROMA_OFFSET: i64 = 0x0080_0000;

/// `0.5` in 16.16.
const CHROMA_ROUND_TV: i64 = 0x8000;

/// Studio range footroom removed before rescaling luma.
const LUMA_FOOTROOM_TV: i32 = 16;

/// Per channel 16.16 contributions to luma, indexed by the 8-bit channel sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbToYTables {
    /// Red contributions.
    pub r: [i32; 256],
    /// Green contributions.
    pub g: [i32; 256],
    /// Blue contributions.
    pub b: [i32; 256],
}

/// Per sample 16.16 contributions of chroma to RGB, centered on `128`.
///
/// These are not used by any conversion in this crate; they are precomputed for callers that
/// blend in the YUV to RGB direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChromaToRgbTables {
    /// Contribution of U to blue.
    pub bu: [i32; 256],
    /// Contribution of U to green (to be subtracted).
    pub gu: [i32; 256],
    /// Contribution of V to green (to be subtracted).
    pub gv: [i32; 256],
    /// Contribution of V to red.
    pub rv: [i32; 256],
}

/// Immutable conversion tables for one [`Profile`].
///
/// Instances are large (a few KiB of tables) and meant to be built once and shared, usually
/// through a [`Registry`](crate::Registry).
///
/// ```
/// use subpic_color::{ColorConverter, ColorMatrix, Level};
///
/// let conv = ColorConverter::new(Level::Tv, ColorMatrix::Bt601);
/// let y = conv.rgb_to_luma(255, 255, 255);
/// let scaled = conv.scale_luma(y);
///
/// assert_eq!(y, 235);
/// assert_eq!(conv.chroma_u(scaled, 255), 128);
/// assert_eq!(conv.chroma_v(scaled, 255), 128);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorConverter {
    level: Level,
    color_matrix: ColorMatrix,
    clip: [u8; CLIP_TABLE_LEN],
    rgb_to_y: RgbToYTables,
    chroma_to_rgb: ChromaToRgbTables,
    cu: i32,
    cv: i32,
    luma_rescale: i32,
}

impl ColorConverter {
    /// Computes all tables for the given level and matrix.
    #[must_use]
    pub fn new(level: Level, color_matrix: ColorMatrix) -> Self {
        debug!("Building color conversion tables for {level:?} / {color_matrix:?}");

        let kr = color_matrix.kr();
        let kg = color_matrix.kg();
        let kb = color_matrix.kb();
        let y_range = level.luma_range();
        let uv_range = level.chroma_range();

        let cyr = round_fixed(kr * y_range * 65536.0);
        let cyg = round_fixed(kg * y_range * 65536.0);
        let cyb = round_fixed(kb * y_range * 65536.0);

        let cbu = round_fixed((1.0 - kb) * 2.0 / uv_range * 65536.0);
        let cgu = round_fixed((1.0 - kb) * 2.0 * kb / uv_range * 65536.0);
        let cgv = round_fixed((1.0 - kr) * 2.0 * kr / uv_range * 65536.0);
        let crv = round_fixed((1.0 - kr) * 2.0 / uv_range * 65536.0);

        // 10-bit inverse of the chroma weighting, formed in double precision.
        let cu = (1.0 / f64::from((1.0 - kb) * 2.0 / uv_range) * 1024.0).round() as i32;
        let cv = (1.0 / f64::from((1.0 - kr) * 2.0 / uv_range) * 1024.0).round() as i32;

        let luma_rescale = round_fixed(1.0 / y_range * 65536.0);

        let clip = std::array::from_fn(|i| match i {
            0..256 => 0,
            256..512 => (i - 256) as u8,
            _ => 255,
        });

        let ramp = |coef: i32| -> [i32; 256] { std::array::from_fn(|i| coef * i as i32) };
        let centered = |coef: i32| -> [i32; 256] { std::array::from_fn(|i| coef * (i as i32 - 128)) };

        Self {
            level,
            color_matrix,
            clip,
            rgb_to_y: RgbToYTables {
                r: ramp(cyr),
                g: ramp(cyg),
                b: ramp(cyb),
            },
            chroma_to_rgb: ChromaToRgbTables {
                bu: centered(cbu),
                gu: centered(cgu),
                gv: centered(cgv),
                rv: centered(crv),
            },
            cu,
            cv,
            luma_rescale,
        }
    }

    /// Signal level these tables were built for.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Color matrix these tables were built for.
    #[must_use]
    pub const fn color_matrix(&self) -> ColorMatrix {
        self.color_matrix
    }

    /// The `(level, matrix)` pair of this converter.
    #[must_use]
    pub const fn profile(&self) -> Profile {
        Profile::new(self.level, self.color_matrix)
    }

    /// The raw clip table: `0` for the first 256 entries, identity for the next 256, `255` for the rest.
    #[must_use]
    pub const fn clip_table(&self) -> &[u8; CLIP_TABLE_LEN] {
        &self.clip
    }

    /// Per channel luma contributions.
    #[must_use]
    pub const fn rgb_to_y_tables(&self) -> &RgbToYTables {
        &self.rgb_to_y
    }

    /// Chroma to RGB contributions.
    #[must_use]
    pub const fn chroma_to_rgb_tables(&self) -> &ChromaToRgbTables {
        &self.chroma_to_rgb
    }

    /// Chroma scale coefficients `(cu, cv)` in 10-bit fixed point.
    #[must_use]
    pub const fn chroma_scale(&self) -> (i32, i32) {
        (self.cu, self.cv)
    }

    /// Luma rescale coefficient in 16.16 fixed point.
    #[must_use]
    pub const fn luma_rescale(&self) -> i32 {
        self.luma_rescale
    }

    /// Saturates `value` into `[0, 255]` through the clip table.
    ///
    /// Values outside `[-256, 511]` saturate as well.
    #[must_use]
    #[inline]
    pub fn clip(&self, value: i32) -> u8 {
        let index = value.clamp(-CLIP_BIAS, 2 * CLIP_BIAS - 1) + CLIP_BIAS;
        self.clip[index as usize]
    }

    /// Rescales an 8-bit luma sample into the fixed point domain expected by
    /// [`chroma_u`](Self::chroma_u) and [`chroma_v`](Self::chroma_v).
    #[must_use]
    #[inline]
    pub fn scale_luma(&self, y: u8) -> i32 {
        match self.level {
            Level::Pc => i32::from(y) * self.luma_rescale,
            Level::Tv => (i32::from(y) - LUMA_FOOTROOM_TV) * self.luma_rescale,
        }
    }

    /// Computes luma for the given RGB sample.
    ///
    /// Studio range rounds to nearest, full range truncates.
    #[must_use]
    #[inline]
    pub fn rgb_to_luma(&self, r: u8, g: u8, b: u8) -> u8 {
        let sum = self.rgb_to_y.b[usize::from(b)] + self.rgb_to_y.g[usize::from(g)] + self.rgb_to_y.r[usize::from(r)];

        let offset = match self.level {
            Level::Pc => 0,
            Level::Tv => LUMA_OFFSET_TV,
        };

        self.clip((sum + offset) >> 16)
    }

    /// Computes U from a luma value obtained via [`scale_luma`](Self::scale_luma) and the blue channel.
    #[must_use]
    #[inline]
    pub fn chroma_u(&self, scaled_luma: i32, b: u8) -> u8 {
        self.chroma(scaled_luma, b, self.cu)
    }

    /// Computes V from a luma value obtained via [`scale_luma`](Self::scale_luma) and the red channel.
    #[must_use]
    #[inline]
    pub fn chroma_v(&self, scaled_luma: i32, r: u8) -> u8 {
        self.chroma(scaled_luma, r, self.cv)
    }

    /// Converts a single RGB sample to `(y, u, v)`.
    ///
    /// Chroma is derived from the already quantized luma, the same way a compositor does it when
    /// it only keeps the 8-bit Y around.
    #[must_use]
    pub fn rgb_to_yuv(&self, r: u8, g: u8, b: u8) -> (u8, u8, u8) {
        let y = self.rgb_to_luma(r, g, b);
        let scaled = self.scale_luma(y);
        (y, self.chroma_u(scaled, b), self.chroma_v(scaled, r))
    }

    #[inline]
    fn chroma(&self, scaled_luma: i32, channel: u8, coefficient: i32) -> u8 {
        let round = match self.level {
            Level::Pc => 0,
            Level::Tv => CHROMA_ROUND_TV,
        };

        // Widened so arbitrary scaled luma can't overflow; the shifted result always fits an i32.
        let diff = ((i64::from(channel) << 16) - i64::from(scaled_luma)) >> 10;
        let sum = diff * i64::from(coefficient) + CHROMA_OFFSET + round;

        self.clip((sum >> 16) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::{CLIP_TABLE_LEN, ColorConverter};
    use crate::{ColorMatrix, Level};

    #[test]
    fn clip_table_layout() {
        let conv = ColorConverter::new(Level::Pc, ColorMatrix::Bt601);
        let clip = conv.clip_table();

        assert_eq!(clip.len(), CLIP_TABLE_LEN);
        assert!(clip[..256].iter().all(|&x| x == 0));
        assert!(clip[512..].iter().all(|&x| x == 255));
        for i in 0..256 {
            assert_eq!(clip[i + 256], i as u8);
        }
    }

    #[test]
    fn clip_saturates() {
        let conv = ColorConverter::new(Level::Tv, ColorMatrix::Bt709);

        assert_eq!(conv.clip(-1), 0);
        assert_eq!(conv.clip(0), 0);
        assert_eq!(conv.clip(128), 128);
        assert_eq!(conv.clip(255), 255);
        assert_eq!(conv.clip(256), 255);
        assert_eq!(conv.clip(i32::MIN), 0);
        assert_eq!(conv.clip(i32::MAX), 255);
    }

    #[test]
    fn coefficients_bt601_tv() {
        let conv = ColorConverter::new(Level::Tv, ColorMatrix::Bt601);
        let y = conv.rgb_to_y_tables();

        assert_eq!(y.r[1], 16829);
        assert_eq!(y.g[1], 33039);
        assert_eq!(y.b[1], 6416);
        assert_eq!(y.r[0], 0);
        assert_eq!(y.r[255], 16829 * 255);
        assert_eq!(conv.chroma_scale(), (508, 642));
        assert_eq!(conv.luma_rescale(), 76309);
    }

    #[test]
    fn coefficients_bt709_pc() {
        let conv = ColorConverter::new(Level::Pc, ColorMatrix::Bt709);
        let y = conv.rgb_to_y_tables();

        assert_eq!(y.r[1], 13926);
        assert_eq!(y.g[1], 46884);
        assert_eq!(y.b[1], 4725);
        assert_eq!(conv.chroma_scale(), (552, 650));
        assert_eq!(conv.luma_rescale(), 65536);
    }

    #[test]
    fn chroma_to_rgb_tables_are_centered() {
        let conv = ColorConverter::new(Level::Pc, ColorMatrix::Bt601);
        let t = conv.chroma_to_rgb_tables();

        assert_eq!(t.bu[128], 0);
        assert_eq!(t.rv[128], 0);
        assert_eq!(t.bu[129], 116130);
        assert_eq!(t.gu[129], 13239);
        assert_eq!(t.gv[129], 27473);
        assert_eq!(t.rv[129], 91881);
        assert_eq!(t.rv[0], -91881 * 128);
    }

    #[test]
    fn scale_luma_removes_footroom() {
        let tv = ColorConverter::new(Level::Tv, ColorMatrix::Bt601);
        let pc = ColorConverter::new(Level::Pc, ColorMatrix::Bt601);

        assert_eq!(tv.scale_luma(16), 0);
        assert_eq!(tv.scale_luma(0), -16 * 76309);
        assert_eq!(tv.scale_luma(235), 219 * 76309);
        assert_eq!(pc.scale_luma(0), 0);
        assert_eq!(pc.scale_luma(255), 255 << 16);
    }

    #[test]
    fn primaries_bt601_tv() {
        let conv = ColorConverter::new(Level::Tv, ColorMatrix::Bt601);

        assert_eq!(conv.rgb_to_yuv(0, 0, 0), (16, 128, 128));
        assert_eq!(conv.rgb_to_yuv(255, 255, 255), (235, 128, 128));
        assert_eq!(conv.rgb_to_yuv(255, 0, 0), (81, 90, 240));
        assert_eq!(conv.rgb_to_yuv(0, 255, 0), (145, 53, 34));
        assert_eq!(conv.rgb_to_yuv(0, 0, 255), (41, 240, 110));
    }

    #[test]
    fn primaries_bt709_tv() {
        let conv = ColorConverter::new(Level::Tv, ColorMatrix::Bt709);

        assert_eq!(conv.rgb_to_yuv(255, 0, 0), (63, 102, 240));
        assert_eq!(conv.rgb_to_yuv(0, 255, 0), (173, 41, 26));
        assert_eq!(conv.rgb_to_yuv(0, 0, 255), (32, 240, 118));
    }

    #[test]
    fn primaries_pc() {
        let bt601 = ColorConverter::new(Level::Pc, ColorMatrix::Bt601);
        let bt709 = ColorConverter::new(Level::Pc, ColorMatrix::Bt709);

        assert_eq!(bt601.rgb_to_yuv(255, 255, 255), (255, 128, 128));
        assert_eq!(bt601.rgb_to_yuv(255, 0, 0), (76, 85, 255));
        assert_eq!(bt601.rgb_to_yuv(0, 0, 255), (29, 255, 107));

        // BT.709 weights round to 65535 / 65536 and full range truncates.
        assert_eq!(bt709.rgb_to_yuv(255, 255, 255), (254, 128, 128));
        assert_eq!(bt709.rgb_to_yuv(255, 0, 0), (54, 98, 255));
    }

    #[test]
    fn chroma_saturates_for_extreme_luma() {
        for level in Level::ALL {
            for matrix in ColorMatrix::ALL {
                let conv = ColorConverter::new(level, matrix);

                assert_eq!(conv.chroma_u(i32::MIN, 255), 255);
                assert_eq!(conv.chroma_v(i32::MIN, 255), 255);
                assert_eq!(conv.chroma_u(i32::MAX, 0), 0);
                assert_eq!(conv.chroma_v(i32::MAX, 0), 0);
            }
        }
    }
}
