//! Lazily built, shared converters per profile.

use crate::{ColorConverter, ColorMatrix, ConverterHandle, Level, Profile};
use log::{debug, error};
use std::sync::OnceLock;

/// Configuration for the [`Registry`].
///
/// Only controls how [`Registry::get_by_resolution`] picks a matrix; the level picked is always
/// [`Level::Tv`], since decoded video is assumed to be studio range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct RegistryConfig {
    sd_max_width: u32,
    sd_max_height: u32,
}

impl RegistryConfig {
    /// Creates a new default config, frames up to `1024x576` count as standard definition.
    pub const fn new() -> Self {
        Self {
            sd_max_width: 1024,
            sd_max_height: 576,
        }
    }

    /// Widest frame still treated as standard definition.
    pub const fn sd_max_width(mut self, width: u32) -> Self {
        self.sd_max_width = width;
        self
    }

    /// Tallest frame still treated as standard definition.
    pub const fn sd_max_height(mut self, height: u32) -> Self {
        self.sd_max_height = height;
        self
    }

    /// Whether a frame of the given size is high definition (and thus BT.709).
    #[must_use]
    pub const fn is_high_definition(&self, width: u32, height: u32) -> bool {
        width > self.sd_max_width || height > self.sd_max_height
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds at most one [`ColorConverter`] per [`Profile`].
///
/// Converters are built on first request and live as long as the registry; every later request
/// for the same profile returns the same instance. All methods take `&self` and can be called
/// from any number of threads.
///
/// ```
/// use subpic_color::{ColorMatrix, Level, Registry};
///
/// let registry = Registry::new();
/// let a = registry.get(Level::Tv, ColorMatrix::Bt709);
/// let b = registry.get_by_resolution(1920, 1080);
///
/// assert!(std::ptr::eq(a, b));
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
    slots: [[OnceLock<Box<ColorConverter>>; 2]; 2],
}

impl Registry {
    /// Creates an empty registry with the default config.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_config(RegistryConfig::new())
    }

    /// Creates an empty registry with the given config.
    #[must_use]
    pub const fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            slots: [[OnceLock::new(), OnceLock::new()], [OnceLock::new(), OnceLock::new()]],
        }
    }

    /// Process wide registry with the default config, for callers that can't pass one around.
    ///
    /// Prefer owning a [`Registry`] and handing it to whoever converts pixels; this exists for
    /// plugin style callers without such a place.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: Registry = Registry::new();
        &GLOBAL
    }

    /// The config this registry was created with.
    pub const fn config(&self) -> RegistryConfig {
        self.config
    }

    /// Returns the converter for `level` and `color_matrix`, building it if needed.
    #[must_use]
    pub fn get(&self, level: Level, color_matrix: ColorMatrix) -> &ColorConverter {
        self.slots[level.index()][color_matrix.index()].get_or_init(|| {
            let converter = Box::new(ColorConverter::new(level, color_matrix));
            debug!("Publishing color converter for {level:?} / {color_matrix:?}");
            converter
        })
    }

    /// Same as [`get`](Self::get), for a [`Profile`].
    #[must_use]
    pub fn get_profile(&self, profile: Profile) -> &ColorConverter {
        self.get(profile.level, profile.color_matrix)
    }

    /// Picks a studio range converter based on frame size.
    ///
    /// Frames wider or taller than the config's standard definition bounds get BT.709,
    /// everything else BT.601. Sizes are unsigned, callers holding signed sizes should convert
    /// with `u32::try_from` (or clamp negatives to `0`, which selects BT.601).
    #[must_use]
    pub fn get_by_resolution(&self, width: u32, height: u32) -> &ColorConverter {
        let color_matrix = if self.config.is_high_definition(width, height) {
            ColorMatrix::Bt709
        } else {
            ColorMatrix::Bt601
        };

        self.get(Level::Tv, color_matrix)
    }

    /// Returns the converter for raw `level` and `color_matrix` values.
    ///
    /// In release builds invalid values are logged and yield [`ConverterHandle::Fallback`],
    /// which converts every pixel to neutral output.
    ///
    /// # Panics
    ///
    /// In debug builds, if either value is invalid.
    #[must_use]
    pub fn get_raw(&self, level: i32, color_matrix: i32) -> ConverterHandle<'_> {
        match Profile::from_raw(level, color_matrix) {
            Ok(profile) => ConverterHandle::Resolved(self.get_profile(profile)),
            Err(e) => {
                debug_assert!(false, "Invalid color conversion profile: {e}");

                error!("Invalid color conversion profile, using neutral fallback: {e}");
                ConverterHandle::Fallback
            }
        }
    }

    /// Whether the converter for `level` and `color_matrix` has been built already.
    #[must_use]
    pub fn is_initialized(&self, level: Level, color_matrix: ColorMatrix) -> bool {
        self.slots[level.index()][color_matrix.index()].get().is_some()
    }
}
