//! Errors raised while resolving conversion profiles.

use thiserror::Error;

/// Raised when an untyped conversion profile can't be resolved.
///
/// None of the per-pixel operations return this; it only exists at the boundary where
/// plain integers are turned into a [`Profile`](crate::Profile).
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// The signal level is neither PC (`0`) nor TV (`1`).
    #[error("invalid signal level {0}, expected 0 (PC) or 1 (TV)")]
    InvalidLevel(i32),

    /// The color matrix is neither BT.601 (`0`) nor BT.709 (`1`).
    #[error("invalid color matrix {0}, expected 0 (BT.601) or 1 (BT.709)")]
    InvalidColorMatrix(i32),
}
