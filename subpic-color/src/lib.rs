#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![doc = include_str!("../../README.md")]

mod converter;
mod error;
mod handle;
mod profile;
mod registry;

pub use converter::{CLIP_TABLE_LEN, ChromaToRgbTables, ColorConverter, RgbToYTables};
pub use error::Error;
pub use handle::{ConverterHandle, FALLBACK_CHROMA, FALLBACK_LUMA};
pub use profile::{ColorMatrix, Level, Profile};
pub use registry::{Registry, RegistryConfig};
