pub mod config;
pub mod error;
pub mod obj;
pub mod pipeline;
pub mod raster;
pub mod usda;

pub use crate::config::{load_manifest, BatchManifest, ConvertJob};
pub use crate::pipeline::{convert, convert_icon, load_icon, ConvertReport};

use crate::error::ExportError;

pub type Result<T> = core::result::Result<T, ExportError>;
