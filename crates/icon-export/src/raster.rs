use crate::error::ExportError;
use crate::Result;
use icon_texture::RasterImage;
use image::{ExtendedColorType, ImageFormat};
use std::path::Path;

/// Encodes `raster` with the container implied by the file extension.
pub fn save_raster(raster: &RasterImage, path: &Path) -> Result<()> {
    let format = texture_format(path)?;
    image::save_buffer_with_format(
        path,
        &raster.rgba8,
        raster.width,
        raster.height,
        ExtendedColorType::Rgba8,
        format,
    )
    .map_err(|source| ExportError::Image {
        path: path.to_path_buf(),
        source,
    })
}

pub fn texture_format(path: &Path) -> Result<ImageFormat> {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Tga | ImageFormat::Png)) => Ok(format),
        _ => Err(ExportError::UnsupportedTextureFormat {
            path: path.to_path_buf(),
        }),
    }
}
