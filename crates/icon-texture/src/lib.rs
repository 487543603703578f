pub mod error;

use crate::error::Error;
use ps2icon::{TEXEL_COUNT, TEXTURE_HEIGHT, TEXTURE_WIDTH};

pub type Result<T> = core::result::Result<T, Error>;

/// Row-major RGBA8 image with a top-left origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

impl RasterImage {
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let width = usize::try_from(self.width).ok()?;
        if x >= width {
            return None;
        }
        let off = y.checked_mul(width)?.checked_add(x)?.checked_mul(4)?;
        let px = self.rgba8.get(off..off.checked_add(4)?)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn row(&self, y: usize) -> Option<&[u8]> {
        let stride = usize::try_from(self.width).ok()?.checked_mul(4)?;
        let start = y.checked_mul(stride)?;
        self.rgba8.get(start..start.checked_add(stride)?)
    }
}

/// Converts the icon's stored texture block into a top-down RGBA image.
pub fn normalize_texture(words: &[u32; TEXEL_COUNT]) -> RasterImage {
    let mut rgba8 = reorder_channels(words);
    swap_rows(&mut rgba8, TEXTURE_WIDTH * 4);
    RasterImage {
        width: TEXTURE_WIDTH as u32,
        height: TEXTURE_HEIGHT as u32,
        rgba8,
    }
}

/// Same as [`normalize_texture`] for a borrowed word slice of declared size.
pub fn normalize_words(words: &[u32], width: usize, height: usize) -> Result<RasterImage> {
    if width != TEXTURE_WIDTH || height != TEXTURE_HEIGHT || words.len() != TEXEL_COUNT {
        return Err(Error::InvalidTextureDimensions {
            width,
            height,
            words: words.len(),
        });
    }
    let mut rgba8 = reorder_channels(words);
    flip_rows(&mut rgba8, width, height)?;
    Ok(RasterImage {
        width: TEXTURE_WIDTH as u32,
        height: TEXTURE_HEIGHT as u32,
        rgba8,
    })
}

/// Expands packed ARGB words (alpha in the high byte) into RGBA bytes.
pub fn reorder_channels(words: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len().saturating_mul(4));
    for &word in words {
        out.extend_from_slice(&argb_to_rgba(word));
    }
    out
}

pub fn argb_to_rgba(word: u32) -> [u8; 4] {
    let a = ((word >> 24) & 0xFF) as u8;
    let r = ((word >> 16) & 0xFF) as u8;
    let g = ((word >> 8) & 0xFF) as u8;
    let b = (word & 0xFF) as u8;
    [r, g, b, a]
}

/// Swaps row `r` with row `height - 1 - r` in an RGBA8 buffer.
///
/// The buffer must hold exactly `width * height` pixels.
pub fn flip_rows(rgba8: &mut [u8], width: usize, height: usize) -> Result<()> {
    let stride = width.checked_mul(4);
    let needed = stride.and_then(|stride| stride.checked_mul(height));
    match (stride, needed) {
        (Some(stride), Some(needed)) if needed == rgba8.len() => {
            swap_rows(rgba8, stride);
            Ok(())
        }
        _ => Err(Error::RowBufferMismatch {
            width,
            height,
            len: rgba8.len(),
        }),
    }
}

fn swap_rows(rgba8: &mut [u8], stride: usize) {
    if stride == 0 {
        return;
    }
    let height = rgba8.len() / stride;
    let (top, bottom) = rgba8.split_at_mut(stride * (height / 2));
    // An odd middle row stays in place.
    let bottom_start = bottom.len() - top.len();
    for (upper, lower) in top
        .chunks_exact_mut(stride)
        .zip(bottom[bottom_start..].chunks_exact_mut(stride).rev())
    {
        upper.swap_with_slice(lower);
    }
}
