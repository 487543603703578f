use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(
        "invalid texture dimensions {width}x{height} with {words} words, expected 128x128 with 16384 words"
    )]
    #[diagnostic(code(icon_texture::invalid_dimensions))]
    InvalidTextureDimensions {
        width: usize,
        height: usize,
        words: usize,
    },

    #[error("pixel buffer of {len} bytes does not hold {width}x{height} RGBA8 pixels")]
    #[diagnostic(code(icon_texture::row_buffer_mismatch))]
    RowBufferMismatch {
        width: usize,
        height: usize,
        len: usize,
    },
}
