use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
#[non_exhaustive]
pub enum ExportError {
    #[error("failed to read {}", path.display())]
    #[diagnostic(code(icon_export::read_error))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(icon_export::write_error))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output file {} already exists", path.display())]
    #[diagnostic(
        code(icon_export::output_exists),
        help("pass --force to overwrite existing files")
    )]
    OutputExists { path: PathBuf },

    #[error("failed to decode icon {}", path.display())]
    #[diagnostic(code(icon_export::decode_error))]
    Decode {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: ps2icon::error::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Mesh(#[from] icon_mesh::error::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Texture(#[from] icon_texture::error::Error),

    #[error("unsupported texture format for {}", path.display())]
    #[diagnostic(
        code(icon_export::texture_format),
        help("use a .tga or .png extension")
    )]
    UnsupportedTextureFormat { path: PathBuf },

    #[error("failed to encode texture {}", path.display())]
    #[diagnostic(code(icon_export::image_error))]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid batch manifest {}", path.display())]
    #[diagnostic(code(icon_export::manifest_error))]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
