use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("malformed icon header: {reason}")]
    #[diagnostic(code(ps2icon::malformed_header))]
    MalformedHeader { reason: String },

    #[error(
        "truncated icon file in {section} section at offset {offset} (needed {needed} bytes, {available} available)"
    )]
    #[diagnostic(
        code(ps2icon::truncated_file),
        help("the file is shorter than its header declares")
    )]
    TruncatedFile {
        section: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error(
        "shape {shape} triangle {triangle} references vertex {index}, but the icon has {vertex_count} vertices"
    )]
    #[diagnostic(code(ps2icon::index_out_of_range))]
    IndexOutOfRange {
        shape: usize,
        triangle: usize,
        index: u32,
        vertex_count: u32,
    },
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            reason: reason.into(),
        }
    }
}
