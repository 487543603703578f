use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("unexpected end of data at offset {offset} (wanted {wanted} bytes, {remaining} left)")]
    #[diagnostic(code(common::unexpected_eof))]
    UnexpectedEof {
        offset: usize,
        wanted: usize,
        remaining: usize,
    },
}
