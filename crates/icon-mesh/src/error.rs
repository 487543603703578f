use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid mesh scale {scale}, expected a positive finite value")]
    #[diagnostic(code(icon_mesh::invalid_scale))]
    InvalidScale { scale: f32 },

    #[error("frame {requested} out of range, icon has {frame_count} frames")]
    #[diagnostic(code(icon_mesh::frame_out_of_range))]
    FrameOutOfRange { requested: usize, frame_count: u32 },
}
