pub mod error;
mod parse;

pub use crate::parse::{parse_icon, parse_icon_with};

use crate::error::Error;

pub type Result<T> = core::result::Result<T, Error>;

pub const ICON_MAGIC: u32 = 0x0001_0000;
pub const HEADER_SIZE: usize = 20;
pub const SHAPE_NAME_SIZE: usize = 16;
pub const TEXTURE_WIDTH: usize = 128;
pub const TEXTURE_HEIGHT: usize = 128;
pub const TEXEL_COUNT: usize = TEXTURE_WIDTH * TEXTURE_HEIGHT;
pub const TEXTURE_SIZE: usize = TEXEL_COUNT * 4;

/// Vertex pool arrangement, selected by the header version.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexLayout {
    /// Version 1: position, normal and UV stored per vertex.
    Interleaved,
    /// Version 2: all positions, then all normals, then all UVs.
    Split,
}

impl VertexLayout {
    pub fn from_version(version: u16) -> Option<Self> {
        match version {
            1 => Some(Self::Interleaved),
            2 => Some(Self::Split),
            _ => None,
        }
    }

    pub fn version(self) -> u16 {
        match self {
            Self::Interleaved => 1,
            Self::Split => 2,
        }
    }
}

/// Upper bounds applied to header counts before anything is allocated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_vertices: u32,
    pub max_shapes: u32,
    pub max_frames: u32,
    /// Total across all shapes.
    pub max_triangles: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_vertices: 65_536,
            max_shapes: 1_024,
            max_frames: 256,
            max_triangles: 1 << 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub layout: VertexLayout,
    pub flags: u16,
    pub vertex_count: u32,
    pub shape_count: u32,
    pub frame_count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub name: String,
    pub triangles: Vec<[u32; 3]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    /// Absolute positions (frame 0 plus the stored delta).
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
}

/// Keyframes 1..frame_count; frame 0 is the base pose stored on [`RawIcon`].
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub speed: f32,
    pub play_offset: u32,
    pub frames: Vec<Keyframe>,
}

/// Fully decoded icon, texture still in its stored channel order and
/// orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct RawIcon {
    pub header: Header,
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub shapes: Vec<Shape>,
    pub animation: Option<Animation>,
    pub texture: Box<[u32; TEXEL_COUNT]>,
    /// Bytes after the texture block that the decoder skipped.
    pub trailing_bytes: usize,
}

impl RawIcon {
    pub fn vertex_count(&self) -> u32 {
        self.header.vertex_count
    }

    pub fn shape_count(&self) -> u32 {
        self.header.shape_count
    }

    pub fn frame_count(&self) -> u32 {
        self.header.frame_count
    }

    pub fn is_animated(&self) -> bool {
        self.header.frame_count > 1
    }

    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(|shape| shape.triangles.len()).sum()
    }

    pub fn frame_positions(&self, frame: usize) -> Option<&[[f32; 3]]> {
        if frame == 0 {
            return Some(&self.vertices);
        }
        self.keyframe(frame).map(|key| key.positions.as_slice())
    }

    pub fn frame_normals(&self, frame: usize) -> Option<&[[f32; 3]]> {
        if frame == 0 {
            return Some(&self.normals);
        }
        self.keyframe(frame).map(|key| key.normals.as_slice())
    }

    pub fn frame_time(&self, frame: usize) -> Option<f32> {
        if frame == 0 {
            return Some(0.0);
        }
        self.keyframe(frame).map(|key| key.time)
    }

    fn keyframe(&self, frame: usize) -> Option<&Keyframe> {
        self.animation.as_ref()?.frames.get(frame.checked_sub(1)?)
    }

    pub fn vertex_x(&self, index: usize) -> Option<f32> {
        self.vertices.get(index).map(|v| v[0])
    }

    pub fn vertex_y(&self, index: usize) -> Option<f32> {
        self.vertices.get(index).map(|v| v[1])
    }

    pub fn vertex_z(&self, index: usize) -> Option<f32> {
        self.vertices.get(index).map(|v| v[2])
    }

    pub fn normal_x(&self, index: usize) -> Option<f32> {
        self.normals.get(index).map(|n| n[0])
    }

    pub fn normal_y(&self, index: usize) -> Option<f32> {
        self.normals.get(index).map(|n| n[1])
    }

    pub fn normal_z(&self, index: usize) -> Option<f32> {
        self.normals.get(index).map(|n| n[2])
    }

    pub fn uv_u(&self, index: usize) -> Option<f32> {
        self.uvs.get(index).map(|uv| uv[0])
    }

    pub fn uv_v(&self, index: usize) -> Option<f32> {
        self.uvs.get(index).map(|uv| uv[1])
    }

    /// Texture row `row` as stored in the file (bottom-up).
    pub fn texture_row(&self, row: usize) -> Option<&[u32]> {
        let start = row.checked_mul(TEXTURE_WIDTH)?;
        self.texture.get(start..start.checked_add(TEXTURE_WIDTH)?)
    }
}

#[cfg(test)]
mod tests;
