pub mod error;

use crate::error::Error;
use ps2icon::RawIcon;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshOptions {
    pub frame: usize,
    pub scale: f32,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            frame: 0,
            scale: 1.0,
        }
    }
}

/// Contiguous face range contributed by one icon shape.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceGroup {
    pub name: String,
    pub start: usize,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub faces: Vec<[u32; 3]>,
    pub groups: Vec<FaceGroup>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn group_faces(&self, group: &FaceGroup) -> &[[u32; 3]] {
        let end = group.start.saturating_add(group.count).min(self.faces.len());
        self.faces.get(group.start..end).unwrap_or(&[])
    }
}

/// Builds a flat triangle mesh for one frame of `icon`.
///
/// Positions are scaled and converted from the icon's Y-down basis by
/// negating Y. Normals, UVs and triangle indices are copied unchanged, so
/// vertex `i` of the mesh is vertex `i` of the icon.
pub fn build_mesh(icon: &RawIcon, options: &MeshOptions) -> Result<Mesh> {
    let scale = options.scale;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::InvalidScale { scale });
    }

    let out_of_range = || Error::FrameOutOfRange {
        requested: options.frame,
        frame_count: icon.frame_count(),
    };
    let frame_positions = icon.frame_positions(options.frame).ok_or_else(out_of_range)?;
    let frame_normals = icon.frame_normals(options.frame).ok_or_else(out_of_range)?;

    let positions = frame_positions
        .iter()
        .map(|p| [p[0] * scale, -(p[1] * scale), p[2] * scale])
        .collect();

    let mut faces = Vec::with_capacity(icon.triangle_count());
    let mut groups = Vec::with_capacity(icon.shapes.len());
    for shape in &icon.shapes {
        groups.push(FaceGroup {
            name: shape.name.clone(),
            start: faces.len(),
            count: shape.triangles.len(),
        });
        faces.extend_from_slice(&shape.triangles);
    }

    Ok(Mesh {
        positions,
        normals: frame_normals.to_vec(),
        uvs: icon.uvs.clone(),
        faces,
        groups,
    })
}

pub fn compute_bounds(vertices: &[[f32; 3]]) -> Option<([f32; 3], [f32; 3])> {
    let mut iter = vertices.iter();
    let first = iter.next()?;
    let mut min_v = *first;
    let mut max_v = *first;

    for v in iter {
        for i in 0..3 {
            if v[i] < min_v[i] {
                min_v[i] = v[i];
            }
            if v[i] > max_v[i] {
                max_v[i] = v[i];
            }
        }
    }

    Some((min_v, max_v))
}
