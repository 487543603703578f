//! Wavefront OBJ and MTL output.

use icon_mesh::Mesh;
use std::io::{self, Write};

#[derive(Clone, Debug, PartialEq)]
pub struct ObjOptions {
    pub object_name: String,
    /// Written as `mtllib`/`usemtl` when set.
    pub material: Option<ObjMaterial>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjMaterial {
    pub library: String,
    pub name: String,
}

/// Writes `mesh` as OBJ with 1-based `v/vt/vn` face references.
pub fn write_obj<W: Write>(writer: &mut W, mesh: &Mesh, options: &ObjOptions) -> io::Result<()> {
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    )?;
    if let Some(material) = &options.material {
        writeln!(writer, "mtllib {}", material.library)?;
    }
    writeln!(writer, "o {}", element_name(&options.object_name))?;

    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for uv in &mesh.uvs {
        writeln!(writer, "vt {} {}", uv[0], uv[1])?;
    }
    for n in &mesh.normals {
        writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
    }

    if let Some(material) = &options.material {
        writeln!(writer, "usemtl {}", material.name)?;
    }
    for (index, group) in mesh.groups.iter().enumerate() {
        if group.count == 0 {
            continue;
        }
        if group.name.is_empty() {
            writeln!(writer, "g shape{index}")?;
        } else {
            writeln!(writer, "g {}", element_name(&group.name))?;
        }
        for face in mesh.group_faces(group) {
            let [a, b, c] = face.map(|i| u64::from(i) + 1);
            writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }
    }

    Ok(())
}

/// Object and group names are single tokens; whitespace and control
/// characters become `_`.
pub fn element_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_whitespace() || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Writes a single diffuse material that samples `texture_file`.
pub fn write_mtl<W: Write>(writer: &mut W, material: &str, texture_file: &str) -> io::Result<()> {
    writeln!(writer, "newmtl {material}")?;
    writeln!(writer, "Ka 1 1 1")?;
    writeln!(writer, "Kd 1 1 1")?;
    writeln!(writer, "Ks 0 0 0")?;
    writeln!(writer, "d 1")?;
    writeln!(writer, "illum 1")?;
    writeln!(writer, "map_Kd {texture_file}")?;
    Ok(())
}
