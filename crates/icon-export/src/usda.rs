//! USD ASCII scene output: one mesh prim and, when a texture is given, a
//! `UsdPreviewSurface` material bound to it.

use icon_mesh::Mesh;
use std::io::{self, Write};

#[derive(Clone, Debug, PartialEq)]
pub struct UsdaOptions {
    pub mesh_name: String,
    /// Asset path written into the texture reader.
    pub texture: Option<String>,
}

pub fn write_usda<W: Write>(writer: &mut W, mesh: &Mesh, options: &UsdaOptions) -> io::Result<()> {
    let mesh_name = prim_name(&options.mesh_name);

    writeln!(writer, "#usda 1.0")?;
    writeln!(writer, "(")?;
    writeln!(writer, "    defaultPrim = \"Root\"")?;
    writeln!(writer, "    metersPerUnit = 1")?;
    writeln!(writer, "    upAxis = \"Y\"")?;
    writeln!(writer, ")")?;
    writeln!(writer)?;
    writeln!(writer, "def Xform \"Root\"")?;
    writeln!(writer, "{{")?;

    if options.texture.is_some() {
        writeln!(writer, "    def Mesh \"{mesh_name}\" (")?;
        writeln!(writer, "        prepend apiSchemas = [\"MaterialBindingAPI\"]")?;
        writeln!(writer, "    )")?;
    } else {
        writeln!(writer, "    def Mesh \"{mesh_name}\"")?;
    }
    writeln!(writer, "    {{")?;

    let counts = vec!["3"; mesh.faces.len()].join(", ");
    writeln!(writer, "        int[] faceVertexCounts = [{counts}]")?;
    let indices = mesh
        .faces
        .iter()
        .flat_map(|face| face.iter().map(u32::to_string))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(writer, "        int[] faceVertexIndices = [{indices}]")?;
    if options.texture.is_some() {
        writeln!(writer, "        rel material:binding = </Root/Material>")?;
    }
    writeln!(
        writer,
        "        normal3f[] normals = [{}]",
        join_tuples(mesh.normals.iter().map(|n| n.as_slice()))
    )?;
    writeln!(
        writer,
        "        point3f[] points = [{}]",
        join_tuples(mesh.positions.iter().map(|p| p.as_slice()))
    )?;
    writeln!(
        writer,
        "        texCoord2f[] primvars:st = [{}] (",
        join_tuples(mesh.uvs.iter().map(|uv| uv.as_slice()))
    )?;
    writeln!(writer, "            interpolation = \"vertex\"")?;
    writeln!(writer, "        )")?;
    writeln!(writer, "        uniform token subdivisionScheme = \"none\"")?;
    writeln!(writer, "    }}")?;

    if let Some(texture) = &options.texture {
        writeln!(writer)?;
        write_material(writer, texture)?;
    }

    writeln!(writer, "}}")?;
    Ok(())
}

fn write_material<W: Write>(writer: &mut W, texture: &str) -> io::Result<()> {
    writeln!(writer, "    def Material \"Material\"")?;
    writeln!(writer, "    {{")?;
    writeln!(
        writer,
        "        token outputs:surface.connect = </Root/Material/Shader.outputs:surface>"
    )?;
    writeln!(writer)?;
    writeln!(writer, "        def Shader \"Shader\"")?;
    writeln!(writer, "        {{")?;
    writeln!(writer, "            uniform token info:id = \"UsdPreviewSurface\"")?;
    writeln!(
        writer,
        "            color3f inputs:diffuseColor.connect = </Root/Material/Texture.outputs:rgb>"
    )?;
    writeln!(
        writer,
        "            float inputs:opacity.connect = </Root/Material/Texture.outputs:a>"
    )?;
    writeln!(writer, "            float inputs:roughness = 1")?;
    writeln!(writer, "            token outputs:surface")?;
    writeln!(writer, "        }}")?;
    writeln!(writer)?;
    writeln!(writer, "        def Shader \"StReader\"")?;
    writeln!(writer, "        {{")?;
    writeln!(
        writer,
        "            uniform token info:id = \"UsdPrimvarReader_float2\""
    )?;
    writeln!(writer, "            string inputs:varname = \"st\"")?;
    writeln!(writer, "            float2 outputs:result")?;
    writeln!(writer, "        }}")?;
    writeln!(writer)?;
    writeln!(writer, "        def Shader \"Texture\"")?;
    writeln!(writer, "        {{")?;
    writeln!(writer, "            uniform token info:id = \"UsdUVTexture\"")?;
    writeln!(writer, "            asset inputs:file = @{}@", texture.replace('@', "_"))?;
    writeln!(
        writer,
        "            float2 inputs:st.connect = </Root/Material/StReader.outputs:result>"
    )?;
    writeln!(writer, "            float outputs:a")?;
    writeln!(writer, "            float3 outputs:rgb")?;
    writeln!(writer, "        }}")?;
    writeln!(writer, "    }}")?;
    Ok(())
}

fn join_tuples<'a>(values: impl Iterator<Item = &'a [f32]>) -> String {
    values
        .map(|v| {
            let parts: Vec<String> = v.iter().map(f32::to_string).collect();
            format!("({})", parts.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// USD prim names must be identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn prim_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
