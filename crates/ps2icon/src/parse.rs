use crate::error::Error;
use crate::{
    Animation, Header, Keyframe, Limits, RawIcon, Result, Shape, VertexLayout, HEADER_SIZE,
    ICON_MAGIC, SHAPE_NAME_SIZE, TEXEL_COUNT, TEXTURE_SIZE,
};
use common::error::CursorError;
use common::ByteCursor;

const VEC2_SIZE: usize = 8;
const VEC3_SIZE: usize = 12;
const VERTEX_RECORD_SIZE: usize = VEC3_SIZE * 2 + VEC2_SIZE;
const TRIANGLE_SIZE: usize = 12;
const KEYFRAME_VERTEX_SIZE: usize = VEC3_SIZE * 2;

/// Decodes a complete icon file using the default [`Limits`].
pub fn parse_icon(payload: &[u8]) -> Result<RawIcon> {
    parse_icon_with(payload, &Limits::default())
}

/// Decodes a complete icon file, rejecting header counts above `limits`.
pub fn parse_icon_with(payload: &[u8], limits: &Limits) -> Result<RawIcon> {
    let mut cursor = ByteCursor::new(payload);

    let header = parse_header(&mut cursor, limits)?;
    let vertex_count = to_usize(header.vertex_count)?;

    let (vertices, normals, uvs) = parse_vertex_pool(&mut cursor, header.layout, vertex_count)?;
    let shapes = parse_shapes(&mut cursor, &header, limits)?;
    let animation = if header.frame_count > 1 {
        Some(parse_animation(&mut cursor, &header, &vertices)?)
    } else {
        None
    };
    let texture = parse_texture(&mut cursor)?;

    Ok(RawIcon {
        header,
        vertices,
        normals,
        uvs,
        shapes,
        animation,
        texture,
        trailing_bytes: cursor.remaining(),
    })
}

fn parse_header(cursor: &mut ByteCursor<'_>, limits: &Limits) -> Result<Header> {
    cursor.ensure(HEADER_SIZE).map_err(truncated("header"))?;

    let magic = cursor.read_u32().map_err(truncated("header"))?;
    if magic != ICON_MAGIC {
        return Err(Error::malformed(format!(
            "invalid magic 0x{magic:08X}, expected 0x{ICON_MAGIC:08X}"
        )));
    }

    let version = cursor.read_u16().map_err(truncated("header"))?;
    let layout = VertexLayout::from_version(version)
        .ok_or_else(|| Error::malformed(format!("unsupported version {version}")))?;
    let flags = cursor.read_u16().map_err(truncated("header"))?;
    let vertex_count = cursor.read_u32().map_err(truncated("header"))?;
    let shape_count = cursor.read_u32().map_err(truncated("header"))?;
    let frame_count = cursor.read_u32().map_err(truncated("header"))?;

    check_limit("vertex_count", vertex_count, limits.max_vertices)?;
    check_limit("shape_count", shape_count, limits.max_shapes)?;
    if frame_count == 0 {
        return Err(Error::malformed("frame_count must be at least 1"));
    }
    check_limit("frame_count", frame_count, limits.max_frames)?;

    Ok(Header {
        layout,
        flags,
        vertex_count,
        shape_count,
        frame_count,
    })
}

type VertexPool = (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<[f32; 2]>);

fn parse_vertex_pool(
    cursor: &mut ByteCursor<'_>,
    layout: VertexLayout,
    vertex_count: usize,
) -> Result<VertexPool> {
    let section_size = checked_size(vertex_count, VERTEX_RECORD_SIZE)?;
    cursor
        .ensure(section_size)
        .map_err(truncated("vertex pool"))?;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    match layout {
        VertexLayout::Interleaved => {
            for _ in 0..vertex_count {
                positions.push(cursor.read_vec3().map_err(truncated("vertex pool"))?);
                normals.push(cursor.read_vec3().map_err(truncated("vertex pool"))?);
                uvs.push(cursor.read_vec2().map_err(truncated("vertex pool"))?);
            }
        }
        VertexLayout::Split => {
            for _ in 0..vertex_count {
                positions.push(cursor.read_vec3().map_err(truncated("vertex positions"))?);
            }
            for _ in 0..vertex_count {
                normals.push(cursor.read_vec3().map_err(truncated("vertex normals"))?);
            }
            for _ in 0..vertex_count {
                uvs.push(cursor.read_vec2().map_err(truncated("vertex uvs"))?);
            }
        }
    }

    Ok((positions, normals, uvs))
}

fn parse_shapes(
    cursor: &mut ByteCursor<'_>,
    header: &Header,
    limits: &Limits,
) -> Result<Vec<Shape>> {
    let shape_count = to_usize(header.shape_count)?;
    let mut shapes = Vec::with_capacity(shape_count);
    let mut total_triangles = 0u64;

    for shape_index in 0..shape_count {
        let name_raw = cursor
            .read_array::<SHAPE_NAME_SIZE>()
            .map_err(truncated("shape"))?;
        let triangle_count = cursor.read_u32().map_err(truncated("shape"))?;

        total_triangles += u64::from(triangle_count);
        if total_triangles > u64::from(limits.max_triangles) {
            return Err(Error::malformed(format!(
                "shape {shape_index} raises the triangle total to {total_triangles}, limit is {}",
                limits.max_triangles
            )));
        }

        let triangle_count = to_usize(triangle_count)?;
        cursor
            .ensure(checked_size(triangle_count, TRIANGLE_SIZE)?)
            .map_err(truncated("shape triangles"))?;

        let mut triangles = Vec::with_capacity(triangle_count);
        for triangle_index in 0..triangle_count {
            let mut triangle = [0u32; 3];
            for slot in &mut triangle {
                let index = cursor.read_u32().map_err(truncated("shape triangles"))?;
                if index >= header.vertex_count {
                    return Err(Error::IndexOutOfRange {
                        shape: shape_index,
                        triangle: triangle_index,
                        index,
                        vertex_count: header.vertex_count,
                    });
                }
                *slot = index;
            }
            triangles.push(triangle);
        }

        shapes.push(Shape {
            name: decode_name(&name_raw),
            triangles,
        });
    }

    Ok(shapes)
}

fn parse_animation(
    cursor: &mut ByteCursor<'_>,
    header: &Header,
    base_positions: &[[f32; 3]],
) -> Result<Animation> {
    let speed = cursor.read_f32().map_err(truncated("animation"))?;
    let play_offset = cursor.read_u32().map_err(truncated("animation"))?;

    let vertex_count = base_positions.len();
    let key_count = to_usize(header.frame_count - 1)?;
    let key_size = checked_size(vertex_count, KEYFRAME_VERTEX_SIZE)?
        .checked_add(4)
        .ok_or_else(|| Error::malformed("keyframe size overflows"))?;
    cursor
        .ensure(checked_size(key_count, key_size)?)
        .map_err(truncated("animation"))?;

    let mut frames = Vec::with_capacity(key_count);
    for _ in 0..key_count {
        let time = cursor.read_f32().map_err(truncated("animation"))?;
        let mut positions = Vec::with_capacity(vertex_count);
        for base in base_positions {
            let delta = cursor.read_vec3().map_err(truncated("animation"))?;
            positions.push([base[0] + delta[0], base[1] + delta[1], base[2] + delta[2]]);
        }
        let mut normals = Vec::with_capacity(vertex_count);
        for _ in 0..vertex_count {
            normals.push(cursor.read_vec3().map_err(truncated("animation"))?);
        }
        frames.push(Keyframe {
            time,
            positions,
            normals,
        });
    }

    Ok(Animation {
        speed,
        play_offset,
        frames,
    })
}

fn parse_texture(cursor: &mut ByteCursor<'_>) -> Result<Box<[u32; TEXEL_COUNT]>> {
    cursor.ensure(TEXTURE_SIZE).map_err(truncated("texture"))?;

    let mut texture = Box::new([0u32; TEXEL_COUNT]);
    for word in texture.iter_mut() {
        *word = cursor.read_u32().map_err(truncated("texture"))?;
    }
    Ok(texture)
}

/// NUL-terminated name; bytes after the first NUL are padding.
fn decode_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

fn check_limit(label: &str, value: u32, limit: u32) -> Result<()> {
    if value > limit {
        return Err(Error::malformed(format!(
            "{label}={value} exceeds limit {limit}"
        )));
    }
    Ok(())
}

fn checked_size(count: usize, stride: usize) -> Result<usize> {
    count
        .checked_mul(stride)
        .ok_or_else(|| Error::malformed(format!("section size overflows: {count} x {stride}")))
}

fn to_usize(value: u32) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::malformed(format!("count {value} overflows usize")))
}

fn truncated(section: &'static str) -> impl Fn(CursorError) -> Error {
    move |err| match err {
        CursorError::UnexpectedEof {
            offset,
            wanted,
            remaining,
        } => Error::TruncatedFile {
            section,
            offset,
            needed: wanted,
            available: remaining,
        },
    }
}
