use super::*;
use common::collect_files_recursive;
use proptest::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn icon_test_files() -> Vec<PathBuf> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("testdata");
    let mut files = Vec::new();
    collect_files_recursive(&root, &mut files);
    files.sort();
    files
        .into_iter()
        .filter(|path| {
            fs::read(path)
                .map(|bytes| bytes.get(0..4) == Some(&ICON_MAGIC.to_le_bytes()[..]))
                .unwrap_or(false)
        })
        .collect()
}

#[derive(Clone)]
struct SyntheticKey {
    time: f32,
    deltas: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
}

#[derive(Clone)]
struct SyntheticIcon {
    version: u16,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    shapes: Vec<(&'static str, Vec<[u32; 3]>)>,
    speed: f32,
    play_offset: u32,
    keys: Vec<SyntheticKey>,
    texture: Vec<u32>,
}

impl SyntheticIcon {
    fn triangle() -> Self {
        Self {
            version: 1,
            positions: vec![[0.0, 1.0, 0.0], [1.0, -1.0, 0.5], [-1.0, -1.0, -0.5]],
            normals: vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            uvs: vec![[0.5, 0.0], [1.0, 1.0], [0.0, 1.0]],
            shapes: vec![("body", vec![[0, 1, 2]])],
            speed: 1.0,
            play_offset: 0,
            keys: Vec::new(),
            texture: vec![0x80FF_4020; TEXEL_COUNT],
        }
    }

    fn with_keys(mut self, keys: Vec<SyntheticKey>) -> Self {
        self.keys = keys;
        self
    }

    fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&ICON_MAGIC.to_le_bytes());
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        push_u32(&mut out, self.positions.len());
        push_u32(&mut out, self.shapes.len());
        push_u32(&mut out, self.keys.len() + 1);

        if self.version == 2 {
            self.positions.iter().for_each(|v| push_f32s(&mut out, v));
            self.normals.iter().for_each(|v| push_f32s(&mut out, v));
            self.uvs.iter().for_each(|v| push_f32s(&mut out, v));
        } else {
            for i in 0..self.positions.len() {
                push_f32s(&mut out, &self.positions[i]);
                push_f32s(&mut out, &self.normals[i]);
                push_f32s(&mut out, &self.uvs[i]);
            }
        }

        for (name, triangles) in &self.shapes {
            let mut name_raw = [0u8; SHAPE_NAME_SIZE];
            name_raw[..name.len()].copy_from_slice(name.as_bytes());
            out.extend_from_slice(&name_raw);
            push_u32(&mut out, triangles.len());
            for tri in triangles {
                for index in tri {
                    out.extend_from_slice(&index.to_le_bytes());
                }
            }
        }

        if !self.keys.is_empty() {
            out.extend_from_slice(&self.speed.to_le_bytes());
            out.extend_from_slice(&self.play_offset.to_le_bytes());
            for key in &self.keys {
                out.extend_from_slice(&key.time.to_le_bytes());
                key.deltas.iter().for_each(|v| push_f32s(&mut out, v));
                key.normals.iter().for_each(|v| push_f32s(&mut out, v));
            }
        }

        for word in &self.texture {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out
    }
}

fn push_u32(out: &mut Vec<u8>, value: usize) {
    out.extend_from_slice(
        &u32::try_from(value)
            .expect("count overflow in test")
            .to_le_bytes(),
    );
}

fn push_f32s(out: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

fn two_key_animation() -> Vec<SyntheticKey> {
    vec![
        SyntheticKey {
            time: 0.5,
            deltas: vec![[0.0, 0.5, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            normals: vec![[0.0, 0.0, -1.0]; 3],
        },
        SyntheticKey {
            time: 1.0,
            deltas: vec![[0.0, 1.0, 0.0]; 3],
            normals: vec![[0.0, 1.0, 0.0]; 3],
        },
    ]
}

#[test]
fn parse_all_sample_icons() {
    let files = icon_test_files();
    if files.is_empty() {
        eprintln!("skipping parse_all_sample_icons: no icon files in testdata");
        return;
    }

    for path in files {
        let bytes = fs::read(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
        let icon = parse_icon(&bytes)
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        assert_eq!(icon.vertices.len(), icon.vertex_count() as usize);
        assert_eq!(icon.shapes.len(), icon.shape_count() as usize);
    }
}

#[test]
fn parse_minimal_triangle_icon() {
    let synthetic = SyntheticIcon::triangle();
    let icon = parse_icon(&synthetic.build()).expect("failed to parse synthetic icon");

    assert_eq!(icon.vertex_count(), 3);
    assert_eq!(icon.shape_count(), 1);
    assert_eq!(icon.frame_count(), 1);
    assert!(!icon.is_animated());
    assert!(icon.animation.is_none());
    assert_eq!(icon.header.layout, VertexLayout::Interleaved);
    assert_eq!(icon.vertices, synthetic.positions);
    assert_eq!(icon.normals, synthetic.normals);
    assert_eq!(icon.uvs, synthetic.uvs);
    assert_eq!(icon.shapes[0].name, "body");
    assert_eq!(icon.shapes[0].triangles, vec![[0, 1, 2]]);
    assert!(icon.texture.iter().all(|&w| w == 0x80FF_4020));
    assert_eq!(icon.trailing_bytes, 0);
}

#[test]
fn per_axis_accessors_follow_vertex_order() {
    let icon = parse_icon(&SyntheticIcon::triangle().build()).expect("parse");

    assert_eq!(icon.vertex_x(1), Some(1.0));
    assert_eq!(icon.vertex_y(1), Some(-1.0));
    assert_eq!(icon.vertex_z(2), Some(-0.5));
    assert_eq!(icon.normal_x(2), Some(1.0));
    assert_eq!(icon.normal_y(1), Some(1.0));
    assert_eq!(icon.normal_z(0), Some(1.0));
    assert_eq!(icon.uv_u(0), Some(0.5));
    assert_eq!(icon.uv_v(2), Some(1.0));
    assert_eq!(icon.vertex_x(3), None);
    assert_eq!(icon.texture_row(127).map(<[u32]>::len), Some(128));
    assert_eq!(icon.texture_row(128), None);
}

#[test]
fn split_layout_decodes_like_interleaved() {
    let interleaved = SyntheticIcon::triangle();
    let mut split = interleaved.clone();
    split.version = 2;

    let a = parse_icon(&interleaved.build()).expect("parse interleaved");
    let b = parse_icon(&split.build()).expect("parse split");

    assert_eq!(b.header.layout, VertexLayout::Split);
    assert_eq!(a.vertices, b.vertices);
    assert_eq!(a.normals, b.normals);
    assert_eq!(a.uvs, b.uvs);
    assert_eq!(a.shapes, b.shapes);
    assert_eq!(a.texture, b.texture);
}

#[test]
fn animation_deltas_resolve_to_absolute_positions() {
    let synthetic = SyntheticIcon::triangle().with_keys(two_key_animation());
    let icon = parse_icon(&synthetic.build()).expect("parse animated icon");

    assert_eq!(icon.frame_count(), 3);
    assert!(icon.is_animated());
    let animation = icon.animation.as_ref().expect("animation section");
    assert_eq!(animation.frames.len(), 2);
    assert_eq!(animation.speed, 1.0);

    assert_eq!(icon.frame_positions(0), Some(&icon.vertices[..]));
    let frame1 = icon.frame_positions(1).expect("frame 1");
    assert_eq!(frame1[0], [0.0, 1.5, 0.0]);
    assert_eq!(frame1[1], [1.0, -1.0, 0.5]);
    assert_eq!(frame1[2], [0.0, -1.0, -0.5]);
    assert_eq!(icon.frame_normals(1), Some(&[[0.0, 0.0, -1.0]; 3][..]));
    assert_eq!(icon.frame_time(2), Some(1.0));
    assert_eq!(icon.frame_positions(3), None);
    assert_eq!(icon.frame_normals(3), None);
}

#[test]
fn decoding_is_idempotent() {
    let bytes = SyntheticIcon::triangle()
        .with_keys(two_key_animation())
        .build();
    let first = parse_icon(&bytes).expect("first parse");
    let second = parse_icon(&bytes).expect("second parse");
    assert_eq!(first, second);
}

#[test]
fn trailing_bytes_are_skipped_and_counted() {
    let mut bytes = SyntheticIcon::triangle().build();
    bytes.extend_from_slice(&[0xEE; 12]);

    let icon = parse_icon(&bytes).expect("parse icon with padding");
    assert_eq!(icon.trailing_bytes, 12);
}

#[test]
fn shape_names_are_trimmed() {
    let mut synthetic = SyntheticIcon::triangle();
    synthetic.shapes = vec![
        ("", vec![[0, 1, 2]]),
        ("exactly_16_chars", vec![]),
    ];
    let icon = parse_icon(&synthetic.build()).expect("parse");
    assert_eq!(icon.shapes[0].name, "");
    assert_eq!(icon.shapes[1].name, "exactly_16_chars");
    assert_eq!(icon.triangle_count(), 1);
}

#[test]
fn shape_names_stop_at_first_nul() {
    let mut synthetic = SyntheticIcon::triangle();
    synthetic.shapes = vec![
        ("ab\0zzz", vec![[0, 1, 2]]),
        ("\0hidden", vec![]),
    ];
    let icon = parse_icon(&synthetic.build()).expect("parse");
    assert_eq!(icon.shapes[0].name, "ab");
    assert_eq!(icon.shapes[1].name, "");
}

#[test]
fn parse_fails_for_invalid_magic() {
    let mut bytes = SyntheticIcon::triangle().build();
    bytes[0..4].copy_from_slice(b"NRes");
    assert!(matches!(
        parse_icon(&bytes),
        Err(Error::MalformedHeader { .. })
    ));
}

#[test]
fn parse_fails_for_unknown_version() {
    let mut synthetic = SyntheticIcon::triangle();
    synthetic.version = 3;
    assert!(matches!(
        parse_icon(&synthetic.build()),
        Err(Error::MalformedHeader { .. })
    ));
}

#[test]
fn parse_fails_for_zero_frames() {
    let mut bytes = SyntheticIcon::triangle().build();
    bytes[16..20].copy_from_slice(&0u32.to_le_bytes());
    assert!(matches!(
        parse_icon(&bytes),
        Err(Error::MalformedHeader { .. })
    ));
}

#[test]
fn parse_fails_for_counts_over_limits() {
    let bytes = SyntheticIcon::triangle()
        .with_keys(two_key_animation())
        .build();

    let tight = Limits {
        max_vertices: 2,
        ..Limits::default()
    };
    assert!(matches!(
        parse_icon_with(&bytes, &tight),
        Err(Error::MalformedHeader { .. })
    ));

    let tight = Limits {
        max_frames: 2,
        ..Limits::default()
    };
    assert!(matches!(
        parse_icon_with(&bytes, &tight),
        Err(Error::MalformedHeader { .. })
    ));

    let tight = Limits {
        max_shapes: 0,
        ..Limits::default()
    };
    assert!(matches!(
        parse_icon_with(&bytes, &tight),
        Err(Error::MalformedHeader { .. })
    ));
}

#[test]
fn parse_fails_when_triangle_total_exceeds_limit() {
    let mut synthetic = SyntheticIcon::triangle();
    synthetic.shapes = vec![("a", vec![[0, 1, 2]]), ("b", vec![[2, 1, 0]])];
    let tight = Limits {
        max_triangles: 1,
        ..Limits::default()
    };
    assert!(matches!(
        parse_icon_with(&synthetic.build(), &tight),
        Err(Error::MalformedHeader { .. })
    ));
}

#[test]
fn parse_fails_for_empty_and_short_header() {
    assert!(matches!(
        parse_icon(&[]),
        Err(Error::TruncatedFile {
            section: "header",
            needed: HEADER_SIZE,
            available: 0,
            ..
        })
    ));

    let bytes = SyntheticIcon::triangle().build();
    assert!(matches!(
        parse_icon(&bytes[..HEADER_SIZE - 1]),
        Err(Error::TruncatedFile {
            section: "header",
            ..
        })
    ));
}

#[test]
fn parse_fails_when_truncated_mid_texture() {
    let bytes = SyntheticIcon::triangle().build();
    let cut = bytes.len() - TEXTURE_SIZE / 2;
    assert!(matches!(
        parse_icon(&bytes[..cut]),
        Err(Error::TruncatedFile {
            section: "texture",
            needed: TEXTURE_SIZE,
            ..
        })
    ));
}

#[test]
fn parse_fails_when_header_overstates_vertex_count() {
    let mut bytes = SyntheticIcon::triangle().build();
    bytes[8..12].copy_from_slice(&65_536u32.to_le_bytes());
    assert!(matches!(
        parse_icon(&bytes),
        Err(Error::TruncatedFile {
            section: "vertex pool",
            ..
        })
    ));
}

#[test]
fn parse_fails_when_animation_is_missing() {
    let mut bytes = SyntheticIcon::triangle().build();
    bytes[16..20].copy_from_slice(&2u32.to_le_bytes());
    // The texture block is read as keyframe data, leaving too little for the texture.
    assert!(matches!(
        parse_icon(&bytes),
        Err(Error::TruncatedFile {
            section: "texture",
            ..
        })
    ));
}

#[test]
fn parse_fails_for_index_equal_to_vertex_count() {
    let mut synthetic = SyntheticIcon::triangle();
    synthetic.shapes = vec![("body", vec![[0, 1, 2], [1, 2, 3]])];
    assert_eq!(
        parse_icon(&synthetic.build()),
        Err(Error::IndexOutOfRange {
            shape: 0,
            triangle: 1,
            index: 3,
            vertex_count: 3,
        })
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parse_icon_never_panics_on_random_bytes(data in proptest::collection::vec(any::<u8>(), 0..8192)) {
        let _ = parse_icon(&data);
    }

    #[test]
    fn parse_icon_never_panics_on_mutated_icons(
        mutations in proptest::collection::vec((any::<usize>(), any::<u8>()), 1..16),
    ) {
        let mut bytes = SyntheticIcon::triangle().with_keys(two_key_animation()).build();
        let len = bytes.len();
        for (offset, value) in mutations {
            bytes[offset % len] = value;
        }
        if let Ok(icon) = parse_icon(&bytes) {
            prop_assert_eq!(icon.vertices.len(), icon.vertex_count() as usize);
            prop_assert_eq!(icon.normals.len(), icon.vertices.len());
            prop_assert_eq!(icon.uvs.len(), icon.vertices.len());
            for shape in &icon.shapes {
                for tri in &shape.triangles {
                    prop_assert!(tri.iter().all(|&i| i < icon.vertex_count()));
                }
            }
        }
    }

    #[test]
    fn any_truncation_is_reported_as_truncated(cut in 0usize..1000) {
        let bytes = SyntheticIcon::triangle().build();
        let end = bytes.len() - 1 - (cut * (bytes.len() - 1) / 1000);
        let result = parse_icon(&bytes[..end]);
        prop_assert!(matches!(result, Err(Error::TruncatedFile { .. })), "cut at {end}");
    }
}
