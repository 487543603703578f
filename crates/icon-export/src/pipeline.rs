use crate::config::ConvertJob;
use crate::error::ExportError;
use crate::obj::{write_mtl, write_obj, ObjMaterial, ObjOptions};
use crate::raster::{save_raster, texture_format};
use crate::usda::{write_usda, UsdaOptions};
use crate::Result;
use icon_mesh::{build_mesh, Mesh};
use icon_texture::normalize_texture;
use log::{debug, info, warn};
use ps2icon::RawIcon;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const MATERIAL_NAME: &str = "icon_texture";

/// Summary of a finished conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertReport {
    pub vertex_count: u32,
    pub shape_count: u32,
    pub frame_count: u32,
    pub face_count: usize,
    pub outputs: Vec<PathBuf>,
}

pub fn load_icon(path: &Path) -> Result<RawIcon> {
    debug!("reading icon file {}", path.display());
    let bytes = fs::read(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let icon = ps2icon::parse_icon(&bytes).map_err(|source| ExportError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "found geometry: {} vertices, {} shapes, {} frames",
        icon.vertex_count(),
        icon.shape_count(),
        icon.frame_count()
    );
    if icon.trailing_bytes > 0 {
        warn!(
            "{}: ignoring {} bytes after the texture block",
            path.display(),
            icon.trailing_bytes
        );
    }
    Ok(icon)
}

/// Loads, converts and writes every output of `job`.
pub fn convert(job: &ConvertJob) -> Result<ConvertReport> {
    let icon = load_icon(&job.input)?;
    convert_icon(&icon, job)
}

/// Converts an already decoded icon. Nothing is written unless both the mesh
/// and the texture converted successfully.
pub fn convert_icon(icon: &RawIcon, job: &ConvertJob) -> Result<ConvertReport> {
    let outputs = job.output_paths();
    if !job.overwrite {
        if let Some(existing) = outputs.iter().find(|path| path.exists()) {
            return Err(ExportError::OutputExists {
                path: existing.clone(),
            });
        }
    }
    let texture_path = job.texture_path();
    texture_format(&texture_path)?;

    if icon.is_animated() && job.mesh.frame == 0 {
        warn!(
            "icon has {} animation frames, only the base pose is exported",
            icon.frame_count()
        );
    } else if icon.is_animated() {
        info!(
            "icon has {} animation frames, exporting frame {}",
            icon.frame_count(),
            job.mesh.frame
        );
    }

    debug!("building mesh (scale {})", job.mesh.scale);
    let mesh = build_mesh(icon, &job.mesh)?;
    debug!("normalizing texture");
    let raster = normalize_texture(&icon.texture);

    let texture_name = file_name(&texture_path);
    let obj_path = job.obj_path();
    let mtl_path = job.mtl_path();
    let object_name = job
        .input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "icon".to_string());

    write_text(&obj_path, |writer| {
        write_obj(
            writer,
            &mesh,
            &ObjOptions {
                object_name: object_name.clone(),
                material: Some(ObjMaterial {
                    library: file_name(&mtl_path),
                    name: MATERIAL_NAME.to_string(),
                }),
            },
        )
    })?;
    write_text(&mtl_path, |writer| {
        write_mtl(writer, MATERIAL_NAME, &texture_name)
    })?;

    save_raster(&raster, &texture_path)?;
    info!("wrote texture {}", texture_path.display());

    if let Some(usda_path) = &job.usda_output {
        write_usda_file(&mesh, usda_path, &object_name, &texture_name)?;
    }

    Ok(ConvertReport {
        vertex_count: icon.vertex_count(),
        shape_count: icon.shape_count(),
        frame_count: icon.frame_count(),
        face_count: mesh.face_count(),
        outputs,
    })
}

fn write_usda_file(mesh: &Mesh, path: &Path, mesh_name: &str, texture: &str) -> Result<()> {
    write_text(path, |writer| {
        write_usda(
            writer,
            mesh,
            &UsdaOptions {
                mesh_name: mesh_name.to_string(),
                texture: Some(texture.to_string()),
            },
        )
    })
}

fn write_text<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let to_error = |source: std::io::Error| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(to_error)?;
    writer.flush().map_err(to_error)?;
    info!("wrote {}", path.display());
    Ok(())
}

/// File name as referenced from sibling outputs (MTL, USDA).
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
