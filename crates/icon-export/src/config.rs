use crate::error::ExportError;
use crate::Result;
use icon_mesh::MeshOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TEXTURE_EXTENSION: &str = "tga";

/// Everything needed to convert one icon file.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub obj_output: Option<PathBuf>,
    pub texture_output: Option<PathBuf>,
    pub usda_output: Option<PathBuf>,
    pub mesh: MeshOptions,
    pub overwrite: bool,
}

impl ConvertJob {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            obj_output: None,
            texture_output: None,
            usda_output: None,
            mesh: MeshOptions::default(),
            overwrite: false,
        }
    }

    /// Explicit OBJ path, or the input path with an `.obj` extension.
    pub fn obj_path(&self) -> PathBuf {
        self.obj_output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("obj"))
    }

    pub fn mtl_path(&self) -> PathBuf {
        self.obj_path().with_extension("mtl")
    }

    pub fn texture_path(&self) -> PathBuf {
        self.texture_output
            .clone()
            .unwrap_or_else(|| self.input.with_extension(DEFAULT_TEXTURE_EXTENSION))
    }

    pub fn output_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.obj_path(), self.mtl_path(), self.texture_path()];
        if let Some(usda) = &self.usda_output {
            paths.push(usda.clone());
        }
        paths
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ManifestDefaults {
    pub scale: Option<f32>,
    pub frame: Option<usize>,
    pub texture_format: Option<String>,
    pub usda: Option<bool>,
    pub output_dir: Option<PathBuf>,
    pub overwrite: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    pub input: PathBuf,
    pub obj: Option<PathBuf>,
    pub texture: Option<PathBuf>,
    pub usda: Option<PathBuf>,
    pub scale: Option<f32>,
    pub frame: Option<usize>,
}

/// TOML batch description: a `[defaults]` table and `[[job]]` entries.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BatchManifest {
    #[serde(default)]
    pub defaults: ManifestDefaults,
    #[serde(rename = "job", default)]
    pub jobs: Vec<JobSpec>,
}

impl BatchManifest {
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| ExportError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Expands every job against the defaults. Relative paths are resolved
    /// against `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> Vec<ConvertJob> {
        self.jobs
            .iter()
            .map(|spec| self.resolve_job(spec, base_dir))
            .collect()
    }

    fn resolve_job(&self, spec: &JobSpec, base_dir: &Path) -> ConvertJob {
        let defaults = &self.defaults;
        let input = base_dir.join(&spec.input);
        let output_dir = defaults.output_dir.as_ref().map(|dir| base_dir.join(dir));
        let derived = |extension: &str| {
            let file_name = spec.input.with_extension(extension);
            let file_name = file_name.file_name().map(PathBuf::from).unwrap_or(file_name);
            match &output_dir {
                Some(dir) => dir.join(file_name),
                None => input.with_extension(extension),
            }
        };

        let texture_extension = defaults
            .texture_format
            .as_deref()
            .unwrap_or(DEFAULT_TEXTURE_EXTENSION);
        let usda_output = match &spec.usda {
            Some(path) => Some(base_dir.join(path)),
            None if defaults.usda.unwrap_or(false) => Some(derived("usda")),
            None => None,
        };

        ConvertJob {
            obj_output: Some(
                spec.obj
                    .as_ref()
                    .map_or_else(|| derived("obj"), |path| base_dir.join(path)),
            ),
            texture_output: Some(
                spec.texture
                    .as_ref()
                    .map_or_else(|| derived(texture_extension), |path| base_dir.join(path)),
            ),
            usda_output,
            mesh: MeshOptions {
                frame: spec.frame.or(defaults.frame).unwrap_or(0),
                scale: spec.scale.or(defaults.scale).unwrap_or(1.0),
            },
            overwrite: defaults.overwrite.unwrap_or(false),
            input,
        }
    }
}

pub fn load_manifest(path: &Path) -> Result<BatchManifest> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    BatchManifest::parse(&text, path)
}
