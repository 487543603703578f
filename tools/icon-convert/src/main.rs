use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use icon_export::{ConvertJob, ConvertReport};
use icon_mesh::MeshOptions;
use log::{error, LevelFilter};
use miette::{miette, IntoDiagnostic, Result};

#[derive(Parser, Debug)]
#[command(name = "PS2 Icon Converter")]
#[command(about, author, version, long_about = None)]
struct Cli {
    /// Print pipeline steps
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an icon file into OBJ/MTL, a texture and optionally USDA
    #[command(arg_required_else_help = true)]
    Convert {
        /// Icon file
        #[arg(short = 'f', long, value_name = "FILE")]
        input_file: PathBuf,
        /// OBJ output (defaults to the input name with `.obj`)
        #[arg(short = 'o', long, value_name = "FILE")]
        output_file: Option<PathBuf>,
        /// Texture output, `.tga` or `.png` (defaults to the input name with `.tga`)
        #[arg(long, visible_alias = "ot", value_name = "FILE")]
        output_texture: Option<PathBuf>,
        /// Also write a USDA scene, next to the input unless a path is given
        #[arg(long, value_name = "FILE", num_args = 0..=1)]
        usda: Option<Option<PathBuf>>,
        /// Uniform position scale
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
        /// Animation frame to export
        #[arg(long, default_value_t = 0)]
        frame: usize,
        /// Overwrite files
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the header and geometry summary of an icon file
    #[command(arg_required_else_help = true)]
    Info {
        /// Icon file
        file: PathBuf,
    },
    /// Convert every job listed in a TOML manifest
    #[command(arg_required_else_help = true)]
    Batch {
        /// Manifest file
        manifest: PathBuf,
        /// Overwrite files
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let stdout = console::Term::stdout();

    match cli.command {
        Commands::Convert {
            input_file,
            output_file,
            output_texture,
            usda,
            scale,
            frame,
            force,
        } => {
            let usda_output =
                usda.map(|path| path.unwrap_or_else(|| input_file.with_extension("usda")));
            let job = ConvertJob {
                input: input_file,
                obj_output: output_file,
                texture_output: output_texture,
                usda_output,
                mesh: MeshOptions { frame, scale },
                overwrite: force,
            };
            command_convert(stdout, job)?
        }
        Commands::Info { file } => command_info(stdout, &file)?,
        Commands::Batch { manifest, force } => command_batch(stdout, &manifest, force)?,
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn command_convert(stdout: console::Term, mut job: ConvertJob) -> Result<()> {
    if !confirm_overwrite(&mut job)? {
        stdout.write_line("Nothing written.").into_diagnostic()?;
        return Ok(());
    }

    let report = icon_export::convert(&job)?;
    print_report(&stdout, &job, &report)?;

    Ok(())
}

fn command_info(stdout: console::Term, file: &Path) -> Result<()> {
    let icon = icon_export::load_icon(file)?;
    let header = &icon.header;

    let text = format!(
        "Version: {};\nFlags: {:#06x};\nVertices: {};\nShapes: {};\nTriangles: {};\nFrames: {};",
        header.layout.version(),
        header.flags,
        header.vertex_count,
        header.shape_count,
        icon.triangle_count(),
        header.frame_count,
    );
    stdout.write_line(&text).into_diagnostic()?;

    for (index, shape) in icon.shapes.iter().enumerate() {
        let text = format!(
            "Shape {}: \"{}\", {} triangles;",
            index,
            shape.name,
            shape.triangles.len()
        );
        stdout.write_line(&text).into_diagnostic()?;
    }

    if let Some((min, max)) = icon_mesh::compute_bounds(&icon.vertices) {
        let text = format!("Bounds: {:?} .. {:?};", min, max);
        stdout.write_line(&text).into_diagnostic()?;
    }

    if let Some(animation) = &icon.animation {
        let text = format!(
            "Animation: {} frames, speed {}, play offset {}. Only one frame is exported per conversion (--frame).",
            icon.frame_count(),
            animation.speed,
            animation.play_offset
        );
        stdout.write_line(&text).into_diagnostic()?;
    }

    if icon.trailing_bytes > 0 {
        let text = format!("Trailing data: {} (bytes);", icon.trailing_bytes);
        stdout.write_line(&text).into_diagnostic()?;
    }

    Ok(())
}

fn command_batch(stdout: console::Term, manifest: &Path, force: bool) -> Result<()> {
    let base_dir = manifest.parent().unwrap_or_else(|| Path::new("."));
    let jobs = icon_export::load_manifest(manifest)?.resolve(base_dir);
    let bar = indicatif::ProgressBar::new(jobs.len() as u64);

    bar.set_style(get_bar_style()?);

    let mut failed = 0usize;
    let mut converted = 0usize;

    for mut job in jobs {
        bar.set_message(job.input.display().to_string());
        job.overwrite |= force;

        if !bar.suspend(|| confirm_overwrite(&mut job))? {
            bar.inc(1);
            continue;
        }

        match icon_export::convert(&job) {
            Ok(_) => converted += 1,
            Err(err) => {
                failed += 1;
                bar.suspend(|| error!("{}: {:?}", job.input.display(), miette::Report::new(err)));
            }
        }
        bar.inc(1);
    }

    bar.finish();

    let text = format!("Converted: {};\nFailed: {};", converted, failed);
    stdout.write_line(&text).into_diagnostic()?;

    if failed > 0 {
        return Err(miette!("{} of {} jobs failed", failed, converted + failed));
    }

    Ok(())
}

/// Asks before replacing existing outputs. Returns `false` when the user
/// declines.
fn confirm_overwrite(job: &mut ConvertJob) -> Result<bool> {
    if job.overwrite {
        return Ok(true);
    }

    let existing: Vec<PathBuf> = job
        .output_paths()
        .into_iter()
        .filter(|path| path.exists())
        .collect();
    if existing.is_empty() {
        return Ok(true);
    }

    let names: Vec<String> = existing
        .iter()
        .map(|path| format!("\"{}\"", path.display()))
        .collect();
    let message = format!("Files {} exist. Overwrite them?", names.join(", "));

    let accepted = dialoguer::Confirm::new()
        .with_prompt(message)
        .interact()
        .into_diagnostic()?;
    job.overwrite = accepted;

    Ok(accepted)
}

fn print_report(stdout: &console::Term, job: &ConvertJob, report: &ConvertReport) -> Result<()> {
    let text = format!(
        "Converted {}: {} vertices, {} faces, {} shapes, frame {} of {};",
        job.input.display(),
        report.vertex_count,
        report.face_count,
        report.shape_count,
        job.mesh.frame,
        report.frame_count,
    );
    stdout.write_line(&text).into_diagnostic()?;

    for path in &report.outputs {
        stdout
            .write_line(&format!("  {}", path.display()))
            .into_diagnostic()?;
    }

    Ok(())
}

fn get_bar_style() -> Result<indicatif::ProgressStyle> {
    Ok(
        indicatif::ProgressStyle::with_template("[{bar:32}] {pos:>7}/{len:7} {msg}")
            .into_diagnostic()?
            .progress_chars("=>-"),
    )
}
