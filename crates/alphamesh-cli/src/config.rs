//! Command-line arguments and their validated form.
//!
//! Every check here runs before any file is read or any external program is started.

use std::path::{Path, PathBuf};

use alphamesh_geometry::FailurePolicy;
use clap::Args;

use crate::error::CliError;

pub const DEFAULT_TOLERANCE: f64 = 2.0;
pub const MIN_TOLERANCE: f64 = 0.01;
pub const DEFAULT_ALPHA: f64 = 50.0;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// PNG image to convert, or an already traced EPS document
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output JSON file [default: INPUT with a .json extension]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum distance in pixels a removed outline point may deviate from the simplified path
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE, allow_negative_numbers = true)]
    pub tolerance: f64,

    /// Opacity percentage at which a pixel counts as part of the silhouette
    #[arg(short, long, default_value_t = DEFAULT_ALPHA, allow_negative_numbers = true)]
    pub alpha: f64,

    /// Include each shape's closed outer outline in the output
    #[arg(long)]
    pub include_paths: bool,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub beautify: bool,

    /// Also render the triangles to this PNG file
    #[arg(long, value_name = "PNG")]
    pub image: Option<PathBuf>,

    /// Also write the parsed shapes (outlines and holes) to this JSON file
    #[arg(long, value_name = "FILE")]
    pub shapes: Option<PathBuf>,

    /// Keep an empty entry for shapes that fail to triangulate so output indices match input shapes
    #[arg(long)]
    pub keep_failed: bool,

    /// Overwrite existing output files
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ImageArgs {
    /// Mesh JSON produced by `generate`
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output PNG file [default: INPUT with a .png extension]
    #[arg(short, long, value_name = "PNG")]
    pub output: Option<PathBuf>,

    /// Scale factor applied to the document size
    #[arg(short, long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub scale: f32,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,
}

/// How the input file enters the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A raster image that still needs thresholding and tracing.
    Raster,
    /// Vector text that can be parsed directly.
    Traced,
}

impl InputKind {
    #[must_use]
    pub fn detect(path: &Path) -> Self {
        let traced = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "eps" | "ps"));
        if traced {
            InputKind::Traced
        } else {
            InputKind::Raster
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub input: PathBuf,
    pub kind: InputKind,
    pub output: PathBuf,
    pub tolerance: f64,
    pub alpha: f64,
    pub include_paths: bool,
    pub beautify: bool,
    pub image: Option<PathBuf>,
    pub shapes: Option<PathBuf>,
    pub policy: FailurePolicy,
}

impl GenerateOptions {
    pub fn from_args(args: GenerateArgs) -> Result<Self, CliError> {
        if !args.tolerance.is_finite() || args.tolerance < MIN_TOLERANCE {
            return Err(CliError::usage(format!(
                "tolerance must be at least {MIN_TOLERANCE}, got {}",
                args.tolerance
            )));
        }
        if !(0.0..=100.0).contains(&args.alpha) {
            return Err(CliError::usage(format!(
                "alpha must be between 0 and 100, got {}",
                args.alpha
            )));
        }

        ensure_input_file(&args.input)?;
        let output = args
            .output
            .unwrap_or_else(|| args.input.with_extension("json"));
        ensure_writable(&output, args.force)?;
        if let Some(image) = &args.image {
            ensure_writable(image, args.force)?;
        }
        if let Some(shapes) = &args.shapes {
            ensure_writable(shapes, args.force)?;
        }

        Ok(Self {
            kind: InputKind::detect(&args.input),
            input: args.input,
            output,
            tolerance: args.tolerance,
            alpha: args.alpha,
            include_paths: args.include_paths,
            beautify: args.beautify,
            image: args.image,
            shapes: args.shapes,
            policy: if args.keep_failed {
                FailurePolicy::Placeholder
            } else {
                FailurePolicy::Drop
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub scale: f32,
}

impl ImageOptions {
    pub fn from_args(args: ImageArgs) -> Result<Self, CliError> {
        if !args.scale.is_finite() || args.scale <= 0.0 {
            return Err(CliError::usage(format!(
                "scale must be a positive number, got {}",
                args.scale
            )));
        }
        ensure_input_file(&args.input)?;
        let output = args
            .output
            .unwrap_or_else(|| args.input.with_extension("png"));
        ensure_writable(&output, args.force)?;
        Ok(Self {
            input: args.input,
            output,
            scale: args.scale,
        })
    }
}

fn ensure_input_file(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::input(format!(
            "Input {} does not exist",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(CliError::input(format!(
            "Input {} is not a file",
            path.display()
        )));
    }
    Ok(())
}

fn ensure_writable(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::input(format!(
            "Output {} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Ok(())
}
