use std::fs;
use std::path::Path;

use alphamesh_core::{MeshDocument, ShapesDocument};
use alphamesh_geometry::{FailurePolicy, triangulate_all};
use alphamesh_parser::parse_document;
use alphamesh_render::{RenderOptions, save_mesh_as_png};
use anyhow::Context;
use serde::Serialize;
use tempfile::TempDir;
use tracing::{info, warn};

use crate::config::{GenerateOptions, ImageOptions, InputKind};
use crate::error::CliError;
use crate::tools::{self, Tool};

/// Vector text plus the canvas size it was traced from.
struct Traced {
    text: String,
    width: u32,
    height: u32,
}

pub fn run_generate(opts: &GenerateOptions) -> Result<(), CliError> {
    let traced = match opts.kind {
        InputKind::Raster => trace_raster(opts)?,
        InputKind::Traced => read_traced(&opts.input)?,
    };

    let trace = parse_document(&traced.text, opts.tolerance);
    let (width, height) = match (opts.kind, trace.page) {
        (InputKind::Traced, Some(page)) => (page.width, page.height),
        (InputKind::Traced, None) => {
            warn!(input = %opts.input.display(), "no bounding box found, canvas size is 0x0");
            (0, 0)
        }
        (InputKind::Raster, _) => (traced.width, traced.height),
    };
    info!(shapes = trace.shapes.len(), width, height, "parsed vector paths");

    if let Some(shapes_path) = &opts.shapes {
        let doc = ShapesDocument {
            shapes: trace.shapes.clone(),
        };
        write_json(shapes_path, &doc, opts.beautify)?;
    }

    let report = triangulate_all(&trace.shapes, opts.policy);
    let paths = opts.include_paths.then(|| {
        trace
            .shapes
            .iter()
            .filter_map(|shape| shape.closed_outline())
            .collect()
    });
    let doc = MeshDocument {
        width,
        height,
        shapes: report.shapes,
        paths,
    };
    write_json(&opts.output, &doc, opts.beautify)?;

    if let Some(image) = &opts.image {
        save_mesh_as_png(&doc, image, &RenderOptions::default())
            .map_err(|e| CliError::processing(format!("Could not render {}: {e}", image.display())))?;
    }

    println!(
        "Wrote {} triangles in {} shapes to {}",
        doc.triangle_count(),
        doc.shapes.len(),
        opts.output.display()
    );
    if !report.failures.is_empty() {
        let verb = match opts.policy {
            FailurePolicy::Drop => "dropped",
            FailurePolicy::Placeholder => "left empty",
        };
        println!(
            "{} of {} shapes could not be triangulated and were {verb}",
            report.failures.len(),
            trace.shapes.len()
        );
    }
    Ok(())
}

pub fn run_image(opts: &ImageOptions) -> Result<(), CliError> {
    let doc = load_mesh(&opts.input).map_err(|e| CliError::input(format!("{e:#}")))?;
    let render = RenderOptions {
        scale: opts.scale,
        ..RenderOptions::default()
    };
    save_mesh_as_png(&doc, &opts.output, &render).map_err(|e| {
        CliError::processing(format!("Could not render {}: {e}", opts.output.display()))
    })?;
    println!(
        "Rendered {} triangles to {}",
        doc.triangle_count(),
        opts.output.display()
    );
    Ok(())
}

fn trace_raster(opts: &GenerateOptions) -> Result<Traced, CliError> {
    let convert = Tool::convert();
    let potrace = Tool::potrace();
    convert.ensure_available()?;
    potrace.ensure_available()?;

    let (width, height) = image::image_dimensions(&opts.input).map_err(|e| {
        CliError::input(format!(
            "Could not read image {}: {e}",
            opts.input.display()
        ))
    })?;

    let workdir = TempDir::new().map_err(|e| CliError::processing(e.to_string()))?;
    let bitmap = workdir.path().join("silhouette.bmp");
    let eps = workdir.path().join("silhouette.eps");
    tools::threshold(&convert, &opts.input, opts.alpha, &bitmap)?;
    tools::trace(&potrace, &bitmap, &eps)?;

    let text = read_text(&eps).map_err(|e| CliError::processing(format!("{e:#}")))?;
    Ok(Traced {
        text,
        width,
        height,
    })
}

fn read_traced(path: &Path) -> Result<Traced, CliError> {
    let text = read_text(path).map_err(|e| CliError::input(format!("{e:#}")))?;
    Ok(Traced {
        text,
        width: 0,
        height: 0,
    })
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
}

fn load_mesh(path: &Path) -> anyhow::Result<MeshDocument> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid mesh document", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| CliError::processing(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::processing(format!("Could not create {}: {e}", parent.display()))
        })?;
    }
    fs::write(path, json)
        .map_err(|e| CliError::processing(format!("Could not write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn write_json_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.json");
        write_json(&path, &ShapesDocument::default(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"shapes":[]}"#);
    }

    #[test]
    fn beautified_json_parses_to_the_same_document() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.json");
        let pretty = dir.path().join("pretty.json");
        let doc = MeshDocument {
            width: 3,
            height: 4,
            ..MeshDocument::default()
        };
        write_json(&plain, &doc, false).unwrap();
        write_json(&pretty, &doc, true).unwrap();
        assert_eq!(load_mesh(&plain).unwrap(), load_mesh(&pretty).unwrap());
        assert!(fs::read_to_string(&pretty).unwrap().contains('\n'));
    }

    #[test]
    fn invalid_mesh_json_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mesh.json");
        fs::write(&input, "{\"width\": 1").unwrap();
        let err = run_image(&ImageOptions {
            input,
            output: dir.path().join("mesh.png"),
            scale: 1.0,
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Input);
        assert!(err.message.contains("not a valid mesh document"));
    }
}
