use std::path::{Path, PathBuf};
use std::process::Command;

use alphamesh_core::{MeshDocument, Point, ShapesDocument};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

fn generate(fixture: &str, output: &Path, extra: &[&str]) {
    let bin = env!("CARGO_BIN_EXE_alphamesh");
    let input = workspace_root().join("fixtures").join(fixture);
    let status = Command::new(bin)
        .arg("generate")
        .arg(&input)
        .arg("--output")
        .arg(output)
        .args(extra)
        .stdout(std::process::Stdio::null())
        .status()
        .expect("run alphamesh generate");
    assert!(status.success(), "generate {fixture} failed: {status}");
}

fn read_mesh(path: &Path) -> MeshDocument {
    let raw = std::fs::read_to_string(path).expect("read mesh");
    serde_json::from_str(&raw).expect("parse mesh")
}

fn area(doc: &MeshDocument, shape: usize) -> f64 {
    doc.shapes[shape].iter().map(|t| t.signed_area().abs()).sum()
}

#[test]
fn generate_traced_input_smoke() {
    let out_dir = tempfile::tempdir().expect("tempdir");
    let output = out_dir.path().join("holed.json");
    generate("holed.eps", &output, &[]);

    let raw = std::fs::read_to_string(&output).expect("read mesh");
    assert!(!raw.contains('\n'));
    assert!(!raw.contains("\"paths\""));

    let doc = read_mesh(&output);
    assert_eq!((doc.width, doc.height), (40, 30));
    assert_eq!(doc.shapes.len(), 2);
    assert_eq!(doc.shapes[0].len(), 8);
    assert_eq!(doc.shapes[1].len(), 2);
    assert!((area(&doc, 0) - 336.0).abs() < 1e-9);
    assert!((area(&doc, 1) - 100.0).abs() < 1e-9);
    assert!(doc.paths.is_none());
}

#[test]
fn generate_include_paths_and_beautify() {
    let out_dir = tempfile::tempdir().expect("tempdir");
    let output = out_dir.path().join("nested/holed.json");
    generate("holed.eps", &output, &["--include-paths", "--beautify"]);

    let raw = std::fs::read_to_string(&output).expect("read mesh");
    assert!(raw.contains('\n'));

    let doc = read_mesh(&output);
    let paths = doc.paths.expect("paths requested");
    assert_eq!(paths.len(), 2);
    for ring in &paths {
        assert_eq!(ring.first(), ring.last());
    }
    assert_eq!(
        paths[1],
        vec![
            Point::new(36.0, 26.0),
            Point::new(36.0, 16.0),
            Point::new(26.0, 16.0),
            Point::new(26.0, 26.0),
            Point::new(36.0, 26.0),
        ]
    );
}

#[test]
fn generate_drops_degenerate_shapes_by_default() {
    let out_dir = tempfile::tempdir().expect("tempdir");
    let output = out_dir.path().join("degenerate.json");
    generate("degenerate.eps", &output, &[]);

    let doc = read_mesh(&output);
    assert_eq!(doc.shapes.len(), 2);
    assert!(doc.shapes.iter().all(|s| s.len() == 2));
}

#[test]
fn generate_keep_failed_preserves_indices() {
    let out_dir = tempfile::tempdir().expect("tempdir");
    let output = out_dir.path().join("degenerate.json");
    let shapes = out_dir.path().join("shapes.json");
    generate(
        "degenerate.eps",
        &output,
        &["--keep-failed", "--shapes", shapes.to_string_lossy().as_ref()],
    );

    let doc = read_mesh(&output);
    assert_eq!(doc.shapes.len(), 3);
    assert_eq!(doc.shapes[0].len(), 2);
    assert!(doc.shapes[1].is_empty());
    assert_eq!(doc.shapes[2].len(), 2);

    let raw = std::fs::read_to_string(&shapes).expect("read shapes");
    assert!(raw.contains("\"mainPath\""));
    let parsed: ShapesDocument = serde_json::from_str(&raw).expect("parse shapes");
    assert_eq!(parsed.shapes.len(), 3);
    assert_eq!(
        parsed.shapes[1].main_path.as_deref(),
        Some([Point::new(16.0, 4.0)].as_slice())
    );
}

#[test]
fn generate_empty_trace_writes_empty_mesh() {
    let out_dir = tempfile::tempdir().expect("tempdir");
    let output = out_dir.path().join("empty.json");
    generate("empty.eps", &output, &[]);

    let doc = read_mesh(&output);
    assert_eq!((doc.width, doc.height), (16, 16));
    assert!(doc.shapes.is_empty());
}

#[test]
fn generate_image_then_render_smoke() {
    let bin = env!("CARGO_BIN_EXE_alphamesh");
    let out_dir = tempfile::tempdir().expect("tempdir");
    let output = out_dir.path().join("holed.json");
    let preview = out_dir.path().join("preview.png");
    generate(
        "holed.eps",
        &output,
        &["--image", preview.to_string_lossy().as_ref()],
    );
    assert_eq!(image::image_dimensions(&preview).expect("png"), (40, 30));

    let scaled = out_dir.path().join("scaled.png");
    let status = Command::new(bin)
        .arg("image")
        .arg(&output)
        .arg("--output")
        .arg(&scaled)
        .args(["--scale", "2"])
        .stdout(std::process::Stdio::null())
        .status()
        .expect("run alphamesh image");
    assert!(status.success());
    assert_eq!(image::image_dimensions(&scaled).expect("png"), (80, 60));
}
