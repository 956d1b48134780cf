//! Debug rendering of triangulated shapes to PNG.

use std::path::Path;

use alphamesh_core::{MeshDocument, Point, Triangle};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create pixmap with dimensions {width}x{height}")]
    PixmapCreation { width: u32, height: u32 },
    #[error("PNG encoding error: {0}")]
    PngEncode(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fill colours, cycled by shape index.
const PALETTE: [[u8; 3]; 6] = [
    [230, 25, 75],
    [60, 180, 75],
    [0, 130, 200],
    [245, 130, 48],
    [145, 30, 180],
    [70, 240, 240],
];

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Multiplier from document pixels to image pixels.
    pub scale: f32,
    /// Background colour as RGBA.
    pub background: [u8; 4],
    /// Colour of triangle edges as RGBA.
    pub stroke_color: [u8; 4],
    pub stroke_width: f32,
    /// Alpha applied to palette fills.
    pub fill_alpha: u8,
    /// Colour of outer boundaries, drawn when the document carries `paths`.
    pub path_color: [u8; 4],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: [255, 255, 255, 255],
            stroke_color: [0, 0, 0, 255],
            stroke_width: 1.0,
            fill_alpha: 160,
            path_color: [255, 0, 0, 255],
        }
    }
}

/// Render `doc` and encode the result as PNG bytes.
pub fn render_mesh_to_png(doc: &MeshDocument, opts: &RenderOptions) -> Result<Vec<u8>, RenderError> {
    let pixmap = render_mesh(doc, opts)?;
    encode_png(&pixmap)
}

/// Render `doc` and write the PNG to `png_path`.
pub fn save_mesh_as_png(
    doc: &MeshDocument,
    png_path: impl AsRef<Path>,
    opts: &RenderOptions,
) -> Result<(), RenderError> {
    let png_data = render_mesh_to_png(doc, opts)?;
    std::fs::write(png_path, png_data)?;
    Ok(())
}

/// Draw every triangle of `doc` on a canvas of the document's size times `opts.scale`.
pub fn render_mesh(doc: &MeshDocument, opts: &RenderOptions) -> Result<Pixmap, RenderError> {
    let width = (doc.width as f32 * opts.scale).round() as u32;
    let height = (doc.height as f32 * opts.scale).round() as u32;
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::PixmapCreation { width, height })?;
    pixmap.fill(color(opts.background));

    let transform = Transform::from_scale(opts.scale, opts.scale);
    let stroke = Stroke {
        width: opts.stroke_width / opts.scale,
        ..Default::default()
    };

    let mut edge_paint = Paint::default();
    edge_paint.set_color(color(opts.stroke_color));
    edge_paint.anti_alias = true;

    for (index, shape) in doc.shapes.iter().enumerate() {
        let [r, g, b] = PALETTE[index % PALETTE.len()];
        let mut fill_paint = Paint::default();
        fill_paint.set_color_rgba8(r, g, b, opts.fill_alpha);
        fill_paint.anti_alias = true;

        for triangle in shape {
            let Some(path) = triangle_path(triangle) else {
                continue;
            };
            pixmap.fill_path(&path, &fill_paint, FillRule::Winding, transform, None);
            pixmap.stroke_path(&path, &edge_paint, &stroke, transform, None);
        }
    }

    if let Some(paths) = &doc.paths {
        let mut path_paint = Paint::default();
        path_paint.set_color(color(opts.path_color));
        path_paint.anti_alias = true;
        for ring in paths {
            if let Some(path) = polyline_path(ring) {
                pixmap.stroke_path(&path, &path_paint, &stroke, transform, None);
            }
        }
    }

    debug!(
        width,
        height,
        triangles = doc.triangle_count(),
        "rendered mesh"
    );
    Ok(pixmap)
}

fn color(rgba: [u8; 4]) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn triangle_path(triangle: &Triangle) -> Option<tiny_skia::Path> {
    let [a, b, c] = *triangle.points();
    let mut pb = PathBuilder::new();
    pb.move_to(a.x as f32, a.y as f32);
    pb.line_to(b.x as f32, b.y as f32);
    pb.line_to(c.x as f32, c.y as f32);
    pb.close();
    pb.finish()
}

fn polyline_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.finish()
}

fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    use image::{ImageBuffer, Rgba};

    let width = pixmap.width();
    let height = pixmap.height();

    // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
    let mut img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    for (pixel, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *pixel = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut buf = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buf);
    img.write_to(&mut cursor, image::ImageFormat::Png)?;
    Ok(buf)
}
