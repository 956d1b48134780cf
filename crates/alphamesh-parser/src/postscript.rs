//! Turns traced vector text into [`Shape`]s.
//!
//! Lines are processed strictly in order:
//!
//! - `x y moveto` places the cursor at `(x, y)` times the current scale.
//! - `dx dy rlineto` advances the cursor by the scaled delta and records the new position,
//!   flipped vertically against the page height and floored to whole pixels.
//! - `sx sy scale` replaces the scale with the operands multiplied by the current scale.
//! - `closepath` simplifies the recorded points and attaches them to the current shape, first as
//!   its outline and afterwards as holes.
//! - `fill` emits the current shape (possibly empty) and starts a new one.
//! - `%%BoundingBox: llx lly urx ury` sets the page size.
//!
//! Any other line is skipped.

use alphamesh_core::{Path, Point, Shape};
use alphamesh_geometry::simplify;
use tracing::{debug, trace};

use crate::command::{Command, PageBox};

/// Everything recovered from one vector document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    /// Page size from the bounding-box header, if one was seen.
    pub page: Option<PageBox>,
    /// One entry per `fill`, in drawing order.
    pub shapes: Vec<Shape>,
}

/// Parse `text` into shapes, simplifying every closed path with `tolerance`.
#[must_use]
pub fn parse(text: &str, tolerance: f64) -> Vec<Shape> {
    parse_document(text, tolerance).shapes
}

/// Like [`parse`], but also returns the declared page size.
#[must_use]
pub fn parse_document(text: &str, tolerance: f64) -> Trace {
    let mut ctx = ParseContext::new(tolerance);
    for (number, line) in text.trim().lines().enumerate() {
        ctx.process_line(number + 1, line);
    }
    ctx.finish()
}

/// Mutable state threaded through one parse.
struct ParseContext {
    tolerance: f64,
    shapes: Vec<Shape>,
    shape: Shape,
    path: Path,
    cursor: Point,
    scale: Point,
    page: Option<PageBox>,
}

impl ParseContext {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            shapes: Vec::new(),
            shape: Shape::empty(),
            path: Vec::new(),
            cursor: Point::new(0.0, 0.0),
            scale: Point::new(1.0, 1.0),
            page: None,
        }
    }

    fn page_height(&self) -> f64 {
        self.page.map_or(0.0, |page| f64::from(page.height))
    }

    fn process_line(&mut self, number: usize, line: &str) {
        let Some(command) = Command::recognise(line) else {
            trace!(line = number, text = line, "skipping unrecognised line");
            return;
        };

        match command {
            Command::MoveTo(x, y) => {
                self.cursor = Point::new(x * self.scale.x, y * self.scale.y);
            }
            Command::RLineTo(dx, dy) => {
                self.cursor.x += dx * self.scale.x;
                self.cursor.y += dy * self.scale.y;
                self.path.push(Point::new(
                    self.cursor.x.floor(),
                    (self.page_height() - self.cursor.y).floor(),
                ));
            }
            Command::Scale(sx, sy) => {
                self.scale = Point::new(sx * self.scale.x, sy * self.scale.y);
            }
            Command::ClosePath => self.end_path(),
            Command::Fill => self.end_shape(),
            Command::BoundingBox(page) => {
                debug!(width = page.width, height = page.height, "page bounding box");
                self.page = Some(page);
            }
        }
    }

    fn end_path(&mut self) {
        let raw = std::mem::take(&mut self.path);
        let simplified = simplify(&raw, self.tolerance);
        trace!(
            before = raw.len(),
            after = simplified.len(),
            "closed path simplified"
        );
        self.shape.push_path(simplified);
    }

    fn end_shape(&mut self) {
        let shape = std::mem::take(&mut self.shape);
        debug!(
            index = self.shapes.len(),
            outline = shape.main_path.as_ref().map_or(0, Vec::len),
            holes = shape.hole_paths.len(),
            "shape complete"
        );
        self.shapes.push(shape);
    }

    fn finish(self) -> Trace {
        if self.shape != Shape::empty() || !self.path.is_empty() {
            debug!("discarding paths not terminated by a fill");
        }
        Trace {
            page: self.page,
            shapes: self.shapes,
        }
    }
}
