use serde::{Deserialize, Serialize};

use crate::Point;

/// A closed polyline. The last point implicitly connects back to the first.
pub type Path = Vec<Point>;

/// One filled region: an outer boundary plus the holes cut out of it.
///
/// `main_path` is `None` when a fill was seen before any path was closed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub main_path: Option<Path>,
    #[serde(default)]
    pub hole_paths: Vec<Path>,
}

impl Shape {
    #[must_use]
    pub fn new(main_path: Path, hole_paths: Vec<Path>) -> Self {
        Self {
            main_path: Some(main_path),
            hole_paths,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach a closed path: the first one becomes the outer boundary, the rest are holes.
    pub fn push_path(&mut self, path: Path) {
        if self.main_path.is_none() {
            self.main_path = Some(path);
        } else {
            self.hole_paths.push(path);
        }
    }

    /// Outer boundary with its first point repeated at the end.
    #[must_use]
    pub fn closed_outline(&self) -> Option<Path> {
        let main = self.main_path.as_ref()?;
        let first = *main.first()?;
        let mut ring = main.clone();
        ring.push(first);
        Some(ring)
    }
}

/// Three points of a triangle. Serialises as a plain 3-element array.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Triangle(pub [Point; 3]);

impl Triangle {
    #[must_use]
    pub const fn new(a: Point, b: Point, c: Point) -> Self {
        Self([a, b, c])
    }

    #[must_use]
    pub fn points(&self) -> &[Point; 3] {
        &self.0
    }

    /// Signed area; positive for counter-clockwise order in a y-up frame.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let [a, b, c] = self.0;
        0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
    }

    #[must_use]
    pub fn centroid(&self) -> Point {
        let [a, b, c] = self.0;
        Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    /// Same triangle with the point order reversed.
    #[must_use]
    pub fn reversed(self) -> Self {
        let [a, b, c] = self.0;
        Self([c, b, a])
    }
}

pub type TriangulatedShape = Vec<Triangle>;
