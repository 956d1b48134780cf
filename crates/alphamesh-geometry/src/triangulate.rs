//! Constrained triangulation of one shape (outer boundary plus holes).
//!
//! Rings are cleaned and validated up front so that every failure mode surfaces as a
//! [`TriangulationError`] instead of a panic deep inside the triangulation. The triangulation
//! itself is a constrained Delaunay triangulation over all ring vertices with every ring edge
//! inserted as a constraint. Faces are classified by walking outwards from the convex hull and
//! flipping inside/outside each time a constraint edge is crossed.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use alphamesh_core::{Point, Shape, Triangle, TriangulatedShape};
use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2, Triangulation};

use crate::predicates::{point_in_ring, segments_conflict, signed_area};

/// Identifies a ring within a shape for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingId {
    Boundary,
    Hole(usize),
}

impl fmt::Display for RingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingId::Boundary => write!(f, "boundary"),
            RingId::Hole(index) => write!(f, "hole {index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TriangulationError {
    #[error("boundary has {points} distinct points, at least 3 are needed")]
    DegenerateBoundary { points: usize },

    #[error("hole {index} has {points} distinct points, at least 3 are needed")]
    DegenerateHole { index: usize, points: usize },

    #[error("{ring} encloses no area")]
    ZeroArea { ring: RingId },

    #[error("{ring} contains a non-finite coordinate")]
    NonFiniteCoordinate { ring: RingId },

    #[error("{ring} intersects itself")]
    SelfIntersecting { ring: RingId },

    #[error("{first} and {second} intersect")]
    RingsIntersect { first: RingId, second: RingId },

    #[error("hole {index} is not inside the boundary")]
    HoleOutsideBoundary { index: usize },

    #[error("hole {inner} lies inside hole {outer}")]
    NestedHoles { outer: usize, inner: usize },

    #[error("vertex insertion failed: {0}")]
    Insertion(#[from] InsertionError),

    #[error("an edge of {ring} conflicts with an existing constraint")]
    ConstraintConflict { ring: RingId },
}

/// Triangulate `shape`, returning triangles inside the boundary and outside every hole.
///
/// A shape without an outer path yields no triangles. Each triangle's points are emitted in the
/// reverse of the triangulation's native (counter-clockwise, y-up) order.
pub fn triangulate(shape: &Shape) -> Result<TriangulatedShape, TriangulationError> {
    let Some(main_path) = shape.main_path.as_ref() else {
        return Ok(Vec::new());
    };

    let boundary = prepare_ring(main_path, RingId::Boundary)?;
    let holes = shape
        .hole_paths
        .iter()
        .enumerate()
        .map(|(index, hole)| prepare_ring(hole, RingId::Hole(index)))
        .collect::<Result<Vec<_>, _>>()?;

    check_crossings(&boundary, &holes)?;
    check_nesting(&boundary, &holes)?;

    let cdt = build_cdt(&boundary, &holes)?;
    let inside = classify_faces(&cdt);

    let mut triangles = Vec::new();
    for face in cdt.inner_faces() {
        if !inside.get(&face.fix()).copied().unwrap_or(false) {
            continue;
        }
        let [a, b, c] = face.vertices().map(|v| {
            let pos = v.position();
            Point::new(pos.x, pos.y)
        });
        triangles.push(Triangle::new(a, b, c).reversed());
    }
    Ok(triangles)
}

/// Collapse consecutive duplicates, drop the seam point and reject rings without area.
fn prepare_ring(path: &[Point], id: RingId) -> Result<Vec<Point>, TriangulationError> {
    if path.iter().any(|p| !p.is_finite()) {
        return Err(TriangulationError::NonFiniteCoordinate { ring: id });
    }

    let mut ring: Vec<Point> = Vec::with_capacity(path.len());
    for &p in path {
        if ring.last() != Some(&p) {
            ring.push(p);
        }
    }
    // The first point repeats the closing point; keep only one copy.
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.remove(0);
    }

    if ring.len() < 3 {
        return Err(match id {
            RingId::Boundary => TriangulationError::DegenerateBoundary { points: ring.len() },
            RingId::Hole(index) => TriangulationError::DegenerateHole {
                index,
                points: ring.len(),
            },
        });
    }
    if signed_area(&ring) == 0.0 {
        return Err(TriangulationError::ZeroArea { ring: id });
    }
    Ok(ring)
}

struct Segment {
    ring: RingId,
    a: Point,
    b: Point,
    min_x: f64,
    max_x: f64,
}

fn ring_segments(ring: &[Point], id: RingId, out: &mut Vec<Segment>) {
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        out.push(Segment {
            ring: id,
            a,
            b,
            min_x: a.x.min(b.x),
            max_x: a.x.max(b.x),
        });
    }
}

/// Sweep the edges of all rings in x order and reject any crossing, overlap or T-junction.
fn check_crossings(boundary: &[Point], holes: &[Vec<Point>]) -> Result<(), TriangulationError> {
    let mut segments = Vec::with_capacity(boundary.len() + holes.iter().map(Vec::len).sum::<usize>());
    ring_segments(boundary, RingId::Boundary, &mut segments);
    for (index, hole) in holes.iter().enumerate() {
        ring_segments(hole, RingId::Hole(index), &mut segments);
    }
    segments.sort_by(|l, r| l.min_x.total_cmp(&r.min_x));

    let mut active: Vec<usize> = Vec::new();
    for (i, seg) in segments.iter().enumerate() {
        active.retain(|&j| segments[j].max_x >= seg.min_x);
        for &j in &active {
            let other = &segments[j];
            let (lo, hi) = (seg.a.y.min(seg.b.y), seg.a.y.max(seg.b.y));
            if other.a.y.max(other.b.y) < lo || other.a.y.min(other.b.y) > hi {
                continue;
            }
            if segments_conflict(seg.a, seg.b, other.a, other.b) {
                return Err(if seg.ring == other.ring {
                    TriangulationError::SelfIntersecting { ring: seg.ring }
                } else {
                    TriangulationError::RingsIntersect {
                        first: other.ring,
                        second: seg.ring,
                    }
                });
            }
        }
        active.push(i);
    }
    Ok(())
}

/// Every hole must sit inside the boundary and outside every other hole.
///
/// Once crossings are ruled out, the midpoint of any hole edge is strictly inside or strictly
/// outside each other ring, so one probe per hole decides containment.
fn check_nesting(boundary: &[Point], holes: &[Vec<Point>]) -> Result<(), TriangulationError> {
    for (index, hole) in holes.iter().enumerate() {
        let probe = Point::new((hole[0].x + hole[1].x) / 2.0, (hole[0].y + hole[1].y) / 2.0);
        if !point_in_ring(probe, boundary) {
            return Err(TriangulationError::HoleOutsideBoundary { index });
        }
        for (outer, other) in holes.iter().enumerate() {
            if outer != index && point_in_ring(probe, other) {
                return Err(TriangulationError::NestedHoles {
                    outer,
                    inner: index,
                });
            }
        }
    }
    Ok(())
}

fn build_cdt(
    boundary: &[Point],
    holes: &[Vec<Point>],
) -> Result<ConstrainedDelaunayTriangulation<Point2<f64>>, TriangulationError> {
    let mut cdt = ConstrainedDelaunayTriangulation::<Point2<f64>>::new();

    let rings: Vec<(RingId, &[Point])> = std::iter::once((RingId::Boundary, boundary))
        .chain(
            holes
                .iter()
                .enumerate()
                .map(|(index, hole)| (RingId::Hole(index), hole.as_slice())),
        )
        .collect();

    // All vertices go in before any constraint so no constraint is split by a later insert.
    let mut handles: Vec<Vec<FixedVertexHandle>> = Vec::with_capacity(rings.len());
    for (_, ring) in &rings {
        let mut ring_handles = Vec::with_capacity(ring.len());
        for p in ring.iter() {
            let handle = cdt.insert(Point2::new(p.x, p.y))?;
            ring_handles.push(handle);
        }
        handles.push(ring_handles);
    }

    for ((id, _), ring_handles) in rings.iter().zip(&handles) {
        let n = ring_handles.len();
        for i in 0..n {
            let from = ring_handles[i];
            let to = ring_handles[(i + 1) % n];
            if from == to {
                continue;
            }
            if !cdt.can_add_constraint(from, to) {
                return Err(TriangulationError::ConstraintConflict { ring: *id });
            }
            cdt.add_constraint(from, to);
        }
    }

    Ok(cdt)
}

/// Even-odd parity of every inner face, found by a breadth-first walk from the hull.
///
/// Faces touching the hull start outside unless the hull edge is itself a constraint; every
/// constraint edge crossed afterwards flips the parity. Each face is visited once.
fn classify_faces(
    cdt: &ConstrainedDelaunayTriangulation<Point2<f64>>,
) -> HashMap<FixedFaceHandle<InnerTag>, bool> {
    let mut inside = HashMap::with_capacity(cdt.num_inner_faces());
    let mut queue = VecDeque::new();

    for hull_edge in cdt.convex_hull() {
        let crosses = cdt.is_constraint_edge(hull_edge.as_undirected().fix());
        for side in [hull_edge, hull_edge.rev()] {
            let Some(face) = side.face().as_inner() else {
                continue;
            };
            if !inside.contains_key(&face.fix()) {
                inside.insert(face.fix(), crosses);
                queue.push_back(face);
            }
        }
    }

    while let Some(face) = queue.pop_front() {
        let parity = inside[&face.fix()];
        for edge in face.adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            if inside.contains_key(&neighbor.fix()) {
                continue;
            }
            let crosses = cdt.is_constraint_edge(edge.as_undirected().fix());
            inside.insert(neighbor.fix(), parity != crosses);
            queue.push_back(neighbor);
        }
    }
    inside
}
