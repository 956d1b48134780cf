//! Polyline simplification and constrained triangulation of shapes with holes.

pub mod batch;
pub mod predicates;
pub mod simplify;
pub mod triangulate;

pub use batch::{BatchReport, FailurePolicy, ShapeFailure, triangulate_all, triangulate_each};
pub use simplify::simplify;
pub use triangulate::{RingId, TriangulationError, triangulate};
