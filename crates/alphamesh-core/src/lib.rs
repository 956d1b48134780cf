//! Shared value types for the alphamesh pipeline.
//!
//! Every stage (parser, simplifier, triangulator, renderer) speaks in these types, and the two
//! documents below are the on-disk boundary artifacts.

pub mod document;
pub mod point;
pub mod shape;

pub use document::{MeshDocument, ShapesDocument};
pub use point::Point;
pub use shape::{Path, Shape, Triangle, TriangulatedShape};
