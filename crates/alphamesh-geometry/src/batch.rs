//! Triangulation of a whole shape collection with per-shape failure isolation.

use alphamesh_core::{Shape, TriangulatedShape};
use tracing::{info, warn};

use crate::triangulate::{TriangulationError, triangulate};

/// What a failed shape contributes to the batch output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Omit the shape. Output indices stop lining up with input indices after the first failure.
    #[default]
    Drop,
    /// Emit an empty triangle list so output index `i` is always input shape `i`.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFailure {
    /// Index of the shape in the input collection.
    pub index: usize,
    pub error: TriangulationError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub shapes: Vec<TriangulatedShape>,
    pub failures: Vec<ShapeFailure>,
}

/// Triangulate every shape independently; the result is index-aligned with `shapes`.
#[must_use]
pub fn triangulate_each(shapes: &[Shape]) -> Vec<Result<TriangulatedShape, TriangulationError>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        shapes.par_iter().map(triangulate).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        shapes.iter().map(triangulate).collect()
    }
}

/// Triangulate every shape, applying `policy` to the ones that fail.
///
/// A failure never escapes the batch: it is logged, recorded in [`BatchReport::failures`] and
/// handled according to `policy`.
#[must_use]
pub fn triangulate_all(shapes: &[Shape], policy: FailurePolicy) -> BatchReport {
    let mut report = BatchReport::default();

    for (index, outcome) in triangulate_each(shapes).into_iter().enumerate() {
        match outcome {
            Ok(triangles) => report.shapes.push(triangles),
            Err(error) => {
                warn!(shape = index, %error, "triangulation failed");
                if policy == FailurePolicy::Placeholder {
                    report.shapes.push(Vec::new());
                }
                report.failures.push(ShapeFailure { index, error });
            }
        }
    }

    if !report.failures.is_empty() {
        info!(
            input = shapes.len(),
            output = report.shapes.len(),
            failed = report.failures.len(),
            ?policy,
            "some shapes could not be triangulated"
        );
    }
    report
}
