//! On-disk records exchanged between pipeline stages.

use serde::{Deserialize, Serialize};

use crate::{Path, Shape, TriangulatedShape};

/// Intermediate artifact between parsing and triangulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShapesDocument {
    pub shapes: Vec<Shape>,
}

/// Final output: triangles per shape plus the canvas size they live in.
///
/// `paths` is only present when the caller asked for outer boundaries; it holds one closed ring
/// per input shape that has an outer path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeshDocument {
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<TriangulatedShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<Path>>,
}

impl MeshDocument {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, Triangle};

    #[test]
    fn paths_are_omitted_unless_requested() {
        let doc = MeshDocument {
            width: 3,
            height: 2,
            shapes: vec![],
            paths: None,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("paths").is_none());
        assert_eq!(json["width"], 3);
    }

    #[test]
    fn mesh_document_reads_back_from_json() {
        let text = r#"{
            "width": 10,
            "height": 10,
            "shapes": [[[{"x":0,"y":0},{"x":10,"y":0},{"x":0,"y":10}]]]
        }"#;
        let doc: MeshDocument = serde_json::from_str(text).unwrap();
        assert_eq!(doc.triangle_count(), 1);
        assert_eq!(
            doc.shapes[0][0],
            Triangle::new(
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 10.0)
            )
        );
        assert!(doc.paths.is_none());
    }

    #[test]
    fn shapes_document_accepts_missing_holes() {
        let text = r#"{"shapes":[{"mainPath":[{"x":1,"y":2}]},{"mainPath":null,"holePaths":[]}]}"#;
        let doc: ShapesDocument = serde_json::from_str(text).unwrap();
        assert_eq!(doc.shapes.len(), 2);
        assert!(doc.shapes[0].hole_paths.is_empty());
        assert!(doc.shapes[1].main_path.is_none());
    }
}
