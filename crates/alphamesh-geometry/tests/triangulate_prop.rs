use alphamesh_core::{Point, Shape};
use alphamesh_geometry::predicates::{point_in_ring, signed_area};
use alphamesh_geometry::{FailurePolicy, triangulate, triangulate_all};
use proptest::prelude::*;

fn regular_polygon(n: usize, radius: f64, phase: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let angle = phase + std::f64::consts::TAU * i as f64 / n as f64;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

proptest! {
    #[test]
    fn convex_polygon_yields_n_minus_two_triangles(
        n in 3usize..48,
        radius in 10.0f64..1000.0,
        phase in 0.0f64..1.0,
    ) {
        let ring = regular_polygon(n, radius, phase);
        let triangles = triangulate(&Shape::new(ring.clone(), vec![])).unwrap();
        prop_assert_eq!(triangles.len(), n - 2);

        let covered: f64 = triangles.iter().map(|t| t.signed_area().abs()).sum();
        let expected = signed_area(&ring).abs();
        prop_assert!((covered - expected).abs() <= expected * 1e-9);
    }

    #[test]
    fn square_with_hole_stays_between_rings(
        size in 20i32..400,
        inset in 1i32..9,
    ) {
        let s = f64::from(size);
        let lo = s * f64::from(inset) / 20.0;
        let hi = s - lo;
        let outer = vec![
            Point::new(0.0, 0.0),
            Point::new(s, 0.0),
            Point::new(s, s),
            Point::new(0.0, s),
        ];
        let hole = vec![
            Point::new(lo, lo),
            Point::new(hi, lo),
            Point::new(hi, hi),
            Point::new(lo, hi),
        ];
        let triangles = triangulate(&Shape::new(outer.clone(), vec![hole.clone()])).unwrap();
        prop_assert_eq!(triangles.len(), 8);
        for t in &triangles {
            let c = t.centroid();
            prop_assert!(point_in_ring(c, &outer));
            prop_assert!(!point_in_ring(c, &hole));
        }
    }
}

#[test]
fn degenerate_middle_shape_does_not_abort_batch() {
    let shapes = vec![
        Shape::new(regular_polygon(6, 50.0, 0.0), vec![]),
        Shape::new(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)], vec![]),
        Shape::new(regular_polygon(5, 50.0, 0.3), vec![]),
    ];
    let report = triangulate_all(&shapes, FailurePolicy::Drop);
    assert_eq!(report.shapes.len(), 2);
    assert_eq!(report.shapes[0].len(), 4);
    assert_eq!(report.shapes[1].len(), 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
}
