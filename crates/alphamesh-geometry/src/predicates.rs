//! Planar predicates on closed rings.
//!
//! Coordinates coming out of the parser are whole pixels, so the plain `f64` cross products here
//! are exact for any realistic image size.

use alphamesh_core::Point;

/// Twice the signed area of `a`, `b`, `c`; positive when they turn counter-clockwise (y-up).
#[inline]
#[must_use]
pub fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Shoelace area of a closed ring (the closing edge is implied).
#[must_use]
pub fn signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        acc += ring[j].x * ring[i].y - ring[i].x * ring[j].y;
        j = i;
    }
    0.5 * acc
}

/// Even-odd ray cast. Points exactly on an edge may land either way.
#[must_use]
pub fn point_in_ring(p: Point, ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// True when `p` lies on the segment `a`-`b` but is neither endpoint.
#[must_use]
pub fn strictly_inside_segment(p: Point, a: Point, b: Point) -> bool {
    if p == a || p == b || orient(a, b, p) != 0.0 {
        return false;
    }
    let within_x = p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x);
    let within_y = p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y);
    within_x && within_y
}

/// Whether two segments interfere in a way a triangulation boundary cannot tolerate.
///
/// Proper crossings, collinear overlaps of positive length and T-junctions (an endpoint resting
/// on the other segment's interior) all count. Segments that merely share an endpoint do not.
#[must_use]
pub fn segments_conflict(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);

    let straddles_b = (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0);
    let straddles_a = (d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0);
    if straddles_a && straddles_b {
        return true;
    }

    strictly_inside_segment(a1, b1, b2)
        || strictly_inside_segment(a2, b1, b2)
        || strictly_inside_segment(b1, a1, a2)
        || strictly_inside_segment(b2, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn square(min: f64, max: f64) -> Vec<Point> {
        vec![p(min, min), p(max, min), p(max, max), p(min, max)]
    }

    #[test]
    fn area_sign_follows_winding() {
        let ccw = square(0.0, 2.0);
        let mut cw = ccw.clone();
        cw.reverse();
        assert_abs_diff_eq!(signed_area(&ccw), 4.0);
        assert_abs_diff_eq!(signed_area(&cw), -4.0);
        assert_abs_diff_eq!(signed_area(&ccw[..2]), 0.0);
    }

    #[test]
    fn ray_cast_classifies_interior_and_exterior() {
        let ring = square(0.0, 10.0);
        assert!(point_in_ring(p(5.0, 5.0), &ring));
        assert!(point_in_ring(p(0.5, 9.5), &ring));
        assert!(!point_in_ring(p(-1.0, 5.0), &ring));
        assert!(!point_in_ring(p(5.0, 11.0), &ring));
    }

    #[test]
    fn crossing_segments_conflict() {
        assert!(segments_conflict(p(0.0, 0.0), p(4.0, 4.0), p(0.0, 4.0), p(4.0, 0.0)));
    }

    #[test]
    fn shared_endpoint_is_not_a_conflict() {
        assert!(!segments_conflict(p(0.0, 0.0), p(4.0, 0.0), p(4.0, 0.0), p(4.0, 4.0)));
        assert!(!segments_conflict(p(0.0, 0.0), p(2.0, 0.0), p(2.0, 0.0), p(5.0, 0.0)));
    }

    #[test]
    fn collinear_overlap_conflicts() {
        assert!(segments_conflict(p(0.0, 0.0), p(4.0, 0.0), p(2.0, 0.0), p(6.0, 0.0)));
        assert!(!segments_conflict(p(0.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), p(6.0, 0.0)));
    }

    #[test]
    fn t_junction_conflicts() {
        assert!(segments_conflict(p(0.0, 0.0), p(4.0, 0.0), p(2.0, 0.0), p(2.0, 3.0)));
    }

    #[test]
    fn disjoint_segments_do_not_conflict() {
        assert!(!segments_conflict(p(0.0, 0.0), p(1.0, 1.0), p(3.0, 0.0), p(4.0, 1.0)));
    }
}
