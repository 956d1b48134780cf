use alphamesh_core::Point;

/// Douglas–Peucker simplification of an open polyline.
///
/// Points whose distance to the segment between the retained neighbours is at most `tolerance`
/// are dropped. The first and last points always survive and the result is a subsequence of the
/// input. Exact consecutive duplicates are collapsed first; a tolerance of zero (or NaN) stops
/// there and returns every other point untouched.
#[must_use]
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    let deduped = dedup_consecutive(points);
    if deduped.len() <= 2 || tolerance.is_nan() || tolerance <= 0.0 {
        return deduped;
    }
    douglas_peucker(&deduped, tolerance * tolerance)
}

fn dedup_consecutive(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

fn douglas_peucker(points: &[Point], sq_tolerance: f64) -> Vec<Point> {
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    // Explicit stack instead of recursion; traced outlines can run to thousands of points.
    let mut stack = vec![(0usize, last)];
    while let Some((first, last)) = stack.pop() {
        let mut max_sq = sq_tolerance;
        let mut split = None;
        for i in first + 1..last {
            let d = sq_segment_distance(points[i], points[first], points[last]);
            if d > max_sq {
                max_sq = d;
                split = Some(i);
            }
        }
        if let Some(i) = split {
            keep[i] = true;
            stack.push((first, i));
            stack.push((i, last));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Squared distance from `p` to the segment `a`-`b`.
fn sq_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let mut x = a.x;
    let mut y = a.y;
    let dx = b.x - x;
    let dy = b.y - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((p.x - x) * dx + (p.y - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            x = b.x;
            y = b.y;
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }

    let dx = p.x - x;
    let dy = p.y - y;
    dx * dx + dy * dy
}
