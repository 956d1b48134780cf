use serde::{Deserialize, Serialize};

/// A 2D coordinate in image pixel space (y grows downwards).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`.
    #[must_use]
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn distance_sq_is_symmetric() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_abs_diff_eq!(a.distance_sq(&b), 25.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.distance_sq(&a), 25.0, epsilon = 1e-12);
    }

    #[test]
    fn conversions_keep_axis_order() {
        assert_eq!(Point::from((3.0, -1.0)), Point::new(3.0, -1.0));
        assert_eq!(Point::from([0.5, 7.0]), Point::new(0.5, 7.0));
    }

    #[test]
    fn non_finite_points_are_detected() {
        assert!(Point::new(0.0, 0.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }
}
