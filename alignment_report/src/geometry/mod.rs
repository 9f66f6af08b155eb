//! Basic geometry primitives for alignment geometry.

/// Representation of a 2D point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the point reached by travelling `dist` along `direction`
    /// (radians, counter-clockwise from +X).
    pub fn advance(self, direction: f64, dist: f64) -> Point {
        Point::new(
            self.x + dist * direction.cos(),
            self.y + dist * direction.sin(),
        )
    }
}

/// Calculates the Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Direction from `a` towards `b` in radians, counter-clockwise from +X.
pub fn heading(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}
