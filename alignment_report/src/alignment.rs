use serde::{Deserialize, Serialize};

use crate::geometry::{distance, Point};

/// Station-index increment used when a source does not report one.
pub const DEFAULT_STATION_INDEX_INCREMENT: f64 = 1000.0;

/// Side towards which a curve element bends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// `1.0` for left (counter-clockwise) turns, `-1.0` for right turns.
    pub fn sign(self) -> f64 {
        match self {
            TurnDirection::Left => 1.0,
            TurnDirection::Right => -1.0,
        }
    }
}

/// Straight tangent between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start_station: f64,
    pub end_station: f64,
    pub start: Point,
    pub end: Point,
    pub length: f64,
}

impl LineSegment {
    /// Creates a line starting at `start_station`; the end station follows from its length.
    pub fn new(start_station: f64, start: Point, end: Point) -> Self {
        let length = distance(start, end);
        Self {
            start_station,
            end_station: start_station + length,
            start,
            end,
            length,
        }
    }
}

/// Circular curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub start_station: f64,
    pub start: Point,
    pub length: f64,
    /// Tangent direction at the start in radians, counter-clockwise from +X.
    pub direction: f64,
    /// Radius magnitude.
    pub radius: f64,
    pub clockwise: bool,
}

impl ArcSegment {
    pub fn turn(&self) -> TurnDirection {
        if self.clockwise {
            TurnDirection::Right
        } else {
            TurnDirection::Left
        }
    }

    pub fn end_station(&self) -> f64 {
        self.start_station + self.length
    }

    pub fn end_point(&self) -> Point {
        let s = self.turn().sign();
        let r = self.radius;
        let theta = self.direction;
        let theta_end = theta + s * self.length / r;
        Point::new(
            self.start.x + s * r * (theta_end.sin() - theta.sin()),
            self.start.y + s * r * (theta.cos() - theta_end.cos()),
        )
    }
}

/// Clothoid transition whose curvature varies linearly from `radius_in` to `radius_out`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralSegment {
    pub start_station: f64,
    pub start: Point,
    pub length: f64,
    /// Tangent direction at the start in radians, counter-clockwise from +X.
    pub direction: f64,
    /// Entry radius magnitude; infinite on the tangent side.
    #[serde(with = "radius_serde")]
    pub radius_in: f64,
    /// Exit radius magnitude; infinite on the tangent side.
    #[serde(with = "radius_serde")]
    pub radius_out: f64,
    pub turn: TurnDirection,
    /// Spiral parameter A (unsigned).
    pub a: f64,
}

/// JSON has no infinity; an infinite radius is stored as `null`.
mod radius_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(radius: &f64, s: S) -> Result<S::Ok, S::Error> {
        if radius.is_finite() {
            s.serialize_f64(*radius)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }
}

fn curvature(radius: f64) -> f64 {
    if radius.is_infinite() || radius == 0.0 {
        0.0
    } else {
        1.0 / radius
    }
}

impl SpiralSegment {
    /// Clothoid parameter for a spiral of `length` between two radii: `A^2 = L / |1/R_out - 1/R_in|`.
    pub fn parameter(length: f64, radius_in: f64, radius_out: f64) -> f64 {
        let dk = (curvature(radius_out) - curvature(radius_in)).abs();
        if dk < f64::EPSILON {
            f64::INFINITY
        } else {
            (length / dk).sqrt()
        }
    }

    /// True for an entry transition: the radius shrinks towards the curve.
    pub fn is_narrowing(&self) -> bool {
        self.radius_in > self.radius_out
    }

    pub fn end_station(&self) -> f64 {
        self.start_station + self.length
    }

    pub fn end_point(&self) -> Point {
        self.point_at(self.length)
    }

    fn point_at(&self, s: f64) -> Point {
        let sign = self.turn.sign();
        let k0 = sign * curvature(self.radius_in);
        let k1 = sign * curvature(self.radius_out);
        let kp = (k1 - k0) / self.length;

        if kp.abs() < 1e-12 {
            if k0.abs() < f64::EPSILON {
                return self.start.advance(self.direction, s);
            }
            let r = 1.0 / k0;
            let cx = self.start.x - r * self.direction.sin();
            let cy = self.start.y + r * self.direction.cos();
            let ang = self.direction + k0 * s;
            return Point::new(cx + r * ang.sin(), cy - r * ang.cos());
        }

        // theta(s) = alpha * (s + beta / 2alpha)^2 + delta
        let alpha = kp / 2.0;
        let beta = k0;
        let delta = self.direction - beta * beta / (4.0 * alpha);
        let sign = alpha.signum();
        let z = |x: f64| -> f64 {
            (2.0 * alpha.abs() / std::f64::consts::PI).sqrt() * (x + beta / (2.0 * alpha))
        };
        let (s0, c0) = fresnel::fresnl(z(0.0));
        let (s1, c1) = fresnel::fresnl(z(s));
        let fac = (std::f64::consts::PI / (2.0 * alpha.abs())).sqrt();
        let dc = c1 - c0;
        let ds = s1 - s0;
        let dx = fac * (dc * delta.cos() - sign * ds * delta.sin());
        let dy = fac * (dc * delta.sin() + sign * ds * delta.cos());
        Point::new(self.start.x + dx, self.start.y + dy)
    }
}

/// Spiral-curve-spiral compound: entry spiral, circular arc, exit spiral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralCurveSpiral {
    pub spiral_in: SpiralSegment,
    pub arc: ArcSegment,
    pub spiral_out: SpiralSegment,
}

impl SpiralCurveSpiral {
    pub fn end_station(&self) -> f64 {
        self.spiral_out.end_station()
    }

    pub fn end_point(&self) -> Point {
        self.spiral_out.end_point()
    }
}

/// Curve entity of a horizontal alignment as reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Line(LineSegment),
    Arc(ArcSegment),
    Spiral(SpiralSegment),
    SpiralCurveSpiral(SpiralCurveSpiral),
}

impl Segment {
    pub fn start_station(&self) -> f64 {
        match self {
            Segment::Line(line) => line.start_station,
            Segment::Arc(arc) => arc.start_station,
            Segment::Spiral(spiral) => spiral.start_station,
            Segment::SpiralCurveSpiral(scs) => scs.spiral_in.start_station,
        }
    }

    pub fn end_station(&self) -> f64 {
        match self {
            Segment::Line(line) => line.end_station,
            Segment::Arc(arc) => arc.end_station(),
            Segment::Spiral(spiral) => spiral.end_station(),
            Segment::SpiralCurveSpiral(scs) => scs.end_station(),
        }
    }

    pub fn end_point(&self) -> Point {
        match self {
            Segment::Line(line) => line.end,
            Segment::Arc(arc) => arc.end_point(),
            Segment::Spiral(spiral) => spiral.end_point(),
            Segment::SpiralCurveSpiral(scs) => scs.end_point(),
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Segment::Line(_) => "line",
            Segment::Arc(_) => "arc",
            Segment::Spiral(_) => "spiral",
            Segment::SpiralCurveSpiral(_) => "spiral-curve-spiral",
        }
    }
}

fn default_increment() -> f64 {
    DEFAULT_STATION_INDEX_INCREMENT
}

/// Named horizontal alignment snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub name: String,
    #[serde(default = "default_increment")]
    pub station_index_increment: f64,
    pub segments: Vec<Segment>,
}

impl Alignment {
    pub fn new(name: impl Into<String>, station_index_increment: f64, segments: Vec<Segment>) -> Self {
        Self {
            name: name.into(),
            station_index_increment,
            segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn entry_spiral(turn: TurnDirection) -> SpiralSegment {
        SpiralSegment {
            start_station: 0.0,
            start: Point::new(0.0, 0.0),
            length: 50.0,
            direction: 0.0,
            radius_in: f64::INFINITY,
            radius_out: 100.0,
            turn,
            a: SpiralSegment::parameter(50.0, f64::INFINITY, 100.0),
        }
    }

    #[test]
    fn spiral_geometry() {
        let end = entry_spiral(TurnDirection::Left).end_point();
        assert!((end.x - 49.6884029).abs() < 1e-6);
        assert!((end.y - 4.1481024).abs() < 1e-6);
    }

    #[test]
    fn right_spiral_mirrors_left() {
        let left = entry_spiral(TurnDirection::Left).end_point();
        let right = entry_spiral(TurnDirection::Right).end_point();
        assert!((left.x - right.x).abs() < 1e-9);
        assert!((left.y + right.y).abs() < 1e-9);
    }

    #[test]
    fn exit_spiral_keeps_chord_and_side() {
        let entry = entry_spiral(TurnDirection::Left);
        let exit = SpiralSegment {
            radius_in: 100.0,
            radius_out: f64::INFINITY,
            ..entry
        };
        let chord_in = distance(entry.start, entry.end_point());
        let end = exit.end_point();
        assert!((distance(exit.start, end) - chord_in).abs() < 1e-6);
        assert!(end.y > 0.0);
        assert!(end.x > 0.0);
    }

    #[test]
    fn spiral_parameter() {
        let a = SpiralSegment::parameter(50.0, f64::INFINITY, 100.0);
        assert!((a - (5000.0f64).sqrt()).abs() < 1e-9);
        assert!(SpiralSegment::parameter(10.0, 100.0, 100.0).is_infinite());
    }

    #[test]
    fn quarter_arc_end_point() {
        let radius = 100.0;
        let arc = ArcSegment {
            start_station: 10.0,
            start: Point::new(0.0, 0.0),
            length: radius * FRAC_PI_2,
            direction: 0.0,
            radius,
            clockwise: false,
        };
        let end = arc.end_point();
        assert!((end.x - 100.0).abs() < 1e-9);
        assert!((end.y - 100.0).abs() < 1e-9);
        assert!((arc.end_station() - (10.0 + radius * FRAC_PI_2)).abs() < 1e-9);

        let cw = ArcSegment { clockwise: true, ..arc };
        let end = cw.end_point();
        assert!((end.x - 100.0).abs() < 1e-9);
        assert!((end.y + 100.0).abs() < 1e-9);
    }

    #[test]
    fn line_end_station_follows_length() {
        let line = LineSegment::new(20.0, Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert_eq!(line.length, 5.0);
        assert_eq!(line.end_station, 25.0);
        assert_eq!(Segment::Line(line).end_point(), Point::new(3.0, 4.0));
    }
}
