use serde::{Deserialize, Serialize};

use crate::alignment::{ArcSegment, LineSegment, SpiralSegment};
use crate::error::Result;
use crate::geometry::Point;
use crate::station::format_station;

/// Surveyor-significant point of an alignment, one row of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainPoint {
    pub name: String,
    pub station: String,
    pub x: f64,
    pub y: f64,
    pub length: Option<f64>,
    /// Start tangent direction in degrees.
    pub direction: Option<f64>,
    pub radius_in: Option<f64>,
    pub radius_out: Option<f64>,
    pub a_value: Option<f64>,
}

impl MainPoint {
    fn at(name: String, station: f64, point: Point, increment: f64) -> Result<Self> {
        Ok(Self {
            name,
            station: format_station(station, increment)?,
            x: point.x,
            y: point.y,
            length: None,
            direction: None,
            radius_in: None,
            radius_out: None,
            a_value: None,
        })
    }

    /// Start of a straight element.
    pub fn line_start(name: String, line: &LineSegment, increment: f64) -> Result<Self> {
        let mut point = Self::at(name, line.start_station, line.start, increment)?;
        point.length = Some(line.length);
        Ok(point)
    }

    /// Start of a circular arc; radii carry the turn sign.
    pub fn arc_start(name: String, arc: &ArcSegment, increment: f64) -> Result<Self> {
        let radius = arc.radius.abs() * arc.turn().sign();
        let mut point = Self::at(name, arc.start_station, arc.start, increment)?;
        point.length = Some(arc.length);
        point.direction = Some(arc.direction.to_degrees());
        point.radius_in = Some(radius);
        point.radius_out = Some(radius);
        Ok(point)
    }

    /// Start of a transition spiral; radii and A carry the turn sign.
    pub fn spiral_start(name: String, spiral: &SpiralSegment, increment: f64) -> Result<Self> {
        let sign = spiral.turn.sign();
        let mut point = Self::at(name, spiral.start_station, spiral.start, increment)?;
        point.length = Some(spiral.length);
        point.direction = Some(spiral.direction.to_degrees());
        point.radius_in = Some(spiral.radius_in.abs() * sign);
        point.radius_out = Some(spiral.radius_out.abs() * sign);
        point.a_value = Some(spiral.a.abs() * sign);
        Ok(point)
    }

    /// Synthetic end marker at the last station of an alignment.
    pub fn end_marker(station: f64, point: Point, increment: f64) -> Result<Self> {
        Self::at("EP".to_string(), station, point, increment)
    }
}
