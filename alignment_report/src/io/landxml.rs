use log::warn;
use roxmltree::{Document, Node};

use crate::alignment::{
    Alignment, ArcSegment, LineSegment, Segment, SpiralCurveSpiral, SpiralSegment,
    TurnDirection, DEFAULT_STATION_INDEX_INCREMENT,
};
use crate::error::{Error, Result};
use crate::geometry::{distance, heading, Point};
use crate::source::AlignmentSet;

use super::read_to_string;

/// Reads every `<Alignment>` of a LandXML file.
pub fn read_landxml_alignments(path: &str) -> Result<AlignmentSet> {
    let xml = read_to_string(path)?;
    parse_landxml_alignments(&xml)
}

/// Parses every `<Alignment>` of a LandXML document.
///
/// Coordinates are read as `x y`. `dirStart` is an azimuth clockwise from
/// north in the `directionUnit` of `<Units>` (radians when absent). Entry
/// spiral, curve and exit spiral triples are grouped into
/// [`SpiralCurveSpiral`] compounds.
pub fn parse_landxml_alignments(xml: &str) -> Result<AlignmentSet> {
    let doc = Document::parse(xml)?;
    let unit = direction_unit(&doc)?;
    let mut alignments = Vec::new();
    for node in doc.descendants().filter(|n| n.has_tag_name("Alignment")) {
        alignments.push(read_alignment(node, unit)?);
    }
    Ok(AlignmentSet::new(alignments))
}

/// Angle unit of LandXML direction attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectionUnit {
    Radians,
    Degrees,
    Grads,
    /// `dd.mmss` packed degrees, minutes and seconds.
    DegreesMinutesSeconds,
}

impl DirectionUnit {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "radians" => Ok(DirectionUnit::Radians),
            "decimal degrees" => Ok(DirectionUnit::Degrees),
            "grads" => Ok(DirectionUnit::Grads),
            "decimal dd.mm.ss" => Ok(DirectionUnit::DegreesMinutesSeconds),
            other => Err(Error::Parse(format!("unsupported directionUnit {other:?}"))),
        }
    }

    fn to_radians(self, value: f64) -> f64 {
        match self {
            DirectionUnit::Radians => value,
            DirectionUnit::Degrees => value.to_radians(),
            DirectionUnit::Grads => value * std::f64::consts::PI / 200.0,
            DirectionUnit::DegreesMinutesSeconds => {
                let sign = value.signum();
                let value = value.abs();
                let degrees = value.trunc();
                let packed = (value - degrees) * 100.0;
                // 45.3 - 45 lands just below 0.3
                let minutes = (packed + 1e-9).trunc();
                let seconds = (packed - minutes) * 100.0;
                (sign * (degrees + minutes / 60.0 + seconds / 3600.0)).to_radians()
            }
        }
    }
}

fn direction_unit(doc: &Document) -> Result<DirectionUnit> {
    let declared = doc
        .descendants()
        .find(|n| n.has_tag_name("Units"))
        .and_then(|units| units.children().find(|c| c.is_element()))
        .and_then(|system| system.attribute("directionUnit"));
    match declared {
        Some(value) => DirectionUnit::parse(value),
        None => Ok(DirectionUnit::Radians),
    }
}

fn read_alignment(node: Node, unit: DirectionUnit) -> Result<Alignment> {
    let name = node
        .attribute("name")
        .ok_or_else(|| Error::Parse("<Alignment> without a name".to_string()))?
        .to_string();
    let increment = opt_f64(node, "staIncrement")?.unwrap_or(DEFAULT_STATION_INDEX_INCREMENT);
    let mut station = opt_f64(node, "staStart")?.unwrap_or(0.0);

    let mut raw = Vec::new();
    if let Some(coord) = node.children().find(|n| n.has_tag_name("CoordGeom")) {
        for child in coord.children().filter(|c| c.is_element()) {
            let ctx = Context {
                alignment: &name,
                station,
                unit,
            };
            match child.tag_name().name() {
                "Line" => raw.push(Segment::Line(read_line(child, &ctx)?)),
                "PntList2D" => {
                    for line in read_point_list(child, &ctx)? {
                        station = line.end_station;
                        raw.push(Segment::Line(line));
                    }
                    continue;
                }
                "Curve" => raw.push(Segment::Arc(read_curve(child, &ctx)?)),
                "Spiral" => raw.push(Segment::Spiral(read_spiral(child, &ctx)?)),
                other => {
                    return Err(Error::Parse(format!(
                        "alignment {name}: unsupported CoordGeom element <{other}>"
                    )))
                }
            }
            if let Some(last) = raw.last() {
                station = last.end_station();
            }
        }
    } else {
        warn!("alignment {name} has no <CoordGeom>");
    }

    Ok(Alignment::new(name, increment, group_compounds(raw)))
}

/// Position of the element being read, for defaults and messages.
struct Context<'a> {
    alignment: &'a str,
    station: f64,
    unit: DirectionUnit,
}

impl Context<'_> {
    /// Converts a `dirStart` azimuth into radians counter-clockwise from +X.
    fn direction(&self, azimuth: f64) -> f64 {
        std::f64::consts::FRAC_PI_2 - self.unit.to_radians(azimuth)
    }

    fn missing(&self, element: &str, what: &str) -> Error {
        Error::Parse(format!(
            "alignment {}: <{element}> at station {} lacks {what}",
            self.alignment, self.station
        ))
    }
}

fn opt_f64(node: Node, name: &str) -> Result<Option<f64>> {
    match node.attribute(name) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Parse(format!("attribute {name}={v:?}: {e}"))),
    }
}

fn parse_point(text: &str) -> Option<Point> {
    let vals: Vec<f64> = text
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    (vals.len() >= 2).then(|| Point::new(vals[0], vals[1]))
}

fn point_child(node: Node, tag: &str) -> Option<Point> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .and_then(parse_point)
}

fn rotation(node: Node, ctx: &Context) -> Result<TurnDirection> {
    match node.attribute("rot") {
        Some("cw") => Ok(TurnDirection::Right),
        Some("ccw") => Ok(TurnDirection::Left),
        _ => Err(ctx.missing(node.tag_name().name(), "rot=\"cw|ccw\"")),
    }
}

fn read_line(node: Node, ctx: &Context) -> Result<LineSegment> {
    let start = point_child(node, "Start").ok_or_else(|| ctx.missing("Line", "<Start>"))?;
    let end = point_child(node, "End").ok_or_else(|| ctx.missing("Line", "<End>"))?;
    let start_station = opt_f64(node, "staStart")?.unwrap_or(ctx.station);
    Ok(LineSegment::new(start_station, start, end))
}

fn read_point_list(node: Node, ctx: &Context) -> Result<Vec<LineSegment>> {
    let nums: Vec<f64> = node
        .text()
        .unwrap_or_default()
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    let mut station = ctx.station;
    let mut lines = Vec::new();
    for pair in nums.chunks(2).collect::<Vec<_>>().windows(2) {
        if let ([a, b], [c, d]) = (pair[0], pair[1]) {
            let line = LineSegment::new(station, Point::new(*a, *b), Point::new(*c, *d));
            station = line.end_station;
            lines.push(line);
        }
    }
    Ok(lines)
}

fn read_curve(node: Node, ctx: &Context) -> Result<ArcSegment> {
    let start = point_child(node, "Start").ok_or_else(|| ctx.missing("Curve", "<Start>"))?;
    let turn = rotation(node, ctx)?;
    let center = point_child(node, "Center");
    let radius = match (opt_f64(node, "radius")?, center) {
        (Some(r), _) => r.abs(),
        (None, Some(c)) => distance(c, start),
        (None, None) => return Err(ctx.missing("Curve", "radius")),
    };
    let direction = match (opt_f64(node, "dirStart")?, center) {
        (Some(d), _) => ctx.direction(d),
        (None, Some(c)) => heading(c, start) + turn.sign() * std::f64::consts::FRAC_PI_2,
        (None, None) => return Err(ctx.missing("Curve", "dirStart")),
    };
    let length = match (opt_f64(node, "length")?, center, point_child(node, "End")) {
        (Some(l), _, _) => l,
        (None, Some(c), Some(e)) => {
            let sweep = (heading(c, e) - heading(c, start)) * turn.sign();
            radius * sweep.rem_euclid(std::f64::consts::TAU)
        }
        _ => return Err(ctx.missing("Curve", "length")),
    };
    Ok(ArcSegment {
        start_station: opt_f64(node, "staStart")?.unwrap_or(ctx.station),
        start,
        length,
        direction,
        radius,
        clockwise: turn == TurnDirection::Right,
    })
}

fn read_spiral(node: Node, ctx: &Context) -> Result<SpiralSegment> {
    let start = point_child(node, "Start").ok_or_else(|| ctx.missing("Spiral", "<Start>"))?;
    let turn = rotation(node, ctx)?;
    let radius_in = opt_f64(node, "radiusStart")?
        .ok_or_else(|| ctx.missing("Spiral", "radiusStart"))?
        .abs();
    let radius_out = opt_f64(node, "radiusEnd")?
        .ok_or_else(|| ctx.missing("Spiral", "radiusEnd"))?
        .abs();
    let length = match (opt_f64(node, "length")?, point_child(node, "End")) {
        (Some(l), _) => l,
        (None, Some(end)) => {
            warn!(
                "alignment {}: spiral at station {} has no length, using its chord",
                ctx.alignment, ctx.station
            );
            distance(start, end)
        }
        (None, None) => return Err(ctx.missing("Spiral", "length")),
    };
    let direction = match (opt_f64(node, "dirStart")?, point_child(node, "PI")) {
        (Some(d), _) => ctx.direction(d),
        (None, Some(pi)) => heading(start, pi),
        (None, None) => return Err(ctx.missing("Spiral", "dirStart")),
    };
    let a = match opt_f64(node, "constant")? {
        Some(a) => a.abs(),
        None => SpiralSegment::parameter(length, radius_in, radius_out),
    };
    Ok(SpiralSegment {
        start_station: opt_f64(node, "staStart")?.unwrap_or(ctx.station),
        start,
        length,
        direction,
        radius_in,
        radius_out,
        turn,
        a,
    })
}

/// Groups entry spiral, arc and exit spiral runs into compounds.
fn group_compounds(raw: Vec<Segment>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(raw.len());
    let mut idx = 0;
    while idx < raw.len() {
        if let [Segment::Spiral(spiral_in), Segment::Arc(arc), Segment::Spiral(spiral_out), ..] =
            &raw[idx..]
        {
            if spiral_in.is_narrowing() && !spiral_out.is_narrowing() {
                out.push(Segment::SpiralCurveSpiral(SpiralCurveSpiral {
                    spiral_in: *spiral_in,
                    arc: *arc,
                    spiral_out: *spiral_out,
                }));
                idx += 3;
                continue;
            }
        }
        out.push(raw[idx].clone());
        idx += 1;
    }
    out
}
