//! Orders and classifies the curve entities of an alignment.

use log::{debug, warn};

use crate::alignment::{Alignment, ArcSegment, LineSegment, Segment, SpiralSegment};
use crate::error::{Error, Result};
use crate::geometry::Point;

/// Piece of a spiral-curve-spiral compound, in station order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubSegment<'a> {
    Spiral(&'a SpiralSegment),
    Arc(&'a ArcSegment),
}

/// Segment classified for main-point derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element<'a> {
    Line(&'a LineSegment),
    /// Entry spiral, arc, exit spiral.
    SpiralCurveSpiral([SubSegment<'a>; 3]),
}

/// One position of the ordered walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<'a> {
    pub element: Element<'a>,
    /// No segment follows this one.
    pub is_terminal: bool,
    pub end_station: f64,
    pub end_point: Point,
}

fn classify<'a>(alignment: &Alignment, segment: &'a Segment) -> Result<Element<'a>> {
    match segment {
        Segment::Line(line) => Ok(Element::Line(line)),
        Segment::SpiralCurveSpiral(scs) => Ok(Element::SpiralCurveSpiral([
            SubSegment::Spiral(&scs.spiral_in),
            SubSegment::Arc(&scs.arc),
            SubSegment::Spiral(&scs.spiral_out),
        ])),
        Segment::Arc(_) | Segment::Spiral(_) => Err(Error::UnsupportedSegment {
            alignment: alignment.name.clone(),
            kind: segment.kind(),
            station: segment.start_station(),
        }),
    }
}

/// Orders the segments of `alignment` by start station and classifies each one.
///
/// Fails on the first segment that is neither a line nor a spiral-curve-spiral;
/// nothing is returned for the alignment in that case.
pub fn walk(alignment: &Alignment) -> Result<Vec<Step<'_>>> {
    if alignment.segments.is_empty() {
        return Err(Error::EmptyAlignment {
            alignment: alignment.name.clone(),
        });
    }
    let mut ordered: Vec<&Segment> = alignment.segments.iter().collect();
    ordered.sort_by(|a, b| a.start_station().total_cmp(&b.start_station()));

    for pair in ordered.windows(2) {
        let gap = pair[1].start_station() - pair[0].end_station();
        if gap.abs() > 1e-6 {
            warn!(
                "alignment {}: {} ending at {} is followed by {} starting at {}",
                alignment.name,
                pair[0].kind(),
                pair[0].end_station(),
                pair[1].kind(),
                pair[1].start_station()
            );
        }
    }

    let last = ordered.len() - 1;
    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, segment)| {
            let element = classify(alignment, segment)?;
            debug!(
                "alignment {}: {} at station {}",
                alignment.name,
                segment.kind(),
                segment.start_station()
            );
            Ok(Step {
                element,
                is_terminal: idx == last,
                end_station: segment.end_station(),
                end_point: segment.end_point(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::TurnDirection;

    fn line(start_station: f64, x0: f64, x1: f64) -> Segment {
        Segment::Line(LineSegment::new(
            start_station,
            Point::new(x0, 0.0),
            Point::new(x1, 0.0),
        ))
    }

    #[test]
    fn orders_by_start_station_and_marks_terminal() {
        let alignment = Alignment::new(
            "A",
            1000.0,
            vec![line(200.0, 200.0, 300.0), line(0.0, 0.0, 100.0), line(100.0, 100.0, 200.0)],
        );
        let steps = walk(&alignment).unwrap();
        let starts: Vec<f64> = steps
            .iter()
            .map(|s| match s.element {
                Element::Line(l) => l.start_station,
                Element::SpiralCurveSpiral(_) => unreachable!(),
            })
            .collect();
        assert_eq!(starts, vec![0.0, 100.0, 200.0]);
        let terminal: Vec<bool> = steps.iter().map(|s| s.is_terminal).collect();
        assert_eq!(terminal, vec![false, false, true]);
        assert_eq!(steps[2].end_station, 300.0);
    }

    #[test]
    fn standalone_arc_is_rejected() {
        let arc = Segment::Arc(ArcSegment {
            start_station: 100.0,
            start: Point::new(100.0, 0.0),
            length: 10.0,
            direction: 0.0,
            radius: 50.0,
            clockwise: false,
        });
        let alignment = Alignment::new("Ramp", 1000.0, vec![line(0.0, 0.0, 100.0), arc]);
        match walk(&alignment) {
            Err(Error::UnsupportedSegment {
                alignment,
                kind,
                station,
            }) => {
                assert_eq!(alignment, "Ramp");
                assert_eq!(kind, "arc");
                assert_eq!(station, 100.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn standalone_spiral_is_rejected() {
        let spiral = Segment::Spiral(SpiralSegment {
            start_station: 0.0,
            start: Point::new(0.0, 0.0),
            length: 40.0,
            direction: 0.0,
            radius_in: f64::INFINITY,
            radius_out: 200.0,
            turn: TurnDirection::Left,
            a: SpiralSegment::parameter(40.0, f64::INFINITY, 200.0),
        });
        let alignment = Alignment::new("S", 1000.0, vec![spiral]);
        assert!(matches!(
            walk(&alignment),
            Err(Error::UnsupportedSegment { kind: "spiral", .. })
        ));
    }

    #[test]
    fn empty_alignment_is_an_error() {
        let alignment = Alignment::new("Empty", 1000.0, Vec::new());
        assert!(matches!(walk(&alignment), Err(Error::EmptyAlignment { .. })));
    }
}
