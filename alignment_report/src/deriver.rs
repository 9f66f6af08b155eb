//! Derives named main points from a walked alignment.

use log::info;

use crate::alignment::Alignment;
use crate::error::{Error, Result};
use crate::main_point::MainPoint;
use crate::station::validate_increment;
use crate::walker::{walk, Element, Step, SubSegment};

/// Naming counters threaded through the walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    /// Lines consumed so far.
    pub line: usize,
    /// Spiral-curve-spiral compounds consumed so far.
    pub scs: usize,
}

/// Name of a line start: `BP` for the first line, `KA{i}-2` afterwards.
pub fn line_name(line_index: usize) -> String {
    if line_index == 0 {
        "BP".to_string()
    } else {
        format!("KA{line_index}-2")
    }
}

/// Name of the circular arc of compound `scs_index`.
pub fn arc_name(scs_index: usize) -> String {
    format!("KE{}-1", scs_index + 1)
}

/// Name of a spiral of compound `scs_index`: `KA{n}-1` entering the curve, `KE{n}-2` leaving it.
pub fn spiral_name(scs_index: usize, narrowing: bool) -> String {
    if narrowing {
        format!("KA{}-1", scs_index + 1)
    } else {
        format!("KE{}-2", scs_index + 1)
    }
}

fn derive_step(
    step: &Step<'_>,
    counters: Counters,
    increment: f64,
    out: &mut Vec<MainPoint>,
) -> Result<Counters> {
    let next = match step.element {
        Element::Line(line) => {
            out.push(MainPoint::line_start(line_name(counters.line), line, increment)?);
            Counters {
                line: counters.line + 1,
                ..counters
            }
        }
        Element::SpiralCurveSpiral(parts) => {
            for part in parts {
                let point = match part {
                    SubSegment::Spiral(spiral) => MainPoint::spiral_start(
                        spiral_name(counters.scs, spiral.is_narrowing()),
                        spiral,
                        increment,
                    )?,
                    SubSegment::Arc(arc) => {
                        MainPoint::arc_start(arc_name(counters.scs), arc, increment)?
                    }
                };
                out.push(point);
            }
            Counters {
                scs: counters.scs + 1,
                ..counters
            }
        }
    };
    if step.is_terminal {
        out.push(MainPoint::end_marker(step.end_station, step.end_point, increment)?);
    }
    Ok(next)
}

/// Derives the main points of `alignment` using an explicit station-index increment.
///
/// Any failure aborts the whole alignment; no partial list is returned.
pub fn derive_main_points_with_increment(
    alignment: &Alignment,
    increment: f64,
) -> Result<Vec<MainPoint>> {
    let increment = validate_increment(increment)?;
    let steps = walk(alignment)?;
    let (points, counters) = steps.iter().try_fold(
        (Vec::with_capacity(steps.len() * 3 + 1), Counters::default()),
        |(mut points, counters), step| {
            let counters = derive_step(step, counters, increment, &mut points)?;
            Ok::<_, Error>((points, counters))
        },
    )?;
    info!(
        "alignment {}: {} main points from {} lines and {} compounds",
        alignment.name,
        points.len(),
        counters.line,
        counters.scs
    );
    Ok(points)
}

/// Derives the main points of `alignment` using its own station-index increment.
pub fn derive_main_points(alignment: &Alignment) -> Result<Vec<MainPoint>> {
    derive_main_points_with_increment(alignment, alignment.station_index_increment)
}
