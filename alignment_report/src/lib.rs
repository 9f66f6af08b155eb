//! Main-point reports for horizontal road alignments.
//!
//! An [`alignment::Alignment`] is walked in station order ([`walker`]), each
//! line and spiral-curve-spiral element is turned into named
//! [`main_point::MainPoint`] records ([`deriver`]) with stations in
//! major+minor notation ([`station`]), and the records are rendered as a
//! table ([`reporting`]).

pub mod alignment;
pub mod deriver;
pub mod error;
pub mod geometry;
pub mod io;
pub mod main_point;
pub mod reporting;
pub mod source;
pub mod station;
pub mod walker;

pub use alignment::{Alignment, Segment};
pub use deriver::derive_main_points;
pub use error::{Error, Result};
pub use main_point::MainPoint;
pub use source::AlignmentSet;
