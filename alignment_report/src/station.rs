//! Major+minor station notation.

use crate::error::{Error, Result};

/// Rejects increments that cannot be used as a station modulus.
pub fn validate_increment(increment: f64) -> Result<f64> {
    if increment.is_finite() && increment > 0.0 {
        Ok(increment)
    } else {
        Err(Error::InvalidConfiguration(format!(
            "station index increment must be positive, got {increment}"
        )))
    }
}

/// Formats a raw station as `"{major}+{minor}"`.
///
/// `minor` is the Euclidean remainder and `major` the whole number of
/// increments left over, so that `major * increment + minor == station` also
/// holds for negative stations and fractional increments.
///
/// ```
/// use alignment_report::station::format_station;
/// assert_eq!(format_station(2350.0, 1000.0).unwrap(), "2+350");
/// ```
pub fn format_station(station: f64, increment: f64) -> Result<String> {
    let increment = validate_increment(increment)?;
    let mut minor = station.rem_euclid(increment);
    // a remainder within rounding of a full increment is a whole station
    if increment - minor <= increment * 1e-12 {
        minor = 0.0;
    }
    let major = ((station - minor) / increment).round();
    // normalize -0
    let major = major + 0.0;
    let minor = minor + 0.0;
    Ok(format!("{major}+{minor}"))
}

/// Parses a `"{major}+{minor}"` station back into a raw distance.
pub fn parse_station(text: &str, increment: f64) -> Result<f64> {
    let increment = validate_increment(increment)?;
    let text = text.trim();
    let split_from = usize::from(text.starts_with('-') || text.starts_with('+'));
    let plus = text[split_from..]
        .find('+')
        .map(|i| i + split_from)
        .ok_or_else(|| Error::Parse(format!("station {text:?} lacks a '+' separator")))?;
    let major: f64 = text[..plus]
        .parse()
        .map_err(|e| Error::Parse(format!("station {text:?}: {e}")))?;
    let minor: f64 = text[plus + 1..]
        .parse()
        .map_err(|e| Error::Parse(format!("station {text:?}: {e}")))?;
    Ok(major * increment + minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_major_and_minor() {
        assert_eq!(format_station(2350.0, 1000.0).unwrap(), "2+350");
        assert_eq!(format_station(999.999999, 1000.0).unwrap(), "0+999.999999");
        assert_eq!(format_station(0.0, 1000.0).unwrap(), "0+0");
        assert_eq!(format_station(1000.0, 1000.0).unwrap(), "1+0");
        assert_eq!(format_station(125.5, 20.0).unwrap(), "6+5.5");
    }

    #[test]
    fn negative_station_keeps_reconstruction() {
        assert_eq!(format_station(-50.0, 1000.0).unwrap(), "-1+950");
        assert_eq!(format_station(-0.0, 1000.0).unwrap(), "0+0");
    }

    #[test]
    fn fractional_increment_keeps_major_and_minor_consistent() {
        assert_eq!(format_station(1.0, 0.1).unwrap(), "10+0");
        assert_eq!(format_station(6.0, 0.2).unwrap(), "30+0");
        assert_eq!(format_station(2.0, 0.4).unwrap(), "5+0");
        let text = format_station(0.25, 0.1).unwrap();
        assert!(text.starts_with("2+"), "{text}");
    }

    #[test]
    fn rejects_bad_increment() {
        for inc in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                format_station(10.0, inc),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn parse_inverts_format() {
        for (station, inc) in [
            (2350.0, 1000.0),
            (12.25, 100.0),
            (-50.0, 1000.0),
            (7.0, 3.0),
            (1.0, 0.1),
            (6.0, 0.2),
            (2.0, 0.4),
            (0.95, 0.1),
        ] {
            let text = format_station(station, inc).unwrap();
            let back = parse_station(&text, inc).unwrap();
            assert!((back - station).abs() < 1e-9, "{text} -> {back}");
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(parse_station("2350", 1000.0), Err(Error::Parse(_))));
        assert!(matches!(parse_station("a+b", 1000.0), Err(Error::Parse(_))));
    }
}
