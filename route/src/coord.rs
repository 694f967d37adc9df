use crate::RouteError;
use geo::geometry::Coord;
use std::{fmt, str::FromStr};

/// A validated latitude/longitude pair.
///
/// Only obtainable through [Coordinate::parse], so latitude is always
/// within `[-90, 90]` and longitude within `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate(Coord<f64>);

impl Coordinate {
    /// Parses `"<lat>,<lon>"`, allowing whitespace around either
    /// number.
    ///
    /// Numbers are plain decimals with an optional sign and fractional
    /// part; exponents, `inf`, and `NaN` are rejected.
    pub fn parse(text: &str) -> Result<Self, RouteError> {
        let mk_err = || RouteError::MalformedInput(text.to_owned());
        let mut tokens = text.split(',');
        let (Some(lat_str), Some(lon_str), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(mk_err());
        };
        let lat = parse_decimal(lat_str).ok_or_else(mk_err)?;
        let lon = parse_decimal(lon_str).ok_or_else(mk_err)?;
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
            Ok(Self(Coord { x: lon, y: lat }))
        } else {
            Err(mk_err())
        }
    }

    pub fn latitude(&self) -> f64 {
        self.0.y
    }

    pub fn longitude(&self) -> f64 {
        self.0.x
    }
}

fn parse_decimal(token: &str) -> Option<f64> {
    let token = token.trim();
    if token
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.'))
    {
        f64::from_str(token).ok()
    } else {
        None
    }
}

impl FromStr for Coordinate {
    type Err = RouteError;
    fn from_str(s: &str) -> Result<Self, RouteError> {
        Self::parse(s)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(Coordinate(coord): Coordinate) -> Self {
        coord
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude(), self.longitude())
    }
}
