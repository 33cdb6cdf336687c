//! Coordinates and the locations accepted at the planner boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Values are passed through as received; there is no wraparound handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Euclidean distance between two coordinates, treating degrees as a plane.
    ///
    /// This is a cheap proxy for ground distance. It misranks candidates at
    /// high latitudes and over long segments, and all of the route geometry
    /// relies on it anyway.
    pub fn planar_distance(&self, other: &Coordinate) -> f64 {
        let lat_delta = self.lat - other.lat;
        let lng_delta = self.lng - other.lng;
        (lat_delta * lat_delta + lng_delta * lng_delta).sqrt()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.lat, value.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// An origin, destination or waypoint as given by a user.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Address(String),
    Coordinate(Coordinate),
}

impl Location {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Location::Coordinate(coordinate) => Some(*coordinate),
            Location::Address(_) => None,
        }
    }
}

impl From<Coordinate> for Location {
    fn from(value: Coordinate) -> Self {
        Location::Coordinate(value)
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        // Parsing never fails: anything that is not a "lat, lng" pair is an address.
        match value.parse() {
            Ok(location) => location,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Address(address) => f.write_str(address),
            Location::Coordinate(coordinate) => coordinate.fmt(f),
        }
    }
}

impl FromStr for Location {
    type Err = std::convert::Infallible;

    /// `"47.660738, -2.971431"` (any surrounding whitespace) is a coordinate;
    /// everything else is kept verbatim as an address.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(parse_coordinate(value)
            .map(Location::Coordinate)
            .unwrap_or_else(|| Location::Address(value.to_string())))
    }
}

fn parse_coordinate(value: &str) -> Option<Coordinate> {
    let (lat, lng) = value.split_once(',')?;
    let lat = parse_decimal(lat.trim())?;
    let lng = parse_decimal(lng.trim())?;
    Some(Coordinate::new(lat, lng))
}

/// Accepts only `-?digits.digits`, so addresses such as "1, Main Street" stay addresses.
fn parse_decimal(value: &str) -> Option<f64> {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (whole, fraction) = unsigned.split_once('.')?;
    let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return None;
    }
    value.parse().ok()
}
