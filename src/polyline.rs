//! Polyline representation for route geometries.
//!
//! Geometry is kept as decoded coordinates inside the crate. The compact
//! encoded form (signed deltas at 5 decimal places, as used by Google and
//! OSRM) only appears at provider boundaries.
//! See: <https://developers.google.com/maps/documentation/utilities/polylinealgorithm>

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinate::Coordinate;

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: u8 = 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },
    #[error("polyline ends in the middle of a value")]
    Truncated,
    #[error("polyline has a latitude without a longitude")]
    DanglingLatitude,
    #[error("polyline coordinate overflows at offset {offset}")]
    Overflow { offset: usize },
}

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        let bytes = encoded.as_bytes();
        let mut points = Vec::new();
        let mut offset = 0;
        let mut lat = 0i64;
        let mut lng = 0i64;

        while offset < bytes.len() {
            lat = lat
                .checked_add(decode_value(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow { offset })?;
            if offset >= bytes.len() {
                return Err(PolylineError::DanglingLatitude);
            }
            lng = lng
                .checked_add(decode_value(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow { offset })?;

            points.push(Coordinate::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
        }

        Ok(Self { points })
    }

    /// Encodes the points; `decode(encode(p))` reproduces `p` to within 1e-5 degrees.
    pub fn encode(&self) -> String {
        let mut encoded = String::new();
        let mut prev_lat = 0i64;
        let mut prev_lng = 0i64;

        for point in &self.points {
            let lat = (point.lat * PRECISION).round() as i64;
            let lng = (point.lng * PRECISION).round() as i64;

            encode_value(lat - prev_lat, &mut encoded);
            encode_value(lng - prev_lng, &mut encoded);

            prev_lat = lat;
            prev_lng = lng;
        }

        encoded
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Coordinate> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }
}

impl From<Vec<Coordinate>> for Polyline {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

fn encode_value(value: i64, output: &mut String) {
    let mut remaining = if value < 0 { !(value << 1) } else { value << 1 };

    while remaining >= CONTINUATION {
        output.push(char::from(((remaining & CHUNK_MASK) | CONTINUATION) as u8 + ASCII_OFFSET));
        remaining >>= CHUNK_BITS;
    }
    output.push(char::from(remaining as u8 + ASCII_OFFSET));
}

fn decode_value(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(PolylineError::Truncated);
        };
        if !(ASCII_OFFSET..=ASCII_OFFSET + 0x3f).contains(&byte) {
            return Err(PolylineError::InvalidByte { byte, offset: *offset });
        }
        *offset += 1;

        let chunk = i64::from(byte - ASCII_OFFSET);
        // 12 chunks already exceed the 60 bits any real coordinate delta needs.
        if shift >= 60 {
            return Err(PolylineError::InvalidByte { byte, offset: *offset - 1 });
        }
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;

        if chunk < CONTINUATION {
            break;
        }
    }

    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}
