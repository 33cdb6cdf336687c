//! Raw directions shapes as returned by a directions provider.
//!
//! These mirror the Google Directions JSON closely enough to deserialize it
//! directly; other providers convert into the same shape.

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, Location};

/// Travel mode requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub origin: Location,
    pub destination: Location,
    pub waypoints: Vec<Location>,
    pub alternatives: bool,
}

impl DirectionsRequest {
    pub fn new(origin: impl Into<Location>, destination: impl Into<Location>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            waypoints: Vec::new(),
            alternatives: false,
        }
    }

    pub fn waypoints(mut self, waypoints: Vec<Location>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn alternatives(mut self, alternatives: bool) -> Self {
        self.alternatives = alternatives;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRoute {
    pub bounds: RawBounds,
    pub legs: Vec<RawLeg>,
    pub overview_polyline: EncodedPolyline,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBounds {
    pub northeast: Coordinate,
    pub southwest: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLeg {
    #[serde(default)]
    pub start_address: String,
    #[serde(default)]
    pub end_address: String,
    pub start_location: Coordinate,
    pub end_location: Coordinate,
    pub distance: TextValue,
    pub duration: TextValue,
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStep {
    pub start_location: Coordinate,
    pub end_location: Coordinate,
    pub distance: TextValue,
    pub duration: TextValue,
    pub polyline: EncodedPolyline,
}

/// A provider quantity: numeric value plus the provider's own rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    pub value: u64,
    #[serde(default)]
    pub text: String,
}

impl TextValue {
    pub fn new(value: u64, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

impl EncodedPolyline {
    pub fn new(points: impl Into<String>) -> Self {
        Self {
            points: points.into(),
        }
    }
}
