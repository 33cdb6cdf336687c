//! Route model: flattened steps plus aggregate metadata.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::directions::{DirectionsResponse, RawBounds, RawRoute, RawStep};
use crate::format::{convert_meters_to_distance_text, convert_seconds_to_duration_text, Units};
use crate::polyline::Polyline;

/// One directed segment of a route.
///
/// `distance` is the authoritative ground length reported for the segment and
/// generally differs from the planar length of `polyline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub start_location: Coordinate,
    pub end_location: Coordinate,
    /// Meters.
    pub distance: u64,
    /// Seconds; `None` for synthesized partial steps.
    pub duration: Option<u64>,
    pub polyline: Polyline,
}

impl Step {
    fn from_raw(raw: &RawStep) -> Self {
        Self {
            start_location: raw.start_location,
            end_location: raw.end_location,
            distance: raw.distance.value,
            duration: Some(raw.duration.value),
            polyline: decode_or_empty(&raw.polyline.points),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub northeast: Coordinate,
    pub southwest: Coordinate,
}

impl Bounds {
    /// Smallest box containing every point, or `None` without points.
    pub fn enclosing(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            northeast: *first,
            southwest: *first,
        };
        for point in &points[1..] {
            bounds.northeast.lat = bounds.northeast.lat.max(point.lat);
            bounds.northeast.lng = bounds.northeast.lng.max(point.lng);
            bounds.southwest.lat = bounds.southwest.lat.min(point.lat);
            bounds.southwest.lng = bounds.southwest.lng.min(point.lng);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.northeast.lat + self.southwest.lat) / 2.0,
            (self.northeast.lng + self.southwest.lng) / 2.0,
        )
    }

    /// Web map zoom level that fits the box.
    pub fn zoom_level(&self) -> u8 {
        let lat_span = (self.northeast.lat - self.southwest.lat).abs();
        let lng_span = (self.northeast.lng - self.southwest.lng).abs();
        match lat_span.max(lng_span) {
            span if span < 0.05 => 13,
            span if span < 0.1 => 12,
            span if span < 0.5 => 11,
            span if span < 1.0 => 10,
            span if span < 5.0 => 9,
            _ => 7,
        }
    }
}

impl From<RawBounds> for Bounds {
    fn from(raw: RawBounds) -> Self {
        Self {
            northeast: raw.northeast,
            southwest: raw.southwest,
        }
    }
}

/// A coordinate plus its cumulative distance (meters) from the start of the
/// route it was computed against.
///
/// The distance is on the authoritative scale but only approximate: it is
/// interpolated proportionally along planar polyline length and floored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopPoint {
    pub lat: f64,
    pub lng: f64,
    pub distance: u64,
}

impl StopPoint {
    pub fn new(location: Coordinate, distance: u64) -> Self {
        Self {
            lat: location.lat,
            lng: location.lng,
            distance,
        }
    }

    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub start_location: Coordinate,
    pub end_location: Coordinate,
    pub start_address: String,
    pub end_address: String,
    pub bounds: Bounds,
    /// Sum of step distances in meters.
    pub distance: u64,
    /// Sum of step durations in seconds.
    pub duration: u64,
    pub distance_text: String,
    pub duration_text: String,
    pub polyline: Polyline,
    pub summary: String,
    pub warnings: Vec<String>,
    pub waypoint_order: Vec<usize>,
    pub steps: Vec<Step>,
}

/// Builds one route per provider route; an empty response yields no routes.
pub fn build_routes(response: &DirectionsResponse, units: &Units) -> Vec<Route> {
    response
        .routes
        .iter()
        .filter_map(|raw| Route::from_raw(raw, units))
        .collect()
}

impl Route {
    /// Flattens every leg's steps into one route. Returns `None` for a route
    /// without legs.
    pub fn from_raw(raw: &RawRoute, units: &Units) -> Option<Self> {
        let first_leg = raw.legs.first()?;
        let last_leg = raw.legs.last()?;

        let steps: Vec<Step> = raw
            .legs
            .iter()
            .flat_map(|leg| leg.steps.iter().map(Step::from_raw))
            .collect();

        let route = Self::assemble(
            Totals::of(&steps, units),
            RouteMeta {
                start_location: first_leg.start_location,
                end_location: last_leg.end_location,
                start_address: first_leg.start_address.clone(),
                end_address: last_leg.end_address.clone(),
                bounds: raw.bounds.into(),
                polyline: decode_or_empty(&raw.overview_polyline.points),
                summary: raw.summary.clone(),
                warnings: raw.warnings.clone(),
                waypoint_order: raw.waypoint_order.clone(),
            },
            steps,
        );

        let leg_distance: u64 = raw.legs.iter().map(|leg| leg.distance.value).sum();
        let leg_duration: u64 = raw.legs.iter().map(|leg| leg.duration.value).sum();
        if leg_distance != route.distance || leg_duration != route.duration {
            debug!(
                leg_distance,
                leg_duration,
                step_distance = route.distance,
                step_duration = route.duration,
                "leg totals differ from step totals"
            );
        }
        debug!(
            steps = route.steps.len(),
            distance = route.distance,
            duration = route.duration,
            summary = %route.summary,
            "built route"
        );

        Some(route)
    }

    /// A route made only of `steps`, without provider metadata. The overview
    /// polyline and bounds are derived from the step geometry.
    pub fn from_steps(steps: Vec<Step>, units: &Units) -> Option<Self> {
        let start_location = steps.first()?.start_location;
        let end_location = steps.last()?.end_location;
        let polyline = join_step_geometry(&steps);
        let bounds = Bounds::enclosing(polyline.points()).unwrap_or(Bounds {
            northeast: start_location,
            southwest: start_location,
        });

        Some(Self::assemble(
            Totals::of(&steps, units),
            RouteMeta {
                start_location,
                end_location,
                start_address: String::new(),
                end_address: String::new(),
                bounds,
                polyline,
                summary: String::new(),
                warnings: Vec::new(),
                waypoint_order: Vec::new(),
            },
            steps,
        ))
    }

    /// A new, smaller route made of `steps` that keeps this route's end.
    ///
    /// Used for the untraveled remainder of a route; `self` is not modified.
    pub fn remainder(&self, steps: Vec<Step>, units: &Units) -> Self {
        let start_location = steps
            .first()
            .map(|step| step.start_location)
            .unwrap_or(self.end_location);
        let polyline = join_step_geometry(&steps);
        let bounds = Bounds::enclosing(polyline.points()).unwrap_or(self.bounds);

        Self::assemble(
            Totals::of(&steps, units),
            RouteMeta {
                start_location,
                end_location: self.end_location,
                start_address: String::new(),
                end_address: self.end_address.clone(),
                bounds,
                polyline,
                summary: self.summary.clone(),
                warnings: self.warnings.clone(),
                waypoint_order: Vec::new(),
            },
            steps,
        )
    }

    /// Display projection without the step list.
    pub fn overview(&self) -> RouteOverview {
        RouteOverview {
            start_location: self.start_location,
            end_location: self.end_location,
            start_address: self.start_address.clone(),
            end_address: self.end_address.clone(),
            bounds: self.bounds,
            distance: self.distance,
            duration: self.duration,
            distance_text: self.distance_text.clone(),
            duration_text: self.duration_text.clone(),
            polyline: self.polyline.clone(),
            summary: self.summary.clone(),
            warnings: self.warnings.clone(),
        }
    }

    fn assemble(totals: Totals, meta: RouteMeta, steps: Vec<Step>) -> Self {
        Self {
            start_location: meta.start_location,
            end_location: meta.end_location,
            start_address: meta.start_address,
            end_address: meta.end_address,
            bounds: meta.bounds,
            distance: totals.distance,
            duration: totals.duration,
            distance_text: totals.distance_text,
            duration_text: totals.duration_text,
            polyline: meta.polyline,
            summary: meta.summary,
            warnings: meta.warnings,
            waypoint_order: meta.waypoint_order,
            steps,
        }
    }
}

/// What a map needs to draw a route: everything but the steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOverview {
    pub start_location: Coordinate,
    pub end_location: Coordinate,
    pub start_address: String,
    pub end_address: String,
    pub bounds: Bounds,
    pub distance: u64,
    pub duration: u64,
    pub distance_text: String,
    pub duration_text: String,
    pub polyline: Polyline,
    pub summary: String,
    pub warnings: Vec<String>,
}

struct RouteMeta {
    start_location: Coordinate,
    end_location: Coordinate,
    start_address: String,
    end_address: String,
    bounds: Bounds,
    polyline: Polyline,
    summary: String,
    warnings: Vec<String>,
    waypoint_order: Vec<usize>,
}

struct Totals {
    distance: u64,
    duration: u64,
    distance_text: String,
    duration_text: String,
}

impl Totals {
    fn of(steps: &[Step], units: &Units) -> Self {
        let distance = steps.iter().map(|step| step.distance).sum();
        let duration = steps.iter().filter_map(|step| step.duration).sum();
        Self {
            distance,
            duration,
            distance_text: convert_meters_to_distance_text(distance, units),
            duration_text: convert_seconds_to_duration_text(duration, units),
        }
    }
}

/// Concatenates step polylines, skipping the vertex shared at each joint.
fn join_step_geometry(steps: &[Step]) -> Polyline {
    let mut points: Vec<Coordinate> = Vec::new();
    for step in steps {
        for point in step.polyline.points() {
            if points.last() != Some(point) {
                points.push(*point);
            }
        }
    }
    Polyline::new(points)
}

fn decode_or_empty(encoded: &str) -> Polyline {
    Polyline::decode(encoded).unwrap_or_else(|err| {
        warn!(%err, "discarding undecodable polyline");
        Polyline::default()
    })
}
