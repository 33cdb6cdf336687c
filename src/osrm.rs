//! OSRM HTTP adapter for directions.
//!
//! OSRM only routes between coordinates and reports no addresses, so leg
//! addresses are the snapped waypoint (street) names.

use serde::Deserialize;
use tracing::debug;

use crate::coordinate::{Coordinate, Location};
use crate::directions::{
    DirectionsRequest, DirectionsResponse, EncodedPolyline, RawBounds, RawLeg, RawRoute, RawStep, TextValue,
};
use crate::error::{Error, Result};
use crate::polyline::Polyline;
use crate::route::Bounds;
use crate::traits::DirectionsProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl DirectionsProvider for OsrmClient {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse> {
        let locations = std::iter::once(&request.origin)
            .chain(&request.waypoints)
            .chain(std::iter::once(&request.destination));

        let coords = locations
            .map(|location| match location {
                Location::Coordinate(Coordinate { lat, lng }) => Ok(format!("{:.6},{:.6}", lng, lat)),
                Location::Address(address) => Err(Error::UnsupportedLocation(address.clone())),
            })
            .collect::<Result<Vec<_>>>()?
            .join(";");

        let url = format!(
            "{}/route/v1/{}/{}?steps=true&overview=full&geometries=polyline&alternatives={}",
            self.config.base_url, self.config.profile, coords, request.alternatives
        );

        let body = self
            .client
            .get(url)
            .send()?
            .json::<OsrmRouteResponse>()?;

        match body.code.as_str() {
            "Ok" => {}
            "NoRoute" | "NoSegment" => return Ok(DirectionsResponse::default()),
            _ => {
                return Err(Error::Provider {
                    status: body.code,
                    message: body.message.unwrap_or_default(),
                });
            }
        }

        let names: Vec<String> = body.waypoints.iter().map(|waypoint| waypoint.name.clone()).collect();
        let routes: Vec<RawRoute> = body.routes.iter().filter_map(|route| convert_route(route, &names)).collect();
        debug!(routes = routes.len(), "osrm route response");

        Ok(DirectionsResponse { routes })
    }
}

/// Returns `None` when the overview geometry is unusable. Legs without a
/// usable step have no endpoints and are dropped.
fn convert_route(route: &OsrmRoute, waypoint_names: &[String]) -> Option<RawRoute> {
    let overview = Polyline::decode(&route.geometry).ok()?;
    let bounds = Bounds::enclosing(overview.points())?;

    let legs = route
        .legs
        .iter()
        .enumerate()
        .filter_map(|(index, leg)| {
            let steps: Vec<RawStep> = leg.steps.iter().filter_map(convert_step).collect();
            let start_location = steps.first()?.start_location;
            let end_location = steps.last()?.end_location;
            Some(RawLeg {
                start_address: waypoint_names.get(index).cloned().unwrap_or_default(),
                end_address: waypoint_names.get(index + 1).cloned().unwrap_or_default(),
                start_location,
                end_location,
                distance: TextValue::new(leg.distance.round() as u64, ""),
                duration: TextValue::new(leg.duration.round() as u64, ""),
                steps,
            })
        })
        .collect();

    Some(RawRoute {
        bounds: RawBounds {
            northeast: bounds.northeast,
            southwest: bounds.southwest,
        },
        legs,
        overview_polyline: EncodedPolyline::new(route.geometry.clone()),
        summary: route.legs.iter().map(|leg| leg.summary.as_str()).collect::<Vec<_>>().join(", "),
        warnings: Vec::new(),
        waypoint_order: Vec::new(),
    })
}

/// Step endpoints come from the step geometry; steps without any are dropped.
fn convert_step(step: &OsrmStep) -> Option<RawStep> {
    let polyline = Polyline::decode(&step.geometry).ok()?;
    Some(RawStep {
        start_location: polyline.first()?,
        end_location: polyline.last()?,
        distance: TextValue::new(step.distance.round() as u64, ""),
        duration: TextValue::new(step.duration.round() as u64, ""),
        polyline: EncodedPolyline::new(step.geometry.clone()),
    })
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    distance: f64,
    duration: f64,
    geometry: String,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    #[serde(default)]
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(geometry: &str, distance: f64, duration: f64) -> OsrmStep {
        OsrmStep {
            distance,
            duration,
            geometry: geometry.to_string(),
        }
    }

    #[test]
    fn test_convert_step() {
        let raw = convert_step(&step("u{~vFvyys@fS]", 360.4, 20.6)).unwrap();
        assert_eq!(raw.start_location, Coordinate::new(40.63179, -8.65708));
        assert_eq!(raw.end_location, Coordinate::new(40.62855, -8.65693));
        assert_eq!(raw.distance.value, 360);
        assert_eq!(raw.duration.value, 21);

        assert!(convert_step(&step("", 0.0, 0.0)).is_none());
        assert!(convert_step(&step("_", 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_convert_route() {
        let route = OsrmRoute {
            geometry: "u{~vFvyys@fS]".to_string(),
            legs: vec![OsrmLeg {
                distance: 360.4,
                duration: 20.6,
                summary: "Rua".to_string(),
                steps: vec![step("u{~vFvyys@fS]", 360.4, 20.6)],
            }],
        };
        let names = vec!["Start".to_string(), "End".to_string()];
        let raw = convert_route(&route, &names).unwrap();

        assert_eq!(raw.legs.len(), 1);
        assert_eq!(raw.legs[0].start_address, "Start");
        assert_eq!(raw.legs[0].end_address, "End");
        assert_eq!(raw.legs[0].distance.value, 360);
        assert_eq!(raw.bounds.northeast, Coordinate::new(40.63179, -8.65693));
        assert_eq!(raw.bounds.southwest, Coordinate::new(40.62855, -8.65708));
        assert_eq!(raw.summary, "Rua");
    }

    #[test]
    fn test_leg_without_steps_is_dropped() {
        let leg = |steps| OsrmLeg {
            distance: 360.4,
            duration: 20.6,
            summary: String::new(),
            steps,
        };
        let route = OsrmRoute {
            geometry: "u{~vFvyys@fS]".to_string(),
            legs: vec![leg(Vec::new()), leg(vec![step("u{~vFvyys@fS]", 360.4, 20.6)])],
        };
        let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let raw = convert_route(&route, &names).unwrap();

        assert_eq!(raw.legs.len(), 1);
        assert_eq!(raw.legs[0].start_address, "B");
        assert_eq!(raw.legs[0].start_location, Coordinate::new(40.63179, -8.65708));
        assert_eq!(raw.legs[0].end_location, Coordinate::new(40.62855, -8.65693));
    }

    #[test]
    fn test_address_is_rejected() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let request = DirectionsRequest::new("Vannes", Coordinate::new(48.0, -4.0));
        assert!(matches!(client.directions(&request), Err(Error::UnsupportedLocation(_))));
    }
}
