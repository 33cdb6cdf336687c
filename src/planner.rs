//! Trip planning on top of remote directions and places services.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::coordinate::{Coordinate, Location};
use crate::directions::DirectionsRequest;
use crate::error::{Error, Result};
use crate::format::{convert_seconds_to_duration_text, Units};
use crate::geometry::{Advance, Projection};
use crate::google::{GoogleClient, GoogleConfig};
use crate::places::{refine, Place};
use crate::route::{build_routes, Route, RouteOverview, StopPoint};
use crate::traits::{DirectionsProvider, PlacesProvider};

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Default distance between stop points in meters.
    pub stop_spacing_m: u64,
    /// Average speed used to turn driving hours into a spacing.
    pub cruising_speed_mps: f64,
    /// Search radius around each stop point.
    pub stop_search_radius_m: u32,
    /// Search radius around the route's start and end.
    pub endpoint_search_radius_m: u32,
    /// Places kept per search location group.
    pub max_places: usize,
    pub max_price_level: u8,
    /// Time spent at each stop.
    pub rest_duration_secs: u64,
    pub cafe_type: String,
    pub parking_type: String,
    pub units: Units,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            stop_spacing_m: 50_000,
            cruising_speed_mps: 23.61, // ~85 km/h
            stop_search_radius_m: 20_000,
            endpoint_search_radius_m: 2_000,
            max_places: 3,
            max_price_level: 2,
            rest_duration_secs: 3600,
            cafe_type: "cafe".to_string(),
            parking_type: "parking".to_string(),
            units: Units::default(),
        }
    }
}

impl PlannerConfig {
    /// Meters covered in `hours` at cruising speed.
    pub fn spacing_for_hours(&self, hours: f64) -> u64 {
        (self.cruising_speed_mps * hours * self.units.seconds_in_hour as f64).floor() as u64
    }
}

/// Distance and duration of the first leg of the best route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TravelEstimate {
    pub distance: u64,
    pub distance_text: String,
    pub duration: u64,
    pub duration_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPlan {
    pub route: RouteOverview,
    pub stop_points: Vec<StopPoint>,
    pub cafes: Vec<Place>,
    pub parkings: Vec<Place>,
    pub driving_duration: u64,
    pub rest_duration: u64,
    pub total_duration: u64,
    pub driving_duration_text: String,
    pub rest_duration_text: String,
    pub total_duration_text: String,
}

pub struct TripPlanner<D, P> {
    directions: D,
    places: P,
    config: PlannerConfig,
}

impl TripPlanner<GoogleClient, GoogleClient> {
    /// Planner using Google for both directions and places.
    pub fn google(google: GoogleConfig, config: PlannerConfig) -> Result<Self> {
        let client = GoogleClient::new(google)?;
        Ok(Self::new(client.clone(), client, config))
    }
}

impl<D, P> TripPlanner<D, P>
where
    D: DirectionsProvider + Sync,
    P: PlacesProvider + Sync,
{
    pub fn new(directions: D, places: P, config: PlannerConfig) -> Self {
        Self {
            directions,
            places,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Every route the provider offers; empty when there is none.
    pub fn routes(&self, request: &DirectionsRequest) -> Result<Vec<Route>> {
        info!(origin = %request.origin, destination = %request.destination, "requesting routes");
        let response = self.directions.directions(request)?;
        Ok(build_routes(&response, &self.config.units))
    }

    /// Light version of [`routes`](Self::routes) reporting only the first leg.
    pub fn duration_and_distance(&self, origin: &Location, destination: &Location) -> Result<Option<TravelEstimate>> {
        let request = DirectionsRequest::new(origin.clone(), destination.clone());
        let response = self.directions.directions(&request)?;

        let estimate = response
            .routes
            .first()
            .and_then(|route| route.legs.first())
            .map(|leg| TravelEstimate {
                distance: leg.distance.value,
                distance_text: leg.distance.text.clone(),
                duration: leg.duration.value,
                duration_text: leg.duration.text.clone(),
            });
        Ok(estimate)
    }

    /// Stop points along `route`, `spacing` meters apart (the configured
    /// default when `None`), for a driver who already covered `traveled`.
    pub fn stop_points(&self, route: &Route, spacing: Option<u64>, traveled: u64, only_first: bool) -> Vec<StopPoint> {
        let spacing = spacing.unwrap_or(self.config.stop_spacing_m);
        route.locate_stop_points(spacing, traveled, only_first).points
    }

    pub fn point_on_route(&self, route: &Route, coordinate: &Coordinate, advance: Advance) -> Projection {
        route.point_on_route(coordinate, advance)
    }

    /// Places of the given types within `radius_m` of `center`, with driving
    /// distances from `center` filled in.
    pub fn nearby_places(&self, center: Coordinate, radius_m: u32, place_types: &[&str]) -> Result<Vec<Place>> {
        let mut found = Vec::new();
        for place_type in place_types {
            let raw = self.places.places_nearby(center, radius_m, place_type)?;
            found.extend(raw.into_iter().filter_map(Place::from_raw));
        }

        let refined = refine(&center, radius_m, self.config.max_price_level, found);
        let origin = Location::Coordinate(center);

        refined
            .into_par_iter()
            .map(|mut place| -> Result<Place> {
                let destination = Location::Coordinate(place.location);
                place.distance = self
                    .duration_and_distance(&origin, &destination)?
                    .map(|estimate| estimate.distance);
                Ok(place)
            })
            .collect()
    }

    /// Plans a drive with a rest stop roughly every `drive_hours` of driving.
    ///
    /// Returns `None` when there is no route between the locations.
    pub fn plan_trip(&self, origin: Location, destination: Location, drive_hours: f64) -> Result<Option<TripPlan>> {
        let spacing = self.config.spacing_for_hours(drive_hours);
        if spacing == 0 {
            return Err(Error::InvalidSpacing);
        }

        let request = DirectionsRequest::new(origin, destination);
        let Some(route) = self.routes(&request)?.into_iter().next() else {
            info!("no route found");
            return Ok(None);
        };

        let stop_points = route.locate_stop_points(spacing, 0, false).points;
        debug!(spacing, stops = stop_points.len(), "located stop points");

        let cafes = self.places_along(&route, &stop_points, &self.config.cafe_type)?;
        let parkings = self.places_along(&route, &stop_points, &self.config.parking_type)?;

        let units = &self.config.units;
        let driving_duration = route.duration;
        let rest_duration = stop_points.len() as u64 * self.config.rest_duration_secs;
        let total_duration = driving_duration + rest_duration;

        Ok(Some(TripPlan {
            route: route.overview(),
            stop_points,
            cafes,
            parkings,
            driving_duration,
            rest_duration,
            total_duration,
            driving_duration_text: convert_seconds_to_duration_text(driving_duration, units),
            rest_duration_text: convert_seconds_to_duration_text(rest_duration, units),
            total_duration_text: convert_seconds_to_duration_text(total_duration, units),
        }))
    }

    /// Places of one type near the stop points, then near the start, then
    /// near the end; each group capped at `max_places`.
    fn places_along(&self, route: &Route, stop_points: &[StopPoint], place_type: &str) -> Result<Vec<Place>> {
        let max_places = self.config.max_places;

        let per_stop = stop_points
            .par_iter()
            .map(|point| self.nearby_places(point.location(), self.config.stop_search_radius_m, &[place_type]))
            .collect::<Result<Vec<_>>>()?;
        let mut places: Vec<Place> = per_stop.into_iter().flatten().take(max_places).collect();

        for endpoint in [route.start_location, route.end_location] {
            let near = self.nearby_places(endpoint, self.config.endpoint_search_radius_m, &[place_type])?;
            places.extend(near.into_iter().take(max_places));
        }

        Ok(places)
    }
}
