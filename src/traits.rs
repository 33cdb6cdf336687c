//! Seams to the remote services the planner depends on.
//!
//! Implementations are expected to block; the planner may call them from
//! several threads at once.

use crate::coordinate::Coordinate;
use crate::directions::{DirectionsRequest, DirectionsResponse};
use crate::error::Result;
use crate::places::RawPlace;

/// Provides raw multi-leg directions between locations.
///
/// An unroutable request is an empty response, not an error.
pub trait DirectionsProvider {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse>;
}

/// Provides points of interest of one type around a coordinate.
pub trait PlacesProvider {
    fn places_nearby(&self, location: Coordinate, radius_m: u32, place_type: &str) -> Result<Vec<RawPlace>>;
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for &T {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse> {
        (**self).directions(request)
    }
}

impl<T: PlacesProvider + ?Sized> PlacesProvider for &T {
    fn places_nearby(&self, location: Coordinate, radius_m: u32, place_type: &str) -> Result<Vec<RawPlace>> {
        (**self).places_nearby(location, radius_m, place_type)
    }
}
