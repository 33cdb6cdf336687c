//! trip-planner: rest stops along long drives
//!
//! Builds routes from a directions provider, places stop points along them at
//! a fixed spacing and projects a moving position forward along a route.

pub mod coordinate;
pub mod directions;
pub mod error;
pub mod format;
pub mod geometry;
pub mod google;
pub mod haversine;
pub mod osrm;
pub mod places;
pub mod planner;
pub mod polyline;
pub mod route;
pub mod traits;

pub use coordinate::{Coordinate, Location};
pub use error::{Error, Result};
pub use geometry::{Advance, Projection, StopPointScan};
pub use route::{Route, Step, StopPoint};
