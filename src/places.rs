//! Points of interest near a route: cafes, parkings and the like.
//!
//! The planner only uses [`refine`]; [`shortlist`] is for callers that want
//! the nearest few of an already measured list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::haversine::haversine_meters;

/// A place as returned by a places provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<PlaceGeometry>,
    #[serde(default)]
    pub price_level: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceGeometry {
    pub location: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub rating: Option<f64>,
    /// Short address.
    pub vicinity: Option<String>,
    pub location: Coordinate,
    /// Driving distance in meters from the point the search was centered on.
    pub distance: Option<u64>,
    pub price_level: Option<u8>,
}

impl Place {
    /// Places without a location cannot be shown and are dropped.
    pub fn from_raw(raw: RawPlace) -> Option<Self> {
        let location = raw.geometry?.location;
        Some(Self {
            name: raw.name.unwrap_or_else(|| "No name".to_string()),
            rating: raw.rating,
            vicinity: raw.vicinity,
            location,
            distance: None,
            price_level: raw.price_level,
        })
    }
}

/// Filters search results around `center`.
///
/// Duplicates (same name and location) keep the position of the first
/// occurrence and the values of the last. Places farther than `radius_m` by
/// great-circle distance are dropped, as are places priced above
/// `max_price_level`; places without a price level are kept.
pub fn refine(center: &Coordinate, radius_m: u32, max_price_level: u8, places: Vec<Place>) -> Vec<Place> {
    let mut positions: HashMap<(String, u64, u64), usize> = HashMap::new();
    let mut unique: Vec<Place> = Vec::with_capacity(places.len());

    for place in places {
        let key = (place.name.clone(), place.location.lat.to_bits(), place.location.lng.to_bits());
        match positions.get(&key) {
            Some(&index) => unique[index] = place,
            None => {
                positions.insert(key, unique.len());
                unique.push(place);
            }
        }
    }

    unique
        .into_iter()
        .filter(|place| haversine_meters(center, &place.location) <= f64::from(radius_m))
        .filter(|place| place.price_level.is_none_or(|level| level <= max_price_level))
        .collect()
}

/// The `count` closest places; places of unknown distance sort last.
pub fn shortlist(places: &[Place], count: usize) -> Vec<Place> {
    let mut sorted = places.to_vec();
    sorted.sort_by_key(|place| place.distance.unwrap_or(u64::MAX));
    sorted.truncate(count);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, lat: f64, lng: f64, distance: Option<u64>, price_level: Option<u8>) -> Place {
        Place {
            name: name.to_string(),
            rating: None,
            vicinity: None,
            location: Coordinate::new(lat, lng),
            distance,
            price_level,
        }
    }

    #[test]
    fn test_from_raw() {
        let raw = RawPlace {
            name: None,
            rating: Some(4.5),
            vicinity: Some("Quai".to_string()),
            geometry: Some(PlaceGeometry {
                location: Coordinate::new(48.0, -3.0),
            }),
            price_level: Some(1),
        };
        let place = Place::from_raw(raw).unwrap();
        assert_eq!(place.name, "No name");
        assert_eq!(place.location, Coordinate::new(48.0, -3.0));
        assert_eq!(place.distance, None);

        assert_eq!(Place::from_raw(RawPlace::default()), None);
    }

    #[test]
    fn test_refine_deduplicates() {
        let center = Coordinate::new(48.0, -3.0);
        let places = vec![
            place("Cafe", 48.0, -3.0, Some(10), None),
            place("Bar", 48.001, -3.0, Some(20), None),
            place("Cafe", 48.0, -3.0, Some(30), None),
        ];
        let refined = refine(&center, 1000, 2, places);
        assert_eq!(refined.len(), 2);
        assert_eq!(refined[0].name, "Cafe");
        assert_eq!(refined[0].distance, Some(30));
        assert_eq!(refined[1].name, "Bar");
    }

    #[test]
    fn test_refine_drops_far_and_expensive() {
        let center = Coordinate::new(48.0, -3.0);
        let places = vec![
            place("Near", 48.1, -3.0, None, Some(2)),
            place("Far", 48.3, -3.0, None, None),
            place("Pricey", 48.0, -3.0, None, Some(3)),
            place("Unpriced", 48.0, -3.0, None, None),
        ];
        let names: Vec<String> = refine(&center, 20_000, 2, places).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Near".to_string(), "Unpriced".to_string()]);
    }

    #[test]
    fn test_shortlist() {
        let places = vec![
            place("C", 0.0, 0.0, Some(300), None),
            place("Unknown", 0.0, 0.0, None, None),
            place("A", 0.0, 0.0, Some(100), None),
            place("B", 0.0, 0.0, Some(200), None),
        ];
        let names: Vec<String> = shortlist(&places, 3).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
        assert_eq!(shortlist(&places, 10).len(), 4);
    }
}
