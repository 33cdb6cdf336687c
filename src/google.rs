//! Google Maps web service adapter for directions and nearby places.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::coordinate::{Coordinate, Location};
use crate::directions::{DirectionsRequest, DirectionsResponse, RawRoute, TravelMode};
use crate::error::{Error, Result};
use crate::places::RawPlace;
use crate::traits::{DirectionsProvider, PlacesProvider};

/// Environment variable holding the API key for [`GoogleConfig::from_env`].
pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: String,
    pub base_url: String,
    /// Region bias as a ccTLD code.
    pub region: String,
    pub mode: TravelMode,
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            region: "NL".to_string(),
            mode: TravelMode::Driving,
            timeout_secs: 10,
        }
    }
}

impl GoogleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Defaults with the key taken from `GOOGLE_MAPS_API_KEY`, if set.
    pub fn from_env() -> Option<Self> {
        std::env::var(API_KEY_VAR).ok().map(Self::new)
    }
}

#[derive(Debug, Clone)]
pub struct GoogleClient {
    config: GoogleConfig,
    client: reqwest::blocking::Client,
}

impl GoogleClient {
    pub fn new(config: GoogleConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}/json", self.config.base_url, endpoint);
        let body = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", self.config.api_key.as_str())])
            .send()?
            .error_for_status()?
            .json::<T>()?;
        Ok(body)
    }
}

impl DirectionsProvider for GoogleClient {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse> {
        let mut query = vec![
            ("origin", request.origin.to_string()),
            ("destination", request.destination.to_string()),
            ("mode", self.config.mode.as_str().to_string()),
            ("region", self.config.region.clone()),
        ];
        if request.alternatives {
            query.push(("alternatives", "true".to_string()));
        }
        if !request.waypoints.is_empty() {
            let waypoints = request
                .waypoints
                .iter()
                .map(Location::to_string)
                .collect::<Vec<_>>()
                .join("|");
            query.push(("waypoints", waypoints));
        }

        let body: GoogleDirectionsBody = self.get("directions", &query)?;
        check_status(&body.status, body.error_message)?;
        debug!(routes = body.routes.len(), status = %body.status, "directions response");

        Ok(DirectionsResponse { routes: body.routes })
    }
}

impl PlacesProvider for GoogleClient {
    fn places_nearby(&self, location: Coordinate, radius_m: u32, place_type: &str) -> Result<Vec<RawPlace>> {
        let query = [
            ("location", location.to_string()),
            ("radius", radius_m.to_string()),
            ("type", place_type.to_string()),
        ];

        let body: GooglePlacesBody = self.get("place/nearbysearch", &query)?;
        check_status(&body.status, body.error_message)?;
        debug!(results = body.results.len(), place_type, "places response");

        Ok(body.results)
    }
}

/// `ZERO_RESULTS` and `NOT_FOUND` mean "nothing", every other non-OK status fails.
fn check_status(status: &str, message: Option<String>) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" | "NOT_FOUND" => Ok(()),
        _ => Err(Error::Provider {
            status: status.to_string(),
            message: message.unwrap_or_default(),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct GoogleDirectionsBody {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct GooglePlacesBody {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<RawPlace>,
}
