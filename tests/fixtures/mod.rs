//! Test fixtures for trip-planner.
//!
//! Provides a realistic two-leg drive across Brittany (Vannes to Brest via
//! Lorient) in the raw directions shape, plus helpers around it.

#![allow(dead_code)]

use serde_json::{json, Value};

use trip_planner::directions::DirectionsResponse;
use trip_planner::format::Units;
use trip_planner::route::{build_routes, Route};
use trip_planner::Coordinate;

pub const VANNES: Coordinate = Coordinate::new(47.66074, -2.97143);
pub const LORIENT: Coordinate = Coordinate::new(47.74512, -3.36201);
pub const QUIMPERLE: Coordinate = Coordinate::new(47.87655, -3.72345);
pub const BREST: Coordinate = Coordinate::new(48.3876, -4.45909);

/// (start, end, distance m, duration s, encoded polyline) per step.
pub const STEPS: [((f64, f64), (f64, f64), u64, u64, &str); 5] = [
    ((47.66074, -2.97143), (47.74512, -3.36201), 33169, 1382, "sv{aHljcQkjAzuKwmAxuKqsAzuKgzAzuKa`BxuKkcBzuK"),
    ((47.74512, -3.36201), (47.87655, -3.72345), 33160, 1381, "_flbHpsoSmtCnwJ_qCnwJgkCnwJqdCnwJy~BnwJk{BnwJ"),
    ((47.87655, -3.72345), (47.9971, -4.10234), 33761, 1406, "m{ecHpfvUapBtiKmsBtiKgyBriK{_CtiKweCtiKaiCtiK"),
    ((47.9971, -4.10234), (48.20543, -4.30121), 29674, 1236, "{l}cHrf`XodFdnEeaFbnEi{EbnEutEdnE{nEbnEokEdnE"),
    ((48.20543, -4.30121), (48.3876, -4.45909), 25258, 1052, "}bfeHpagYgpDlcDssDncDmyDlcDa`ElcD}eEncDgiElcD"),
];

pub const OVERVIEW: &str = "sv{aHljcQkjAzuKwmAxuKqsAzuKgzAzuKa`BxuKkcBzuKmtCnwJ_qCnwJgkCnwJqdCnwJy~BnwJk{BnwJapBtiKmsBtiKgyBriK{_CtiKweCtiKaiCtiKodFdnEeaFbnEi{EbnEutEdnE{nEbnEokEdnEgpDlcDssDncDmyDlcDa`ElcD}eEncDgiElcD";

pub const TOTAL_DISTANCE: u64 = 155_022;
pub const TOTAL_DURATION: u64 = 6457;

fn latlng((lat, lng): (f64, f64)) -> Value {
    json!({ "lat": lat, "lng": lng })
}

fn step_json(index: usize) -> Value {
    let (start, end, distance, duration, points) = STEPS[index];
    json!({
        "start_location": latlng(start),
        "end_location": latlng(end),
        "distance": { "value": distance, "text": "" },
        "duration": { "value": duration, "text": "" },
        "polyline": { "points": points },
        "travel_mode": "DRIVING",
    })
}

fn leg_json(start_address: &str, end_address: &str, steps: std::ops::Range<usize>) -> Value {
    let distance: u64 = STEPS[steps.clone()].iter().map(|s| s.2).sum();
    let duration: u64 = STEPS[steps.clone()].iter().map(|s| s.3).sum();
    json!({
        "start_address": start_address,
        "end_address": end_address,
        "start_location": latlng(STEPS[steps.start].0),
        "end_location": latlng(STEPS[steps.end - 1].1),
        "distance": { "value": distance, "text": format!("{} km", distance / 1000) },
        "duration": { "value": duration, "text": "provider" },
        "steps": steps.map(step_json).collect::<Vec<_>>(),
    })
}

/// The raw provider JSON for the Brittany drive.
pub fn brittany_json() -> Value {
    json!({
        "routes": [{
            "bounds": {
                "northeast": { "lat": 48.3876, "lng": -2.97143 },
                "southwest": { "lat": 47.66074, "lng": -4.45909 },
            },
            "copyrights": "Map data",
            "legs": [
                leg_json("Vannes, France", "Lorient, France", 0..2),
                leg_json("Lorient, France", "Brest, France", 2..5),
            ],
            "overview_polyline": { "points": OVERVIEW },
            "summary": "N165",
            "warnings": [],
            "waypoint_order": [0],
        }],
        "status": "OK",
    })
}

pub fn brittany_response() -> DirectionsResponse {
    serde_json::from_value(brittany_json()).expect("fixture deserializes")
}

pub fn brittany_route() -> Route {
    build_routes(&brittany_response(), &Units::default())
        .into_iter()
        .next()
        .expect("fixture has a route")
}

/// A one-leg, one-step response of the given length.
pub fn short_hop(from: Coordinate, to: Coordinate, distance: u64) -> DirectionsResponse {
    let polyline = trip_planner::polyline::Polyline::new(vec![from, to]).encode();
    serde_json::from_value(json!({
        "routes": [{
            "bounds": { "northeast": latlng((from.lat, from.lng)), "southwest": latlng((to.lat, to.lng)) },
            "legs": [{
                "start_location": latlng((from.lat, from.lng)),
                "end_location": latlng((to.lat, to.lng)),
                "distance": { "value": distance, "text": format!("{} m", distance) },
                "duration": { "value": distance / 10, "text": "" },
                "steps": [{
                    "start_location": latlng((from.lat, from.lng)),
                    "end_location": latlng((to.lat, to.lng)),
                    "distance": { "value": distance },
                    "duration": { "value": distance / 10 },
                    "polyline": { "points": polyline },
                }],
            }],
            "overview_polyline": { "points": polyline },
            "summary": "",
        }],
    }))
    .expect("short hop deserializes")
}
