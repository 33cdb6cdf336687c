//! Runs the OSRM adapter against a real `osrm-routed` in docker.
//!
//! Expects an MLD-prepared extract in `OSRM_DATA_DIR` (default `osrm-data`),
//! named by `OSRM_DATASET` (default `bretagne-latest.osrm`).

use std::env;
use std::time::{Duration, Instant};

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use trip_planner::directions::{DirectionsRequest, DirectionsResponse};
use trip_planner::format::Units;
use trip_planner::osrm::{OsrmClient, OsrmConfig};
use trip_planner::route::build_routes;
use trip_planner::traits::DirectionsProvider;
use trip_planner::Coordinate;

const VANNES: Coordinate = Coordinate::new(47.6582, -2.7608);
const LORIENT: Coordinate = Coordinate::new(47.7482, -3.3702);
const QUIMPER: Coordinate = Coordinate::new(47.9960, -4.1024);

fn osrm_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let data_dir = env::var("OSRM_DATA_DIR").unwrap_or_else(|_| "osrm-data".to_string());
    let dataset = env::var("OSRM_DATASET").unwrap_or_else(|_| "bretagne-latest.osrm".to_string());
    let data_dir = std::fs::canonicalize(&data_dir)
        .map_err(|err| TestcontainersError::other(format!("missing OSRM data in {}: {}", data_dir, err)))?;

    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(data_dir.to_string_lossy().to_string(), "/data"))
        .with_cmd(vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            "mld".to_string(),
            format!("/data/{}", dataset),
        ])
        .with_container_name("trip-planner-osrm")
        .with_startup_timeout(Duration::from_secs(30))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    Ok((container, format!("http://127.0.0.1:{}", port)))
}

/// The server may accept connections before the dataset is loaded.
fn directions_with_retry(client: &OsrmClient, request: &DirectionsRequest) -> DirectionsResponse {
    let start = Instant::now();
    loop {
        match client.directions(request) {
            Ok(response) if !response.routes.is_empty() => return response,
            Ok(response) if start.elapsed() > Duration::from_secs(15) => return response,
            Err(err) if start.elapsed() > Duration::from_secs(15) => panic!("OSRM request failed: {}", err),
            _ => std::thread::sleep(Duration::from_millis(500)),
        }
    }
}

#[test]
#[ignore = "requires docker and a prepared OSRM dataset"]
fn osrm_route_yields_stop_points() {
    let (container, base_url) = osrm_container().expect("start OSRM container");
    let client = OsrmClient::new(OsrmConfig {
        base_url,
        ..OsrmConfig::default()
    })
    .expect("build OSRM client");

    let request = DirectionsRequest::new(VANNES, QUIMPER).waypoints(vec![LORIENT.into()]);
    let response = directions_with_retry(&client, &request);
    let routes = build_routes(&response, &Units::default());
    assert!(!routes.is_empty(), "no route between Vannes and Quimper");

    let route = &routes[0];
    assert!(route.steps.len() > 2);
    assert_eq!(route.distance, route.steps.iter().map(|s| s.distance).sum::<u64>());
    // Roughly 115 km by road.
    assert!((90_000..150_000).contains(&route.distance), "distance {}", route.distance);

    let scan = route.locate_stop_points(30_000, 0, false);
    assert!(!scan.points.is_empty());
    for pair in scan.points.windows(2) {
        assert!(pair[0].distance < pair[1].distance);
    }

    drop(container);
}
