//! Route geometry: stop points along a route and forward projection of a
//! moving position.
//!
//! All measurements on polylines are planar Euclidean distances on raw
//! latitude/longitude degrees. Step `distance` values stay authoritative;
//! polyline length is only used to split them proportionally, and every
//! distance handed back is floored to whole meters. Results are therefore
//! approximate by construction.

use tracing::trace;

use crate::coordinate::Coordinate;
use crate::polyline::Polyline;
use crate::route::{Route, Step, StopPoint};

/// How far ahead to project a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Meters along the route.
    Distance(u64),
    /// Travel for `time_secs` at `speed_mps`.
    Travel { time_secs: f64, speed_mps: f64 },
}

impl Advance {
    /// Whole meters to advance; travel is floored.
    pub fn meters(&self) -> u64 {
        match *self {
            Advance::Distance(meters) => meters,
            Advance::Travel { time_secs, speed_mps } => (time_secs * speed_mps).floor() as u64,
        }
    }
}

/// Result of [`locate_stop_points`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopPointScan {
    pub points: Vec<StopPoint>,
    /// Sum of the distances of every step scanned. A first-only scan stops
    /// early, so this covers the scanned prefix only.
    pub total_distance: u64,
    /// Distance since the last spacing boundary, reduced modulo the spacing.
    /// Valid as `start_offset` for a scan continuing on a following route.
    pub remainder: u64,
}

/// Result of [`get_point_on_route`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Projection {
    pub point: Option<StopPoint>,
    /// The route ended before the requested distance (or exactly at it).
    pub reached_end: bool,
}

/// Planar lengths between consecutive vertices and their sum.
pub fn sector_lengths(points: &[Coordinate]) -> (Vec<f64>, f64) {
    let sectors: Vec<f64> = points
        .windows(2)
        .map(|pair| pair[0].planar_distance(&pair[1]))
        .collect();
    let total = sectors.iter().sum();
    (sectors, total)
}

/// Index of the vertex nearest to `coordinate` and its planar distance.
///
/// Ties go to the earliest vertex. The index is `None` only for an empty
/// slice, in which case the distance is infinite.
pub fn locate_coordinate(points: &[Coordinate], coordinate: &Coordinate) -> (Option<usize>, f64) {
    let mut closest = None;
    let mut smallest = f64::INFINITY;

    for (index, point) in points.iter().enumerate() {
        let distance = coordinate.planar_distance(point);
        if distance < smallest {
            smallest = distance;
            closest = Some(index);
        }
    }

    (closest, smallest)
}

/// Index of the step whose polyline has the vertex nearest to `coordinate`.
///
/// Brute force over every vertex of every step; ties go to the earlier step.
pub fn locate_step(steps: &[Step], coordinate: &Coordinate) -> Option<usize> {
    let mut step_index = None;
    let mut smallest = f64::INFINITY;

    for (index, step) in steps.iter().enumerate() {
        let (vertex, distance) = locate_coordinate(step.polyline.points(), coordinate);
        if vertex.is_some() && distance < smallest {
            smallest = distance;
            step_index = Some(index);
        }
    }

    step_index
}

/// The part of `step` still ahead of the vertex nearest to `coordinate`.
///
/// Returns `None` when nothing remains: the nearest vertex is the last one,
/// or the step has no authoritative distance or no polyline length. The
/// remaining distance is the step distance scaled by the remaining share of
/// polyline length, floored. The partial step has no duration.
pub fn calculate_left_step(step: &Step, coordinate: &Coordinate) -> Option<Step> {
    let vertices = step.polyline.points();
    let (sectors, polyline_length) = sector_lengths(vertices);
    let (index, _) = locate_coordinate(vertices, coordinate);
    let index = index?;

    if index == vertices.len() - 1 || step.distance == 0 || polyline_length <= 0.0 {
        return None;
    }

    let remaining_length: f64 = sectors[index..].iter().sum();
    if remaining_length <= 0.0 {
        return None;
    }

    let distance = (step.distance as f64 / polyline_length * remaining_length) as u64;
    let remaining = vertices[index..].to_vec();
    trace!(index, distance, "partial step");

    Some(Step {
        start_location: remaining[0],
        end_location: remaining[remaining.len() - 1],
        distance,
        duration: None,
        polyline: Polyline::new(remaining),
    })
}

/// Points every `spacing` meters along `steps`, starting `start_offset`
/// meters into the first interval.
///
/// Boundaries are found on the authoritative distance scale, then placed on
/// the polyline at the same fraction of its planar length, snapped to the
/// first vertex past that fraction. That is the far end of the sector the
/// fraction falls in, one vertex later than the sector's start. A step that
/// should hold a boundary but yields no vertex for it contributes its end
/// location instead. With `only_first`, scanning stops after the first step
/// that produced points. A zero spacing yields no points.
pub fn locate_stop_points(steps: &[Step], spacing: u64, start_offset: u64, only_first: bool) -> StopPointScan {
    if spacing == 0 {
        return StopPointScan {
            points: Vec::new(),
            total_distance: steps.iter().map(|step| step.distance).sum(),
            remainder: 0,
        };
    }

    let mut points = Vec::new();
    let mut full_distance = 0u64;
    let mut distance = start_offset % spacing;

    for step in steps {
        distance += step.distance;
        full_distance += step.distance;

        if distance >= spacing {
            let (step_points, carried) = approximate_stop_points(step, distance, spacing, full_distance, only_first);
            points.extend(step_points);
            distance = carried;

            if only_first {
                break;
            }
        }
    }

    trace!(points = points.len(), full_distance, distance, "located stop points");

    StopPointScan {
        points,
        total_distance: full_distance,
        remainder: distance % spacing,
    }
}

/// Points inside one step. `distance` already includes the step; returns the
/// points and the distance carried past the last of them.
fn approximate_stop_points(
    step: &Step,
    distance: u64,
    spacing: u64,
    full_distance: u64,
    only_first: bool,
) -> (Vec<StopPoint>, u64) {
    let mut points = Vec::new();
    let mut carried = 0;
    let vertices = step.polyline.points();

    if step.distance > 0 && !vertices.is_empty() {
        let (sectors, polyline_length) = sector_lengths(vertices);
        let step_distance = step.distance as f64;
        let step_start = full_distance - step.distance;
        let before_step = distance as i64 - step.distance as i64;

        let mut percent = (spacing as i64 - before_step).abs() as f64 / step_distance;
        let percent_increment = spacing as f64 / step_distance;
        let mut threshold = percent * polyline_length;
        let threshold_increment = percent_increment * polyline_length;
        let mut walked = 0.0;

        for (index, sector) in sectors.iter().enumerate() {
            walked += sector;

            if walked > threshold {
                let point_distance = step_start + (percent * step_distance).floor() as u64;
                points.push(StopPoint::new(vertices[index + 1], point_distance));

                percent += percent_increment;
                threshold += threshold_increment;
                carried = full_distance.saturating_sub(point_distance);

                if only_first {
                    break;
                }
            }
        }
    }

    if points.is_empty() {
        points.push(StopPoint::new(step.end_location, full_distance));
    }

    (points, carried)
}

/// Where an object at `coordinate` will be after advancing along `route`.
///
/// The object is snapped to the nearest step vertex; whatever lies before it
/// is discarded rather than kept as an offset. When the route ends first,
/// the route's end is returned with the distance actually remaining and
/// `reached_end` set; landing exactly on the end counts as reaching it. A
/// zero advance is treated as one meter.
pub fn get_point_on_route(route: &Route, coordinate: &Coordinate, advance: Advance) -> Projection {
    let distance = advance.meters().max(1);

    let Some(step_index) = locate_step(&route.steps, coordinate) else {
        return Projection::default();
    };

    let mut left_steps = Vec::with_capacity(route.steps.len() - step_index);
    if let Some(left_step) = calculate_left_step(&route.steps[step_index], coordinate) {
        left_steps.push(left_step);
    }
    left_steps.extend_from_slice(&route.steps[step_index + 1..]);

    let remaining: u64 = left_steps.iter().map(|step| step.distance).sum();
    let scan = locate_stop_points(&left_steps, distance, 0, true);
    trace!(step_index, distance, remaining, "projected position");

    match scan.points.first() {
        Some(point) if point.distance < remaining => Projection {
            point: Some(*point),
            reached_end: false,
        },
        _ => Projection {
            point: Some(StopPoint::new(route.end_location, remaining)),
            reached_end: true,
        },
    }
}

impl Route {
    pub fn locate_stop_points(&self, spacing: u64, start_offset: u64, only_first: bool) -> StopPointScan {
        locate_stop_points(&self.steps, spacing, start_offset, only_first)
    }

    pub fn point_on_route(&self, coordinate: &Coordinate, advance: Advance) -> Projection {
        get_point_on_route(self, coordinate, advance)
    }
}
