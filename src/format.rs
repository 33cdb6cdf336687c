//! Human-readable distance and duration text.
//!
//! Text is always derived from numeric totals, never copied from a provider,
//! because truncated routes have totals no provider ever reported.

/// Unit conversions used when rendering text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Units {
    pub meters_in_kilometer: u64,
    pub seconds_in_hour: u64,
    pub seconds_in_minute: u64,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            meters_in_kilometer: 1000,
            seconds_in_hour: 3600,
            seconds_in_minute: 60,
        }
    }
}

/// Renders e.g. `"2 hours"`, `"1 hour 30 mins"`, `"1 min"` or `"0 mins"`.
///
/// Seconds below a whole minute are dropped.
pub fn convert_seconds_to_duration_text(seconds: u64, units: &Units) -> String {
    let hours = seconds / units.seconds_in_hour;
    let minutes = seconds % units.seconds_in_hour / units.seconds_in_minute;

    if hours == 0 && minutes == 0 {
        return "0 mins".to_string();
    }

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(pluralize(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(pluralize(minutes, "min"));
    }
    parts.join(" ")
}

/// Renders `"98 m"` below 99 meters, `"1.5 km"` below 100 km and `"150 km"` above.
///
/// Whole kilometers are truncated, not rounded.
pub fn convert_meters_to_distance_text(meters: u64, units: &Units) -> String {
    if meters < 99 {
        return format!("{} m", meters);
    }

    let kilometers = meters / units.meters_in_kilometer;
    if kilometers < 100 {
        format!("{:.1} km", meters as f64 / units.meters_in_kilometer as f64)
    } else {
        format!("{} km", kilometers)
    }
}

fn pluralize(quantity: u64, unit: &str) -> String {
    if quantity > 1 {
        format!("{} {}s", quantity, unit)
    } else {
        format!("{} {}", quantity, unit)
    }
}
