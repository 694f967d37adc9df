//! User facing text.

use crate::Waypoint;

pub const START_ROUTE_BUTTON: &str = "🚴 Start route";
pub const NEXT_POINT_BUTTON: &str = "✨ Next point";
pub const SHOW_PROFILE_BUTTON: &str = "➡️ Show route profile";

pub const START_PROMPT: &str = "Enter the coordinates of the start point as latitude, longitude \
                                (example: 55.115923, 82.970700)";

pub const NEXT_PROMPT: &str = "Enter the coordinates of the next point as latitude, longitude \
                               (example: 55.115923, 82.970700)";

pub const INVALID_COORDINATE: &str = "Invalid coordinate input, please try again.";

/// Returns the "start a route first" hint.
pub fn route_not_started() -> String {
    format!("Start a route first with {START_ROUTE_BUTTON}.")
}

/// Returns the confirmation for a route's first waypoint.
pub fn start_point(waypoint: &Waypoint) -> String {
    format!(
        "Start point set!\nLatitude: {}\nLongitude: {}\nElevation: {:.2} m\nElevation delta: {:.2} m",
        waypoint.coordinate.latitude(),
        waypoint.coordinate.longitude(),
        waypoint.elevation_m,
        waypoint.delta_m,
    )
}

/// Returns the confirmation for any waypoint after the first.
pub fn next_point(waypoint: &Waypoint) -> String {
    format!(
        "Current point elevation: {:.2} m\nElevation delta: {:.2} m",
        waypoint.elevation_m, waypoint.delta_m,
    )
}

/// Renders `waypoints` as a numbered list, or the "not started"
/// message when there are none.
pub fn profile(waypoints: &[Waypoint]) -> String {
    if waypoints.is_empty() {
        return format!("Route not started yet. Use {START_ROUTE_BUTTON}.");
    }
    let lines: Vec<String> = waypoints
        .iter()
        .enumerate()
        .map(|(i, waypoint)| {
            format!(
                "{}. Elevation: {:.2} m, elevation delta: {:.2} m",
                i + 1,
                waypoint.elevation_m,
                waypoint.delta_m
            )
        })
        .collect();
    format!("Route profile:\n{}", lines.join("\n"))
}
