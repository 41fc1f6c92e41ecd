//! Conversion from Directions API DTOs to route steps.

use crate::domain::{Coordinate, RouteStep, StepMode};

use super::types::{LatLng, Route, Step};

impl From<LatLng> for Coordinate {
    fn from(p: LatLng) -> Self {
        Coordinate::new(p.lat, p.lng)
    }
}

/// Flatten a route into steps, pinning the first and last step to the
/// requested endpoints.
pub fn convert_route(route: &Route, origin: Coordinate, destination: Coordinate) -> Vec<RouteStep> {
    let mut steps: Vec<RouteStep> = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .map(convert_step)
        .collect();

    if let Some(first) = steps.first_mut() {
        first.from_coord = origin;
    }
    if let Some(last) = steps.last_mut() {
        last.to_coord = destination;
    }
    steps
}

/// Convert a single provider step.
pub fn convert_step(step: &Step) -> RouteStep {
    let duration = step.duration.value;
    let distance = step.distance.value;
    let km = distance / 1000.0;
    let mins = duration / 60.0;

    let mut from = Coordinate::from(step.start_location);
    let mut to = Coordinate::from(step.end_location);

    let (mode, description) = match step.travel_mode.as_str() {
        "WALKING" => (
            StepMode::Walk,
            format!(
                "Walk {km:.1} km ({mins:.0} min) - {}",
                strip_html_tags(&step.html_instructions)
            ),
        ),
        "TRANSIT" => match &step.transit_details {
            Some(td) => {
                let vehicle = if td.line.vehicle.name.is_empty() {
                    "Transit"
                } else {
                    td.line.vehicle.name.as_str()
                };
                let line = if td.line.short_name.is_empty() {
                    td.line.name.clone()
                } else {
                    format!("{} ({})", td.line.short_name, td.line.name)
                };
                // Stop positions are more precise than the step endpoints.
                from = td.departure_stop.location.into();
                to = td.arrival_stop.location.into();
                (
                    StepMode::Transit,
                    format!(
                        "{vehicle}: {line} from {} to {} ({} stops, {mins:.0} min)",
                        td.departure_stop.name, td.arrival_stop.name, td.num_stops
                    ),
                )
            }
            None => (
                StepMode::Transit,
                format!("Transit ({km:.1} km, {mins:.0} min)"),
            ),
        },
        "DRIVING" => (StepMode::Car, format!("Drive {km:.1} km ({mins:.0} min)")),
        "BICYCLING" => (StepMode::Bike, format!("Bike {km:.1} km ({mins:.0} min)")),
        other => (
            StepMode::Other(other.to_lowercase()),
            format!("{other} ({km:.1} km, {mins:.0} min)"),
        ),
    };

    let converted = RouteStep::new(mode, from, to, duration, distance, description);
    match &step.polyline {
        Some(p) if !p.points.is_empty() => converted.with_polyline(p.points.clone()),
        _ => converted,
    }
}

/// Remove markup from instruction text and collapse whitespace.
pub fn strip_html_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::types::*;

    fn step(mode: &str, secs: f64, meters: f64) -> Step {
        Step {
            travel_mode: mode.to_string(),
            duration: TextValue {
                value: secs,
                text: String::new(),
            },
            distance: TextValue {
                value: meters,
                text: String::new(),
            },
            start_location: LatLng { lat: 1.0, lng: 2.0 },
            end_location: LatLng { lat: 3.0, lng: 4.0 },
            ..Step::default()
        }
    }

    #[test]
    fn walking_step() {
        let mut s = step("WALKING", 420.0, 550.0);
        s.html_instructions = "Walk to <b>Berri-UQAM</b>&nbsp;station".into();
        let converted = convert_step(&s);

        assert_eq!(converted.mode, StepMode::Walk);
        assert_eq!(converted.description, "Walk 0.6 km (7 min) - Walk to Berri-UQAM station");
        assert_eq!(converted.from_coord, Coordinate::new(1.0, 2.0));
        assert_eq!(converted.duration_sec, 420.0);
    }

    #[test]
    fn transit_step_uses_stop_locations() {
        let mut s = step("TRANSIT", 600.0, 5000.0);
        s.transit_details = Some(TransitDetails {
            departure_stop: TransitStopRef {
                name: "Berri-UQAM".into(),
                location: LatLng { lat: 45.515, lng: -73.561 },
            },
            arrival_stop: TransitStopRef {
                name: "Jean-Talon".into(),
                location: LatLng { lat: 45.539, lng: -73.614 },
            },
            line: TransitLine {
                name: "Orange".into(),
                short_name: "2".into(),
                vehicle: Vehicle {
                    name: "Subway".into(),
                    kind: "SUBWAY".into(),
                },
            },
            num_stops: 7,
            headsign: None,
        });
        let converted = convert_step(&s);

        assert_eq!(converted.mode, StepMode::Transit);
        assert_eq!(
            converted.description,
            "Subway: 2 (Orange) from Berri-UQAM to Jean-Talon (7 stops, 10 min)"
        );
        assert_eq!(converted.from_coord, Coordinate::new(45.515, -73.561));
        assert_eq!(converted.to_coord, Coordinate::new(45.539, -73.614));
    }

    #[test]
    fn transit_without_details() {
        let converted = convert_step(&step("TRANSIT", 900.0, 7500.0));
        assert_eq!(converted.mode, StepMode::Transit);
        assert_eq!(converted.description, "Transit (7.5 km, 15 min)");
    }

    #[test]
    fn transit_vehicle_defaults() {
        let mut s = step("TRANSIT", 300.0, 2000.0);
        s.transit_details = Some(TransitDetails {
            line: TransitLine {
                name: "24".into(),
                ..TransitLine::default()
            },
            num_stops: 3,
            ..TransitDetails::default()
        });
        let converted = convert_step(&s);
        assert!(converted.description.starts_with("Transit: 24 from"));
    }

    #[test]
    fn driving_and_unknown_modes() {
        let converted = convert_step(&step("DRIVING", 1200.0, 15_000.0));
        assert_eq!(converted.mode, StepMode::Car);
        assert_eq!(converted.description, "Drive 15.0 km (20 min)");

        let converted = convert_step(&step("FERRY", 600.0, 3000.0));
        assert_eq!(converted.mode, StepMode::Other("ferry".into()));
        assert_eq!(converted.description, "FERRY (3.0 km, 10 min)");
    }

    #[test]
    fn route_endpoints_are_pinned() {
        let route = Route {
            legs: vec![Leg {
                steps: vec![step("WALKING", 60.0, 80.0), step("DRIVING", 60.0, 800.0)],
                ..Leg::default()
            }],
            ..Route::default()
        };
        let origin = Coordinate::new(10.0, 10.0);
        let dest = Coordinate::new(20.0, 20.0);
        let steps = convert_route(&route, origin, dest);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].from_coord, origin);
        assert_eq!(steps[0].to_coord, Coordinate::new(3.0, 4.0));
        assert_eq!(steps[1].to_coord, dest);
    }

    #[test]
    fn polyline_is_carried() {
        let mut s = step("WALKING", 60.0, 80.0);
        s.polyline = Some(Polyline {
            points: "_p~iF~ps|U".into(),
        });
        assert_eq!(convert_step(&s).polyline.as_deref(), Some("_p~iF~ps|U"));
    }

    #[test]
    fn strips_markup() {
        assert_eq!(
            strip_html_tags("Turn <b>left</b><div style=\"font-size:0.9em\">Destination</div>"),
            "Turn left Destination"
        );
        assert_eq!(strip_html_tags("plain"), "plain");
    }
}
