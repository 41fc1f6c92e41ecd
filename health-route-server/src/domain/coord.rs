//! Geographic coordinates and great-circle distance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lon}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lon: f64,
    reason: &'static str,
}

/// A WGS84 position in decimal degrees.
///
/// Serializes as `{"Lat": .., "Lon": ..}`, which is the shape the mobile
/// client reads step endpoints in.
///
/// # Examples
///
/// ```
/// use health_route_server::domain::Coordinate;
///
/// let montreal = Coordinate::parse(45.5017, -73.5673).unwrap();
/// assert_eq!(montreal.lat, 45.5017);
///
/// // Latitude beyond the poles is rejected
/// assert!(Coordinate::parse(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate without range checks.
    ///
    /// Use [`Coordinate::parse`] for values that come from outside the process.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validate and build a coordinate.
    ///
    /// Latitude must lie in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn parse(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(*self, *other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Haversine great-circle distance between two points, in meters.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push antipodal points fractionally past 1.
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_coordinates() {
        assert!(Coordinate::parse(0.0, 0.0).is_ok());
        assert!(Coordinate::parse(90.0, 180.0).is_ok());
        assert!(Coordinate::parse(-90.0, -180.0).is_ok());
        assert!(Coordinate::parse(45.5017, -73.5673).is_ok());
    }

    #[test]
    fn reject_out_of_range() {
        assert!(Coordinate::parse(90.0001, 0.0).is_err());
        assert!(Coordinate::parse(-91.0, 0.0).is_err());
        assert!(Coordinate::parse(0.0, 180.5).is_err());
        assert!(Coordinate::parse(0.0, -181.0).is_err());
    }

    #[test]
    fn reject_non_finite() {
        assert!(Coordinate::parse(f64::NAN, 0.0).is_err());
        assert!(Coordinate::parse(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = Coordinate::new(45.5, -73.57);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // One degree along a meridian is R * pi / 180.
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        assert!((haversine_distance(a, b) - expected).abs() < 1e-6);
    }

    #[test]
    fn known_city_distance() {
        // Montreal to Quebec City is roughly 233 km.
        let montreal = Coordinate::new(45.5017, -73.5673);
        let quebec = Coordinate::new(46.8139, -71.2080);
        let d = haversine_distance(montreal, quebec);
        assert!((230_000.0..236_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn serializes_pascal_case() {
        let json = serde_json::to_value(Coordinate::new(1.5, -2.5)).unwrap();
        assert_eq!(json, serde_json::json!({"Lat": 1.5, "Lon": -2.5}));
    }

    #[test]
    fn display_uses_six_decimals() {
        assert_eq!(
            Coordinate::new(45.5, -73.57).to_string(),
            "45.500000,-73.570000"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_coord() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in arb_coord(), b in arb_coord()) {
            let ab = haversine_distance(a, b);
            let ba = haversine_distance(b, a);
            prop_assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0));
        }

        #[test]
        fn distance_is_non_negative_and_bounded(a in arb_coord(), b in arb_coord()) {
            let d = haversine_distance(a, b);
            prop_assert!(d >= 0.0);
            // Never more than half the circumference.
            prop_assert!(d <= EARTH_RADIUS_M * std::f64::consts::PI + 1e-6);
        }

        #[test]
        fn parse_accepts_everything_in_range(a in arb_coord()) {
            prop_assert_eq!(Coordinate::parse(a.lat, a.lon), Ok(a));
        }
    }
}
