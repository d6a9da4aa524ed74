use std::fmt;

pub const EARTH_RADIUS: f64 = 6_371_000.0;
/// Latitude/longitude value marking "no coordinate" in datasets.
pub const INVALID_DEGREES: f64 = -1.0;
/// Returned by [`haversine_distance`] when either side has no coordinate.
pub const INVALID_DISTANCE: f64 = -1.0;

const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// Geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub const INVALID: Self = Self {
        longitude: INVALID_DEGREES,
        latitude: INVALID_DEGREES,
    };

    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Great-circle distance in meters, or [`INVALID_DISTANCE`].
    pub fn distance_to(&self, rhs: &Self) -> f64 {
        haversine_distance(self.latitude, self.longitude, rhs.latitude, rhs.longitude)
    }

    pub fn is_sentinel(&self) -> bool {
        is_sentinel_pair(self.latitude, self.longitude)
    }

    /// Finite, inside lat/lng bounds and not the dataset sentinel.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-NINETY..=NINETY).contains(&self.latitude)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.longitude)
            && !self.is_sentinel()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lon = ryu::Buffer::new();
        let mut lat = ryu::Buffer::new();
        write!(
            f,
            "{}, {}",
            lon.format(self.longitude),
            lat.format(self.latitude)
        )
    }
}

fn is_sentinel_pair(lat: f64, lon: f64) -> bool {
    lat == INVALID_DEGREES && lon == INVALID_DEGREES
}

/// Haversine distance in meters between two lat/lon pairs given in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if is_sentinel_pair(lat1, lon1) || is_sentinel_pair(lat2, lon2) {
        return INVALID_DISTANCE;
    }

    let (lat1_r, lat2_r) = (lat1.to_radians(), lat2.to_radians());
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let s1 = (dlat / 2.0).sin();
    let s2 = (dlon / 2.0).sin();
    let a = s1 * s1 + lat1_r.cos() * lat2_r.cos() * s2 * s2;

    EARTH_RADIUS * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, INVALID_DISTANCE, haversine_distance};

    #[test]
    fn same_point_is_zero_meters() {
        assert_eq!(haversine_distance(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn sentinel_on_either_side_is_invalid() {
        assert_eq!(haversine_distance(-1.0, -1.0, 10.0, 10.0), INVALID_DISTANCE);
        assert_eq!(haversine_distance(10.0, 10.0, -1.0, -1.0), INVALID_DISTANCE);
    }

    #[test]
    fn a_single_minus_one_is_a_real_coordinate() {
        let d = haversine_distance(-1.0, 0.0, 0.0, 0.0);
        assert!((d - 111_194.9).abs() < 1.0);
    }

    #[test]
    fn quarter_meridian_matches_earth_radius() {
        let d = haversine_distance(0.0, 0.0, 90.0, 0.0);
        let expected = std::f64::consts::FRAC_PI_2 * super::EARTH_RADIUS;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let porto = Coordinate::new(-8.6291, 41.1579);
        let lisbon = Coordinate::new(-9.1393, 38.7223);

        let there = porto.distance_to(&lisbon);
        let back = lisbon.distance_to(&porto);

        assert!((there - back).abs() < 1e-6);
        assert!((there - 274_000.0).abs() < 2_000.0);
    }

    #[test]
    fn validity_rejects_out_of_range_and_sentinel() {
        assert!(Coordinate::new(180.0, -90.0).is_valid());
        assert!(!Coordinate::new(181.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
        assert!(!Coordinate::INVALID.is_valid());
    }

    #[test]
    fn display_formats_as_lon_lat() {
        assert_eq!(Coordinate::new(-8.5, 41.25).to_string(), "-8.5, 41.25");
    }
}
