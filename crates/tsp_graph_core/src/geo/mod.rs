mod coordinate;

pub use coordinate::{
    Coordinate, EARTH_RADIUS, INVALID_DEGREES, INVALID_DISTANCE, haversine_distance,
};
