//! Great-circle distance between samples

use super::sample::LocationSample;

/// Earth radius used for ride distances, km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two latitude/longitude pairs in degrees
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two samples, km
pub fn sample_distance_km(from: &LocationSample, to: &LocationSample) -> f64 {
    haversine_km(from.latitude(), from.longitude(), to.latitude(), to.longitude())
}

#[cfg(test)]
mod tests {
    use geo::{HaversineDistance, Point};

    use super::*;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(0.0, haversine_km(-26.31832, -48.8702222, -26.31832, -48.8702222));
    }

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let d = haversine_km(0.0, 0.0, 0.0, 1.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

        assert!((d - expected).abs() < 1e-9, "{} != {}", d, expected);
    }

    #[test]
    fn symmetric() {
        let there = haversine_km(-26.31832, -48.8702222, -26.3185919, -48.8619776);
        let back = haversine_km(-26.3185919, -48.8619776, -26.31832, -48.8702222);

        assert!((there - back).abs() < 1e-12);
    }

    #[test]
    fn close_to_geo_mean_radius() {
        let p1 = Point::new(-48.8702222, -26.31832);
        let p2 = Point::new(-48.8619776, -26.3185919);

        let ours = haversine_km(p1.y(), p1.x(), p2.y(), p2.x());
        let geo_km = p1.haversine_distance(&p2) / 1000.0;

        // geo uses a 6371.0088 km radius
        assert!((ours - geo_km).abs() / geo_km < 1e-5);
    }
}
