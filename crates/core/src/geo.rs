//! Geodesic distance, coordinate validation, and notification topic keys.

use crate::error::CoreError;
use crate::types::GeoPoint;

/// Mean earth radius (IUGG) in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Largest radius accepted by spatial queries and bulk runs.
pub const MAX_RADIUS_KM: f64 = 500.0;

/// Topic every score change is published to.
pub const GLOBAL_TOPIC: &str = "global";

/// Great-circle distance between two points using the haversine formula.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Validate a coordinate pair against WGS84 bounds.
pub fn validate_point(point: GeoPoint) -> Result<(), CoreError> {
    if !point.longitude.is_finite() || !(-180.0..=180.0).contains(&point.longitude) {
        return Err(CoreError::Validation(format!(
            "longitude must be between -180 and 180, got {}",
            point.longitude
        )));
    }
    if !point.latitude.is_finite() || !(-90.0..=90.0).contains(&point.latitude) {
        return Err(CoreError::Validation(format!(
            "latitude must be between -90 and 90, got {}",
            point.latitude
        )));
    }
    Ok(())
}

/// Validate a search radius in kilometres.
pub fn validate_radius_km(radius_km: f64) -> Result<(), CoreError> {
    if radius_km.is_finite() && radius_km > 0.0 && radius_km <= MAX_RADIUS_KM {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "radius_km must be greater than 0 and at most {MAX_RADIUS_KM}, got {radius_km}"
        )))
    }
}

/// Region topic for a point: the 1-degree tile containing it.
///
/// e.g. `(-122.42, 37.77)` -> `"region:37:-123"`.
pub fn region_topic(point: GeoPoint) -> String {
    format!(
        "region:{}:{}",
        point.latitude.floor() as i64,
        point.longitude.floor() as i64
    )
}

/// Whether `topic` is the global topic or a well-formed region topic.
pub fn is_valid_topic(topic: &str) -> bool {
    if topic == GLOBAL_TOPIC {
        return true;
    }
    let mut parts = topic.split(':');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some("region"), Some(lat), Some(lon), None)
            if lat.parse::<i64>().is_ok_and(|v| (-90..=90).contains(&v))
                && lon.parse::<i64>().is_ok_and(|v| (-180..=180).contains(&v))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SF: GeoPoint = GeoPoint::new(-122.42, 37.77);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(SF, SF), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let north = GeoPoint::new(SF.longitude, SF.latitude + 1.0);
        let d = haversine_km(SF, north);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn san_francisco_to_los_angeles() {
        let la = GeoPoint::new(-118.24, 34.05);
        let d = haversine_km(SF, la);
        assert!((d - 559.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(validate_point(SF).is_ok());
        assert!(validate_point(GeoPoint::new(181.0, 0.0)).is_err());
        assert!(validate_point(GeoPoint::new(0.0, -90.5)).is_err());
        assert!(validate_point(GeoPoint::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn radius_bounds() {
        assert!(validate_radius_km(1.0).is_ok());
        assert!(validate_radius_km(0.0).is_err());
        assert!(validate_radius_km(MAX_RADIUS_KM + 1.0).is_err());
    }

    #[test]
    fn region_topic_floors_coordinates() {
        assert_eq!(region_topic(SF), "region:37:-123");
        assert_eq!(region_topic(GeoPoint::new(2.35, 48.85)), "region:48:2");
    }

    #[test]
    fn topic_validation() {
        assert!(is_valid_topic("global"));
        assert!(is_valid_topic("region:37:-123"));
        assert!(is_valid_topic(&region_topic(SF)));
        assert!(!is_valid_topic("region:37"));
        assert!(!is_valid_topic("region:95:0"));
        assert!(!is_valid_topic("region:1:2:3"));
        assert!(!is_valid_topic("county:1:2"));
    }
}
