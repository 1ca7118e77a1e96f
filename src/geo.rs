use crate::model::LocationZone;

/// Mean earth radius in nautical miles.
pub static EARTH_RADIUS_NM: f64 = 3440.065;

static IN_PORT_NM: f64 = 10.0;
static NEAR_PORT_NM: f64 = 50.0;

/// The port every distance is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub lon: f64,
    pub lat: f64,
}

impl Default for ReferencePoint {
    // Busan
    fn default() -> Self {
        ReferencePoint {
            lon: 129.0,
            lat: 35.1,
        }
    }
}

/// Great-circle distance in nautical miles between two (lon, lat) points in degrees.
pub fn haversine_nm(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_NM * c
}

pub fn zone_for_distance(distance_nm: f64) -> LocationZone {
    if distance_nm < IN_PORT_NM {
        LocationZone::InPort
    } else if distance_nm < NEAR_PORT_NM {
        LocationZone::NearPort
    } else {
        LocationZone::OpenWater
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub zone: LocationZone,
    pub is_in_port: bool,
    pub distance_nm: f64,
}

/// Zone of a position relative to `reference`; `None` unless both coordinates are present.
pub fn classify_location(
    lon: Option<f64>,
    lat: Option<f64>,
    reference: &ReferencePoint,
) -> Option<Location> {
    let (lon, lat) = (lon?, lat?);
    let distance_nm = haversine_nm(lon, lat, reference.lon, reference.lat);
    let zone = zone_for_distance(distance_nm);
    Some(Location {
        zone,
        is_in_port: zone == LocationZone::InPort,
        distance_nm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // degrees of latitude spanning `nm` along a meridian
    fn lat_offset(nm: f64) -> f64 {
        (nm / EARTH_RADIUS_NM).to_degrees()
    }

    #[test]
    fn reference_point_is_in_port() {
        let port = ReferencePoint::default();
        let loc = classify_location(Some(129.0), Some(35.1), &port).unwrap();
        assert_eq!(loc.zone, LocationZone::InPort);
        assert!(loc.is_in_port);
        assert!(loc.distance_nm.abs() < 1e-9);
    }

    #[test]
    fn zone_boundaries_are_exact() {
        assert_eq!(zone_for_distance(0.0), LocationZone::InPort);
        assert_eq!(zone_for_distance(9.999), LocationZone::InPort);
        assert_eq!(zone_for_distance(10.0), LocationZone::NearPort);
        assert_eq!(zone_for_distance(49.999), LocationZone::NearPort);
        assert_eq!(zone_for_distance(50.0), LocationZone::OpenWater);
    }

    #[test]
    fn meridian_distance_matches_arc_length() {
        let port = ReferencePoint::default();
        let d = haversine_nm(port.lon, port.lat + lat_offset(30.0), port.lon, port.lat);
        assert!((d - 30.0).abs() < 1e-6, "distance was {}", d);

        let loc = classify_location(Some(port.lon), Some(port.lat + lat_offset(30.0)), &port).unwrap();
        assert_eq!(loc.zone, LocationZone::NearPort);
        assert!(!loc.is_in_port);

        let loc = classify_location(Some(port.lon), Some(port.lat - lat_offset(80.0)), &port).unwrap();
        assert_eq!(loc.zone, LocationZone::OpenWater);
    }

    #[test]
    fn haversine_is_symmetric() {
        let pairs = [
            ((129.0, 35.1), (126.6, 37.4)),
            ((-73.9, 40.7), (2.35, 48.85)),
            ((179.9, 0.0), (-179.9, 0.0)),
        ];
        for ((lon1, lat1), (lon2, lat2)) in pairs {
            let ab = haversine_nm(lon1, lat1, lon2, lat2);
            let ba = haversine_nm(lon2, lat2, lon1, lat1);
            assert!((ab - ba).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_coordinate_skips_classification() {
        let port = ReferencePoint::default();
        assert!(classify_location(None, Some(35.1), &port).is_none());
        assert!(classify_location(Some(129.0), None, &port).is_none());
    }
}
