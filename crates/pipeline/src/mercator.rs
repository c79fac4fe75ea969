//! Spherical Mercator (EPSG:3857) to WGS84 (EPSG:4326) conversion.
//!
//! Geolocation answers are drawn on web map tiles and stored in projected
//! meters. Most GeoJSON consumers expect geographic degrees, so every vertex
//! is converted before it is written to a feature.
//!
//! ## Accepted input
//!
//! A vertex is converted only if it looks like a projected coordinate that
//! lies within the Mercator extent:
//!
//! - `|x| < 180 && |y| < 90` is rejected as already geographic.
//! - `|x|` or `|y|` above [`MAX_EXTENT_M`] is rejected as out of extent.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::ingest::{Polygon, Vertex};

/// WGS84 semi-major axis used by spherical Mercator, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Half the circumference at the equator: the largest valid `|x|` or `|y|`.
pub const MAX_EXTENT_M: f64 = 20_037_508.342_789_2;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("({x}, {y}) is already within geographic bounds")]
    AlreadyGeographic { x: f64, y: f64 },

    #[error("({x}, {y}) lies outside the spherical Mercator extent")]
    OutOfExtent { x: f64, y: f64 },

    #[error("coordinate is not a finite number")]
    NonFinite,
}

/// Convert a spherical Mercator position in meters to `[lon, lat]` degrees.
///
/// Longitude is wrapped into `[-180, 180)`.
pub fn mercator_to_wgs84(x: f64, y: f64) -> Result<Vertex, ProjectionError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(ProjectionError::NonFinite);
    }
    if x.abs() < 180.0 && y.abs() < 90.0 {
        return Err(ProjectionError::AlreadyGeographic { x, y });
    }
    if x.abs() > MAX_EXTENT_M || y.abs() > MAX_EXTENT_M {
        return Err(ProjectionError::OutOfExtent { x, y });
    }

    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lon = lon - ((lon + 180.0) / 360.0).floor() * 360.0;
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - FRAC_PI_2) * (180.0 / PI);

    Ok([lon, lat])
}

/// Convert every vertex of a polygon, dropping the ones that fail.
pub fn reproject_polygon(polygon: &[Vertex]) -> Polygon {
    polygon
        .iter()
        .filter_map(|&[x, y]| match mercator_to_wgs84(x, y) {
            Ok(vertex) => Some(vertex),
            Err(e) => {
                tracing::trace!(error = %e, "Dropping vertex");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TOLERANCE_M: f64 = 1e-6;

    /// Forward spherical Mercator projection, degrees to meters.
    fn wgs84_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
        let x = lon.to_radians() * EARTH_RADIUS_M;
        let y = (FRAC_PI_2 / 2.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS_M;
        (x, y)
    }

    #[test]
    fn known_point_converts() {
        // Geneva, roughly.
        let [lon, lat] = mercator_to_wgs84(679_186.0, 5_817_354.0).unwrap();
        assert!((lon - 6.1012).abs() < 1e-3, "lon = {lon}");
        assert!((lat - 46.2304).abs() < 1e-3, "lat = {lat}");
    }

    #[test]
    fn forward_projection_reconstructs_input() {
        let points = [
            (1_000_000.0, 2_000_000.0),
            (-7_500_000.0, 4_200_000.0),
            (15_000_000.0, -9_000_000.0),
            (-19_000_000.0, -19_500_000.0),
            (500.0, -250.0),
            (20_000_000.0, 20_000_000.0),
        ];
        for (x, y) in points {
            let [lon, lat] = mercator_to_wgs84(x, y).unwrap();
            let (fx, fy) = wgs84_to_mercator(lon, lat);
            assert!((fx - x).abs() < TOLERANCE_M, "x: {x} -> {lon} -> {fx}");
            assert!((fy - y).abs() < TOLERANCE_M * 10.0, "y: {y} -> {lat} -> {fy}");
        }
    }

    #[test]
    fn results_are_within_geographic_range() {
        for x in [-MAX_EXTENT_M + 1.0, -1.0e6, 181.0, 1.0e6, MAX_EXTENT_M - 1.0] {
            for y in [-MAX_EXTENT_M, -1.0e6, 91.0, 1.0e6, MAX_EXTENT_M] {
                let [lon, lat] = mercator_to_wgs84(x, y).unwrap();
                assert!((-180.0..180.0).contains(&lon), "lon = {lon}");
                assert!((-90.0..=90.0).contains(&lat), "lat = {lat}");
            }
        }
    }

    #[test]
    fn geographic_looking_points_are_rejected() {
        for (x, y) in [(0.0, 0.0), (179.9, 89.9), (-179.9, -89.9), (6.1, 46.2)] {
            assert_matches!(
                mercator_to_wgs84(x, y),
                Err(ProjectionError::AlreadyGeographic { .. })
            );
        }
    }

    #[test]
    fn one_large_axis_is_enough_to_convert() {
        assert!(mercator_to_wgs84(10.0, 1_000_000.0).is_ok());
        assert!(mercator_to_wgs84(1_000_000.0, 10.0).is_ok());
        assert!(mercator_to_wgs84(180.0, 0.0).is_ok());
    }

    #[test]
    fn out_of_extent_points_are_rejected() {
        for (x, y) in [
            (MAX_EXTENT_M + 1.0, 0.0),
            (0.0, -(MAX_EXTENT_M + 1.0)),
            (-3.0e7, 3.0e7),
        ] {
            assert_matches!(
                mercator_to_wgs84(x, y),
                Err(ProjectionError::OutOfExtent { .. })
            );
        }
    }

    #[test]
    fn non_finite_points_are_rejected() {
        assert_matches!(
            mercator_to_wgs84(f64::NAN, 1.0e6),
            Err(ProjectionError::NonFinite)
        );
        assert_matches!(
            mercator_to_wgs84(1.0e6, f64::INFINITY),
            Err(ProjectionError::NonFinite)
        );
    }

    #[test]
    fn reproject_polygon_drops_failures_without_substitution() {
        let polygon = vec![
            [1_000_000.0, 1_000_000.0],
            [10.0, 10.0],
            [3.0e7, 0.0],
            [2_000_000.0, 2_000_000.0],
        ];
        let projected = reproject_polygon(&polygon);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0], mercator_to_wgs84(1_000_000.0, 1_000_000.0).unwrap());
        assert_eq!(projected[1], mercator_to_wgs84(2_000_000.0, 2_000_000.0).unwrap());
    }

    #[test]
    fn reproject_polygon_of_only_invalid_points_is_empty() {
        assert!(reproject_polygon(&[[1.0, 2.0], [3.0, 4.0]]).is_empty());
    }
}
