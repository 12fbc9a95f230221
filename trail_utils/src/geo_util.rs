use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use time_tz::{timezones::db::UTC, OffsetDateTimeExt};

use trail_lib::errors::TrailError as Error;

pub const WGS84_WKID: u32 = 4326;
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// # Errors
/// Return error if parsing time string fails
pub fn convert_xml_local_time_to_utc(xml_local_time: &str) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::parse(xml_local_time, &Rfc3339)
        .map(|x| x.to_timezone(UTC))
        .map_err(Into::into)
}

/// Great-circle distance between two wgs84 positions in meters.
#[must_use]
pub fn haversine_distance_m(lat0: f64, lon0: f64, lat1: f64, lon1: f64) -> f64 {
    let dlat = (lat1 - lat0).to_radians();
    let dlon = (lon1 - lon0).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat0.to_radians().cos() * lat1.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Running distance along a sequence of (longitude, latitude) vertices,
/// one entry per vertex, starting at 0.
#[must_use]
pub fn cumulative_distance_m(vertices: &[(f64, f64)]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(vertices.len());
    let mut total = 0.0;
    let mut last: Option<(f64, f64)> = None;
    for &(lon, lat) in vertices {
        if let Some((last_lon, last_lat)) = last.replace((lon, lat)) {
            total += haversine_distance_m(last_lat, last_lon, lat, lon);
        }
        distances.push(total);
    }
    distances
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use time::macros::datetime;

    use crate::geo_util::{
        convert_xml_local_time_to_utc, cumulative_distance_m, haversine_distance_m,
    };

    #[test]
    fn test_convert_xml_local_time_to_utc() {
        let dt = convert_xml_local_time_to_utc("2020-01-01T10:00:00Z").unwrap();
        assert_eq!(dt, datetime!(2020-01-01 10:00:00 UTC));
        let dt = convert_xml_local_time_to_utc("2020-01-01T10:00:00+01:00").unwrap();
        assert_eq!(dt, datetime!(2020-01-01 09:00:00 UTC));
        assert!(convert_xml_local_time_to_utc("not a timestamp").is_err());
    }

    #[test]
    fn test_haversine_distance_m() {
        assert_abs_diff_eq!(haversine_distance_m(46.5, 7.6, 46.5, 7.6), 0.0);
        // one degree of latitude along a meridian
        assert_abs_diff_eq!(
            haversine_distance_m(0.0, 0.0, 1.0, 0.0),
            111_194.93,
            epsilon = 1.0
        );
        assert_abs_diff_eq!(
            haversine_distance_m(46.0, 7.0, 46.5, 7.5),
            haversine_distance_m(46.5, 7.5, 46.0, 7.0),
        );
    }

    #[test]
    fn test_cumulative_distance_m() {
        assert!(cumulative_distance_m(&[]).is_empty());
        let distances = cumulative_distance_m(&[(7.0, 46.0), (7.0, 46.0), (7.0, 47.0)]);
        assert_eq!(distances.len(), 3);
        assert_abs_diff_eq!(distances[0], 0.0);
        assert_abs_diff_eq!(distances[1], 0.0);
        assert_abs_diff_eq!(distances[2], 111_194.93, epsilon = 1.0);
    }
}
