use stack_string::{format_sstr, StackString};
use time::OffsetDateTime;

use trail_lib::errors::TrailError as Error;
use trail_utils::geo_util::haversine_distance_m;

use crate::track_point::TrackPoint;

/// An ordered, non-empty track recording in wgs84. Point order is file order
/// (ascending recording time); the constructor is the only way in, so the
/// non-empty invariant holds for every value of this type.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub filename: StackString,
    pub filetype: StackString,
    points: Vec<TrackPoint>,
}

impl Track {
    /// # Errors
    /// Return `TrackParse` error if the point list is empty
    pub fn new(
        filename: StackString,
        filetype: StackString,
        points: Vec<TrackPoint>,
    ) -> Result<Self, Error> {
        if points.is_empty() {
            return Err(Error::TrackParse(format_sstr!(
                "no trackpoints in {filename}"
            )));
        }
        Ok(Self {
            filename,
            filetype,
            points,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Recording time of the first point.
    #[must_use]
    pub fn begin_datetime(&self) -> OffsetDateTime {
        self.points[0].time
    }

    /// True when every point carries an altitude.
    #[must_use]
    pub fn has_full_elevation(&self) -> bool {
        self.points.iter().all(|p| p.elevation.is_some())
    }

    /// Summed haversine distance over consecutive points in meters.
    #[must_use]
    pub fn total_distance_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| haversine_distance_m(w[0].latitude, w[0].longitude, w[1].latitude, w[1].longitude))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use trail_lib::errors::TrailError as Error;

    use crate::{track::Track, track_point::TrackPoint};

    fn point(lon: f64, lat: f64, elevation: Option<f64>) -> TrackPoint {
        TrackPoint {
            time: datetime!(2020-01-01 10:00:00 UTC),
            latitude: lat,
            longitude: lon,
            elevation,
            heart_rate: None,
            distance: None,
        }
    }

    #[test]
    fn test_track_rejects_empty() {
        let err = Track::new("empty.tcx".into(), "tcx".into(), Vec::new()).unwrap_err();
        assert!(matches!(err, Error::TrackParse(_)));
        assert_eq!(err.to_string(), "TrackParse no trackpoints in empty.tcx");
    }

    #[test]
    fn test_track_elevation_flag() {
        let track = Track::new(
            "hike.tcx".into(),
            "tcx".into(),
            vec![point(7.1, 46.1, Some(1000.0)), point(7.2, 46.2, None)],
        )
        .unwrap();
        assert_eq!(track.len(), 2);
        assert!(!track.has_full_elevation());

        let track = Track::new(
            "hike.tcx".into(),
            "tcx".into(),
            vec![point(7.1, 46.1, Some(1000.0)), point(7.2, 46.2, Some(1050.0))],
        )
        .unwrap();
        assert!(track.has_full_elevation());
        assert!(track.total_distance_m() > 0.0);
    }
}
