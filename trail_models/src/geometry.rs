use serde::{Deserialize, Serialize};

use trail_utils::geo_util::WGS84_WKID;

use crate::track::Track;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpatialReference {
    pub wkid: u32,
}

/// A polyline in the shape the display client expects, one path whose
/// vertices are `[lon, lat]` or `[lon, lat, z]` arrays. `has_z` is only set
/// when every vertex carries a height, a track with any missing altitude
/// stays flat so the profile readout knows to source heights from the ground
/// service instead of trusting fabricated zeros.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineGeometry {
    pub paths: Vec<Vec<Vec<f64>>>,
    #[serde(rename = "hasZ")]
    pub has_z: bool,
    #[serde(rename = "spatialReference")]
    pub spatial_reference: SpatialReference,
}

impl LineGeometry {
    /// Vertex list is exactly the track's point sequence, same count, same
    /// order.
    #[must_use]
    pub fn from_track(track: &Track) -> Self {
        let has_z = track.has_full_elevation();
        let path = track
            .points()
            .iter()
            .map(|p| match (has_z, p.elevation) {
                (true, Some(z)) => vec![p.longitude, p.latitude, z],
                _ => vec![p.longitude, p.latitude],
            })
            .collect();
        Self {
            paths: vec![path],
            has_z,
            spatial_reference: SpatialReference { wkid: WGS84_WKID },
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.paths.iter().map(Vec::len).sum()
    }

    /// Vertices of the single track path as (longitude, latitude) pairs.
    #[must_use]
    pub fn vertices_2d(&self) -> Vec<(f64, f64)> {
        self.paths
            .iter()
            .flatten()
            .filter_map(|v| match v.as_slice() {
                [lon, lat, ..] => Some((*lon, *lat)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{geometry::LineGeometry, track::Track, track_point::TrackPoint};

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
    fn test_geometry_flat_when_elevation_missing() {
        let track = Track::new(
            "hike.tcx".into(),
            "tcx".into(),
            vec![point(7.1, 46.1, Some(1000.0)), point(7.2, 46.2, None)],
        )
        .unwrap();
        let geometry = LineGeometry::from_track(&track);
        assert!(!geometry.has_z);
        assert_eq!(geometry.vertex_count(), track.len());
        assert_eq!(geometry.paths[0][0], vec![7.1, 46.1]);
        assert_eq!(geometry.paths[0][1], vec![7.2, 46.2]);
        assert_eq!(geometry.spatial_reference.wkid, 4326);
    }

    #[test]
    fn test_geometry_3d_when_elevation_complete() {
        let track = Track::new(
            "hike.tcx".into(),
            "tcx".into(),
            vec![
                point(7.1, 46.1, Some(1000.0)),
                point(7.15, 46.15, Some(1025.0)),
                point(7.2, 46.2, Some(1050.0)),
            ],
        )
        .unwrap();
        let geometry = LineGeometry::from_track(&track);
        assert!(geometry.has_z);
        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.paths[0][2], vec![7.2, 46.2, 1050.0]);
        assert_eq!(geometry.vertices_2d()[1], (7.15, 46.15));
    }

    #[test]
    fn test_geometry_serializes_display_shape() {
        let track = Track::new(
            "hike.tcx".into(),
            "tcx".into(),
            vec![point(7.1, 46.1, None)],
        )
        .unwrap();
        let value = serde_json::to_value(LineGeometry::from_track(&track)).unwrap();
        assert_eq!(value["hasZ"], serde_json::json!(false));
        assert_eq!(value["spatialReference"]["wkid"], serde_json::json!(4326));
        assert_eq!(value["paths"][0][0], serde_json::json!([7.1, 46.1]));
    }
}
