use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;
use stack_string::format_sstr;
use std::time::Duration;
use url::Url;

use trail_lib::{errors::TrailError as Error, trail_config::TrailConfig};
use trail_models::geometry::LineGeometry;
use trail_utils::geo_util::cumulative_distance_m;

/// Per-vertex height source for tracks recorded without altitude.
pub trait ElevationSource {
    fn elevation_at(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> impl std::future::Future<Output = Result<f64, Error>> + Send;
}

/// Samples ground heights from the world-elevation image service.
pub struct GroundElevationClient {
    client: reqwest::Client,
    service_url: Url,
}

impl GroundElevationClient {
    /// # Errors
    /// Return error if the service url is malformed
    pub fn new(config: &TrailConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        let service_url = Url::parse(&config.elevation_service_url)?;
        Ok(Self {
            client,
            service_url,
        })
    }
}

#[derive(Deserialize)]
struct IdentifyResponse {
    value: String,
}

impl ElevationSource for GroundElevationClient {
    async fn elevation_at(&self, longitude: f64, latitude: f64) -> Result<f64, Error> {
        let geometry = json!({"x": longitude, "y": latitude, "spatialReference": {"wkid": 4326}});
        let url = Url::parse_with_params(
            &format_sstr!("{}/identify", self.service_url),
            &[
                ("geometry", geometry.to_string().as_str()),
                ("geometryType", "esriGeometryPoint"),
                ("returnGeometry", "false"),
                ("f", "json"),
            ],
        )?;
        let response: IdentifyResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.value.trim().parse()?)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProfileSample {
    pub distance_m: f64,
    pub elevation_m: f64,
}

/// The elevation readout for the finished track graphic: running distance
/// against height, plus the climb totals shown in the legend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElevationProfile {
    pub samples: Vec<ProfileSample>,
}

impl ElevationProfile {
    /// Build the profile from a 3d geometry's own vertex heights.
    ///
    /// # Errors
    /// Return error if the geometry is flat
    pub fn from_geometry(geometry: &LineGeometry) -> Result<Self, Error> {
        if !geometry.has_z {
            return Err(Error::StaticCustomError(
                "geometry has no z values, sample a ground elevation source instead",
            ));
        }
        let distances = cumulative_distance_m(&geometry.vertices_2d());
        let samples = geometry
            .paths
            .iter()
            .flatten()
            .zip(distances)
            .filter_map(|(vertex, distance_m)| match vertex.as_slice() {
                [_, _, z] => Some(ProfileSample {
                    distance_m,
                    elevation_m: *z,
                }),
                _ => None,
            })
            .collect();
        Ok(Self { samples })
    }

    /// Build the profile for a flat geometry by sampling ground heights.
    ///
    /// # Errors
    /// Return error if the elevation source fails
    pub async fn from_ground(
        geometry: &LineGeometry,
        source: &impl ElevationSource,
    ) -> Result<Self, Error> {
        let vertices = geometry.vertices_2d();
        let distances = cumulative_distance_m(&vertices);
        let mut samples = Vec::with_capacity(vertices.len());
        for (&(lon, lat), distance_m) in vertices.iter().zip(distances) {
            let elevation_m = source.elevation_at(lon, lat).await?;
            samples.push(ProfileSample {
                distance_m,
                elevation_m,
            });
        }
        debug!("sampled {} ground elevations", samples.len());
        Ok(Self { samples })
    }

    #[must_use]
    pub fn total_distance_m(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.distance_m)
    }

    /// Sum of the climbs between consecutive samples.
    #[must_use]
    pub fn total_ascent_m(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| (w[1].elevation_m - w[0].elevation_m).max(0.0))
            .sum()
    }

    #[must_use]
    pub fn total_descent_m(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| (w[0].elevation_m - w[1].elevation_m).max(0.0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use time::macros::datetime;

    use trail_lib::errors::TrailError as Error;
    use trail_models::{geometry::LineGeometry, track::Track, track_point::TrackPoint};

    use crate::elevation_profile::{ElevationProfile, ElevationSource};

    struct ConstantElevation(f64);

    impl ElevationSource for ConstantElevation {
        async fn elevation_at(&self, _longitude: f64, _latitude: f64) -> Result<f64, Error> {
            Ok(self.0)
        }
    }

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
    fn test_profile_from_3d_geometry() {
        let track = Track::new(
            "hike.tcx".into(),
            "tcx".into(),
            vec![
                point(7.0, 46.0, Some(1000.0)),
                point(7.0, 46.01, Some(1100.0)),
                point(7.0, 46.02, Some(1050.0)),
            ],
        )
        .unwrap();
        let profile = ElevationProfile::from_geometry(&LineGeometry::from_track(&track)).unwrap();
        assert_eq!(profile.samples.len(), 3);
        assert_abs_diff_eq!(profile.samples[0].distance_m, 0.0);
        assert!(profile.samples[2].distance_m > profile.samples[1].distance_m);
        assert_abs_diff_eq!(profile.total_ascent_m(), 100.0);
        assert_abs_diff_eq!(profile.total_descent_m(), 50.0);
    }

    #[test]
    fn test_profile_rejects_flat_geometry() {
        let track = Track::new(
            "hike.tcx".into(),
            "tcx".into(),
            vec![point(7.0, 46.0, None)],
        )
        .unwrap();
        assert!(ElevationProfile::from_geometry(&LineGeometry::from_track(&track)).is_err());
    }

    #[tokio::test]
    async fn test_profile_from_ground_source() {
        let track = Track::new(
            "hike.tcx".into(),
            "tcx".into(),
            vec![point(7.0, 46.0, Some(1000.0)), point(7.0, 46.01, None)],
        )
        .unwrap();
        let geometry = LineGeometry::from_track(&track);
        assert!(!geometry.has_z);
        let profile = ElevationProfile::from_ground(&geometry, &ConstantElevation(1234.5))
            .await
            .unwrap();
        assert_eq!(profile.samples.len(), 2);
        assert_abs_diff_eq!(profile.samples[1].elevation_m, 1234.5);
        assert!(profile.total_distance_m() > 0.0);
    }
}
