use serde::Deserialize;
use stack_string::StackString;
use std::{
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::errors::TrailError as Error;

fn default_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| Path::new("/tmp").to_path_buf())
}
fn default_track_file() -> StackString {
    "assets/data/hike_01_01_2020.tcx".into()
}
fn default_poi_service_url() -> StackString {
    "https://services2.arcgis.com/cFEFS0EWrhfDeVw9/arcgis/rest/services/Hiking_POI/FeatureServer/0"
        .into()
}
fn default_cities_service_url() -> StackString {
    "https://services.arcgis.com/V6ZHFr6zdgNZuVG0/arcgis/rest/services/swiss_cities/FeatureServer/\
     0"
    .into()
}
fn default_elevation_service_url() -> StackString {
    "https://elevation3d.arcgis.com/arcgis/rest/services/WorldElevation3D/Terrain3D/ImageServer"
        .into()
}
fn default_fetch_timeout_secs() -> u64 {
    30
}
fn default_animation_duration_ms() -> u64 {
    1200
}

/// `TrailConfig` holds configuration information which can be set either
/// through environment variables or the config.env file, see the dotenvy crate
/// for more information about the config file format.
///
/// The service urls default to the production feature services backing the
/// story page, so an empty environment yields a usable configuration.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct TrailConfigInner {
    #[serde(default = "default_home_dir")]
    pub home_dir: PathBuf,
    /// relative path or http(s) url of the track recording
    #[serde(default = "default_track_file")]
    pub track_file: StackString,
    #[serde(default = "default_poi_service_url")]
    pub poi_service_url: StackString,
    #[serde(default = "default_cities_service_url")]
    pub cities_service_url: StackString,
    #[serde(default = "default_elevation_service_url")]
    pub elevation_service_url: StackString,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: u64,
}

#[derive(Debug, Default, Clone)]
pub struct TrailConfig(Arc<TrailConfigInner>);

impl Default for TrailConfigInner {
    fn default() -> Self {
        Self {
            home_dir: default_home_dir(),
            track_file: default_track_file(),
            poi_service_url: default_poi_service_url(),
            cities_service_url: default_cities_service_url(),
            elevation_service_url: default_elevation_service_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            animation_duration_ms: default_animation_duration_ms(),
        }
    }
}

impl TrailConfig {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(TrailConfigInner::default()))
    }

    /// Pull configuration from a file if it exists,
    /// first look for a config.env file in the current directory,
    /// then try `${HOME}/.config/trail_rust/config.env`,
    /// if that doesn't exist fall back on the default behaviour of dotenvy.
    ///
    /// # Errors
    /// Return error if environment deserialization fails or a required url is
    /// blanked out
    pub fn get_config(fname: Option<&Path>) -> Result<Self, Error> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::StaticCustomError("No CONFIG directory"))?;
        let default_fname = config_dir.join("trail_rust").join("config.env");

        let env_file = match fname {
            Some(fname) if fname.exists() => fname,
            _ => &default_fname,
        };

        dotenvy::dotenv().ok();

        if env_file.exists() {
            dotenvy::from_path(env_file).ok();
        } else if Path::new("config.env").exists() {
            dotenvy::from_filename("config.env").ok();
        }

        let conf: TrailConfigInner = envy::from_env()?;

        if conf.track_file.is_empty() {
            Err(Error::StaticCustomError("No TRACK_FILE specified"))
        } else if conf.poi_service_url.is_empty() {
            Err(Error::StaticCustomError("No POI_SERVICE_URL specified"))
        } else if conf.cities_service_url.is_empty() {
            Err(Error::StaticCustomError("No CITIES_SERVICE_URL specified"))
        } else {
            Ok(Self(Arc::new(conf)))
        }
    }

    #[must_use]
    pub fn from_inner(inner: TrailConfigInner) -> Self {
        Self(Arc::new(inner))
    }
}

impl Deref for TrailConfig {
    type Target = TrailConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use crate::{errors::TrailError as Error, trail_config::TrailConfigInner};

    #[test]
    fn test_config_defaults() -> Result<(), Error> {
        let conf: TrailConfigInner =
            envy::from_iter(std::iter::empty::<(String, String)>())?;
        assert_eq!(conf, TrailConfigInner::default());
        assert_eq!(conf.fetch_timeout_secs, 30);
        assert!(conf.poi_service_url.contains("Hiking_POI"));
        Ok(())
    }

    #[test]
    fn test_config_from_env_vars() -> Result<(), Error> {
        let vars = vec![
            ("TRACK_FILE".to_string(), "/tmp/hike.gpx".to_string()),
            ("FETCH_TIMEOUT_SECS".to_string(), "5".to_string()),
        ];
        let conf: TrailConfigInner = envy::from_iter(vars)?;
        assert_eq!(conf.track_file.as_str(), "/tmp/hike.gpx");
        assert_eq!(conf.fetch_timeout_secs, 5);
        assert_eq!(
            conf.animation_duration_ms,
            TrailConfigInner::default().animation_duration_ms
        );
        Ok(())
    }
}
