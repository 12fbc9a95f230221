use stack_string::format_sstr;
use std::path::PathBuf;
use structopt::StructOpt;

use trail_lib::{errors::TrailError as Error, trail_config::TrailConfig};
use trail_models::geometry::LineGeometry;
use trail_parser::track_parse::{TrackParse, TrackParseTrait};

use crate::{
    elevation_profile::{ElevationProfile, GroundElevationClient},
    scene_composer::SceneComposer,
};

#[derive(StructOpt)]
pub enum TrailCliOpts {
    /// Parse a track recording and print a summary
    Parse {
        #[structopt(short, long)]
        filename: PathBuf,
    },
    /// Print the elevation profile of a track recording
    Profile {
        #[structopt(short, long)]
        filename: PathBuf,
    },
    /// Compose the full scene against the configured services
    Compose {
        #[structopt(short, long)]
        config: Option<PathBuf>,
    },
}

impl TrailCliOpts {
    /// # Errors
    /// Return error on parse or composition failure
    pub async fn process_args() -> Result<(), Error> {
        match Self::from_args() {
            Self::Parse { filename } => {
                let track = TrackParse::new().with_file(&filename)?;
                println!("{}", track.filename);
                println!("filetype {}", track.filetype);
                println!("begin {}", track.begin_datetime());
                println!("points {}", track.len());
                println!("distance {:.1} m", track.total_distance_m());
                println!(
                    "elevation {}",
                    if track.has_full_elevation() {
                        "per-point"
                    } else {
                        "missing on some points"
                    }
                );
                Ok(())
            }
            Self::Profile { filename } => {
                let track = TrackParse::new().with_file(&filename)?;
                let geometry = LineGeometry::from_track(&track);
                let profile = if geometry.has_z {
                    ElevationProfile::from_geometry(&geometry)?
                } else {
                    let config = TrailConfig::get_config(None)?;
                    let source = GroundElevationClient::new(&config)?;
                    ElevationProfile::from_ground(&geometry, &source).await?
                };
                for sample in &profile.samples {
                    println!("{:10.1} {:8.1}", sample.distance_m, sample.elevation_m);
                }
                println!(
                    "ascent {:.1} m descent {:.1} m over {:.1} m",
                    profile.total_ascent_m(),
                    profile.total_descent_m(),
                    profile.total_distance_m()
                );
                Ok(())
            }
            Self::Compose { config } => {
                let config = TrailConfig::get_config(config.as_deref())?;
                let composer = SceneComposer::new(config)?;
                let composed = composer.compose().await?;
                println!(
                    "overview layers: {}",
                    format_sstr!("{:?}", composed.overview.scene.layer_names())
                );
                println!(
                    "scene layers: {}",
                    format_sstr!("{:?}", composed.scene.layer_names())
                );
                match &composed.track {
                    Some(track) => println!(
                        "track {} with {} points",
                        track.filename,
                        track.len()
                    ),
                    None => println!("track overlay skipped"),
                }
                if let Some(profile) = &composed.profile {
                    println!(
                        "profile: ascent {:.1} m over {:.1} m",
                        profile.total_ascent_m(),
                        profile.total_distance_m()
                    );
                }
                Ok(())
            }
        }
    }
}
