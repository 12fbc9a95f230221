use stack_string::format_sstr;
use std::path::Path;

use trail_lib::errors::TrailError as Error;
use trail_models::{track::Track, track_point::TrackPoint};

use super::{track_parse_gpx::TrackParseGpx, track_parse_tcx::TrackParseTcx};

#[derive(Default)]
pub struct ParseOutput {
    pub point_list: Vec<TrackPoint>,
}

pub trait TrackParseTrait
where
    Self: Send + Sync,
{
    /// # Errors
    /// May return error if parsing and loading file fails
    fn with_file(self, filename: &Path) -> Result<Track, Error>;

    /// # Errors
    /// May return error if parsing the document fails
    fn parse_data(&self, data: &str) -> Result<ParseOutput, Error>;
}

#[derive(Default, Debug)]
pub struct TrackParse {}

impl TrackParse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse already-fetched text by filetype, used after the composer
    /// downloads the track over http.
    ///
    /// # Errors
    /// Return error for an unknown filetype, a malformed document or a file
    /// with zero usable trackpoints
    pub fn parse_text(name: &str, filetype: &str, data: &str) -> Result<Track, Error> {
        let output = match filetype {
            "tcx" => TrackParseTcx::new().parse_data(data)?,
            "gpx" => TrackParseGpx::new().parse_data(data)?,
            _ => {
                return Err(Error::TrackParse(format_sstr!(
                    "Invalid filetype {filetype} for {name}"
                )))
            }
        };
        Track::new(name.into(), filetype.into(), output.point_list)
    }
}

impl TrackParseTrait for TrackParse {
    fn with_file(self, filename: &Path) -> Result<Track, Error> {
        let suffix = filename
            .file_name()
            .ok_or_else(|| Error::TrackParse(format_sstr!("filename {filename:?} has no path")))?
            .to_string_lossy()
            .to_lowercase();
        if suffix.ends_with(".tcx") || suffix.ends_with(".tcx.gz") {
            TrackParseTcx::new().with_file(filename)
        } else if suffix.ends_with(".gpx") || suffix.ends_with(".gpx.gz") {
            TrackParseGpx::new().with_file(filename)
        } else {
            Err(Error::TrackParse(format_sstr!(
                "Invalid extension {suffix}"
            )))
        }
    }

    fn parse_data(&self, data: &str) -> Result<ParseOutput, Error> {
        TrackParseTcx::new().parse_data(data)
    }
}
