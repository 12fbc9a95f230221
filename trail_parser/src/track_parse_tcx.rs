use flate2::read::GzDecoder;
use log::debug;
use roxmltree::{Document, NodeType};
use stack_string::format_sstr;
use std::{
    ffi::OsStr,
    fs::{read_to_string, File},
    io::Read,
    path::Path,
};

use trail_lib::errors::TrailError as Error;
use trail_models::{track::Track, track_point::TrackPoint};

use super::track_parse::{ParseOutput, TrackParseTrait};

#[derive(Debug, Default)]
pub struct TrackParseTcx {
    pub is_gzip: bool,
}

impl TrackParseTcx {
    #[must_use]
    pub fn new() -> Self {
        Self { is_gzip: false }
    }
}

impl TrackParseTrait for TrackParseTcx {
    fn with_file(mut self, filename: &Path) -> Result<Track, Error> {
        self.is_gzip = filename.extension().and_then(OsStr::to_str) == Some("gz");
        if !filename.exists() {
            return Err(Error::TrackParse(format_sstr!(
                "file {filename:?} does not exist"
            )));
        }
        let output = if self.is_gzip {
            let mut buf = String::new();
            GzDecoder::new(File::open(filename)?).read_to_string(&mut buf)?;
            buf
        } else {
            read_to_string(filename)?
        };
        let tcx_output = self.parse_data(&output)?;
        let filename = filename
            .file_name()
            .ok_or_else(|| Error::TrackParse(format_sstr!("filename {filename:?} has no path")))?
            .to_string_lossy()
            .to_string()
            .into();
        Track::new(filename, "tcx".into(), tcx_output.point_list)
    }

    fn parse_data(&self, data: &str) -> Result<ParseOutput, Error> {
        let doc = Document::parse(data)?;

        let mut point_list = Vec::new();

        for d in doc.root().descendants() {
            if d.node_type() == NodeType::Element && d.tag_name().name() == "Trackpoint" {
                // points without a position cannot be placed, everything else
                // is kept in document order, no sorting, no deduplication
                if let Some(new_point) = TrackPoint::read_point_tcx(&d)? {
                    point_list.push(new_point);
                }
            }
        }
        debug!("parsed {} tcx trackpoints", point_list.len());

        Ok(ParseOutput { point_list })
    }
}
