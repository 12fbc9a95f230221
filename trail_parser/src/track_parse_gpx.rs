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
pub struct TrackParseGpx {
    pub is_gzip: bool,
}

impl TrackParseGpx {
    #[must_use]
    pub fn new() -> Self {
        Self { is_gzip: false }
    }
}

impl TrackParseTrait for TrackParseGpx {
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
        let gpx_output = self.parse_data(&output)?;
        let filename = filename
            .file_name()
            .ok_or_else(|| Error::TrackParse(format_sstr!("filename {filename:?} has no path")))?
            .to_string_lossy()
            .to_string()
            .into();
        Track::new(filename, "gpx".into(), gpx_output.point_list)
    }

    fn parse_data(&self, data: &str) -> Result<ParseOutput, Error> {
        let doc = Document::parse(data)?;

        let mut point_list = Vec::new();

        for d in doc.root().descendants() {
            if d.node_type() == NodeType::Element && d.tag_name().name() == "trkpt" {
                if let Some(new_point) = TrackPoint::read_point_gpx(&d)? {
                    point_list.push(new_point);
                }
            }
        }
        debug!("parsed {} gpx trackpoints", point_list.len());

        Ok(ParseOutput { point_list })
    }
}

#[cfg(test)]
mod tests {
    use crate::{track_parse::TrackParseTrait, track_parse_gpx::TrackParseGpx};

    const GPX_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1">
  <trk>
    <trkseg>
      <trkpt lat="46.1" lon="7.1">
        <ele>1000</ele>
        <time>2020-01-01T10:00:00Z</time>
      </trkpt>
      <trkpt lat="46.2" lon="7.2">
        <time>2020-01-01T10:00:10Z</time>
      </trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_parse_data() {
        let output = TrackParseGpx::new().parse_data(GPX_DOC).unwrap();
        assert_eq!(output.point_list.len(), 2);
        assert_eq!(output.point_list[0].elevation, Some(1000.0));
        assert_eq!(output.point_list[1].elevation, None);
    }
}
