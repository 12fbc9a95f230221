use std::path::Path;

use trail_lib::errors::TrailError as Error;
use trail_parser::{track_parse::TrackParseTrait, track_parse_gpx::TrackParseGpx};

#[test]
fn test_track_parse_gpx() -> Result<(), Error> {
    let track = TrackParseGpx::new().with_file(Path::new("tests/data/test.gpx"))?;
    assert_eq!(track.filename, "test.gpx");
    assert_eq!(track.filetype, "gpx");
    assert_eq!(track.len(), 4);
    assert_eq!(track.points()[0].elevation, Some(1176.4));
    assert_eq!(track.points()[2].elevation, None);
    assert!(!track.has_full_elevation());
    assert!(track.total_distance_m() > 500.0);
    Ok(())
}
