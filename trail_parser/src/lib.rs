pub mod track_parse;
pub mod track_parse_gpx;
pub mod track_parse_tcx;
