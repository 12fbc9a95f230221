use itertools::Itertools;
use roxmltree::{Node, NodeType};
use serde::{Deserialize, Serialize};
use stack_string::{format_sstr, StackString};
use std::fmt;
use time::OffsetDateTime;

use trail_lib::errors::TrailError as Error;
use trail_utils::geo_util::convert_xml_local_time_to_utc;

/// A single timestamped position from a track recording. Immutable once
/// parsed; a missing altitude stays `None`, it is never defaulted to zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrackPoint {
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub heart_rate: Option<f64>,
    pub distance: Option<f64>,
}

impl TrackPoint {
    /// Read a tcx `Trackpoint` element. Returns `Ok(None)` when the element
    /// carries no position, such points cannot be placed on the map and are
    /// skipped by the parser.
    ///
    /// # Errors
    /// Return error if the timestamp is missing or malformed
    pub fn read_point_tcx(entries: &Node) -> Result<Option<Self>, Error> {
        let mut time = None;
        let mut latitude = None;
        let mut longitude = None;
        let mut elevation = None;
        let mut heart_rate = None;
        let mut distance = None;
        for d in entries.descendants() {
            if d.node_type() == NodeType::Element {
                match d.tag_name().name() {
                    "Time" => {
                        time = Some(convert_xml_local_time_to_utc(d.text().ok_or(
                            Error::StaticCustomError("Malformed time in trackpoint"),
                        )?)?);
                    }
                    "LatitudeDegrees" => latitude = d.text().and_then(|x| x.parse().ok()),
                    "LongitudeDegrees" => longitude = d.text().and_then(|x| x.parse().ok()),
                    "AltitudeMeters" => elevation = d.text().and_then(|x| x.parse().ok()),
                    "DistanceMeters" => distance = d.text().and_then(|x| x.parse().ok()),
                    "HeartRateBpm" => {
                        for entry in d.descendants() {
                            if entry.node_type() == NodeType::Element
                                && entry.tag_name().name() == "Value"
                            {
                                heart_rate = entry.text().and_then(|x| x.parse().ok());
                            }
                        }
                    }
                    _ => (),
                }
            }
        }
        let time =
            time.ok_or(Error::StaticCustomError("Trackpoint without a timestamp"))?;
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Ok(Some(Self {
                time,
                latitude,
                longitude,
                elevation,
                heart_rate,
                distance,
            })),
            _ => Ok(None),
        }
    }

    /// Read a gpx `trkpt` element, position in the `lat`/`lon` attributes,
    /// altitude and timestamp in `ele`/`time` children.
    ///
    /// # Errors
    /// Return error if the timestamp is malformed
    pub fn read_point_gpx(entries: &Node) -> Result<Option<Self>, Error> {
        let mut latitude = None;
        let mut longitude = None;
        for entry in entries.attributes() {
            match entry.name() {
                "lat" => latitude = entry.value().parse().ok(),
                "lon" => longitude = entry.value().parse().ok(),
                _ => (),
            }
        }
        let mut time = None;
        let mut elevation = None;
        for d in entries.children() {
            if d.node_type() == NodeType::Element {
                match d.tag_name().name() {
                    "time" => {
                        if let Some(text) = d.text() {
                            time = Some(convert_xml_local_time_to_utc(text)?);
                        }
                    }
                    "ele" => elevation = d.text().and_then(|x| x.parse().ok()),
                    _ => (),
                }
            }
        }
        let time =
            time.ok_or(Error::StaticCustomError("Trackpoint without a timestamp"))?;
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Ok(Some(Self {
                time,
                latitude,
                longitude,
                elevation,
                heart_rate: None,
                distance: None,
            })),
            _ => Ok(None),
        }
    }
}

impl fmt::Display for TrackPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let keys = [
            "time",
            "latitude",
            "longitude",
            "elevation",
            "heart_rate",
            "distance",
        ];
        let vals = [
            StackString::from_display(self.time),
            StackString::from_display(self.latitude),
            StackString::from_display(self.longitude),
            StackString::from_display(self.elevation.unwrap_or(-1.0)),
            StackString::from_display(self.heart_rate.unwrap_or(-1.0)),
            StackString::from_display(self.distance.unwrap_or(-1.0)),
        ];
        write!(
            f,
            "TrackPoint<{}>",
            keys.iter()
                .zip(vals.iter())
                .map(|(k, v)| format_sstr!("{k}={v}"))
                .join(",")
        )
    }
}
