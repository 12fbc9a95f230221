use serde::{Deserialize, Serialize};

/// Camera position in wgs84, altitude in meters above the ellipsoid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

/// A named camera pose: position plus heading and tilt in degrees. Static
/// data, defined at startup and looked up by name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewpoint {
    pub position: CameraPosition,
    pub heading: f64,
    pub tilt: f64,
}

impl Viewpoint {
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64, altitude: f64, heading: f64, tilt: f64) -> Self {
        Self {
            position: CameraPosition {
                longitude,
                latitude,
                altitude,
            },
            heading,
            tilt,
        }
    }
}
