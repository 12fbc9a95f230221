use envy::Error as EnvyError;
use reqwest::Error as ReqwestError;
use roxmltree::Error as RoXmlTreeError;
use serde_json::Error as SerdeJsonError;
use stack_string::StackString;
use std::{
    fmt::Error as FmtError,
    num::{ParseFloatError, ParseIntError, TryFromIntError},
    string::FromUtf8Error,
};
use thiserror::Error;
use time::error::{Format as TimeFormatError, Parse as TimeParseError};
use tokio::task::JoinError;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum TrailError {
    #[error("TrackParse {0}")]
    TrackParse(StackString),
    #[error("LayerLoad {0}")]
    LayerLoad(StackString),
    #[error("UnknownViewpoint {0}")]
    UnknownViewpoint(StackString),
    #[error("ReqwestError {0}")]
    ReqwestError(#[from] ReqwestError),
    #[error("RoXmlTreeError {0}")]
    RoXmlTreeError(Box<RoXmlTreeError>),
    #[error("TimeParseError {0}")]
    TimeParseError(Box<TimeParseError>),
    #[error("TimeFormatError {0}")]
    TimeFormatError(#[from] TimeFormatError),
    #[error("SerdeJsonError {0}")]
    SerdeJsonError(#[from] SerdeJsonError),
    #[error("EnvyError {0}")]
    EnvyError(#[from] EnvyError),
    #[error("UrlParseError {0}")]
    UrlParseError(#[from] UrlParseError),
    #[error("io Error {0}")]
    IoError(#[from] std::io::Error),
    #[error("tokio join error {0}")]
    JoinError(#[from] JoinError),
    #[error("ParseIntError {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("ParseFloatError {0}")]
    ParseFloatError(#[from] ParseFloatError),
    #[error("TryFromIntError {0}")]
    TryFromIntError(#[from] TryFromIntError),
    #[error("FromUtf8Error {0}")]
    FromUtf8Error(Box<FromUtf8Error>),
    #[error("FmtError {0}")]
    FmtError(#[from] FmtError),
    #[error("{0}")]
    StaticCustomError(&'static str),
    #[error("{0}")]
    CustomError(StackString),
}

impl From<RoXmlTreeError> for TrailError {
    fn from(value: RoXmlTreeError) -> Self {
        Self::RoXmlTreeError(value.into())
    }
}

impl From<TimeParseError> for TrailError {
    fn from(value: TimeParseError) -> Self {
        Self::TimeParseError(value.into())
    }
}

impl From<FromUtf8Error> for TrailError {
    fn from(value: FromUtf8Error) -> Self {
        Self::FromUtf8Error(value.into())
    }
}

#[cfg(test)]
mod test {
    use stack_string::format_sstr;

    use crate::errors::TrailError as Error;

    #[test]
    fn test_error_display() {
        let err = Error::TrackParse(format_sstr!("no trackpoints in {}", "empty.tcx"));
        assert_eq!(err.to_string(), "TrackParse no trackpoints in empty.tcx");
        let err = Error::LayerLoad("backend returned code 400".into());
        assert_eq!(err.to_string(), "LayerLoad backend returned code 400");
        let err = Error::UnknownViewpoint("gondola".into());
        assert_eq!(err.to_string(), "UnknownViewpoint gondola");
    }

    #[test]
    fn test_error_from_parse() {
        let err: Error = "not-a-float".parse::<f64>().unwrap_err().into();
        assert!(matches!(err, Error::ParseFloatError(_)));
    }
}
