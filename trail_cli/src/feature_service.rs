use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use stack_string::{format_sstr, StackString};
use std::time::Duration;
use url::Url;

use trail_lib::{errors::TrailError as Error, trail_config::TrailConfig};

/// A point feature returned by the backend: attribute map plus an optional
/// position.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<PointGeometry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointGeometry {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: Option<f64>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    features: Option<Vec<Feature>>,
    #[serde(default)]
    error: Option<BackendError>,
}

#[derive(Deserialize)]
struct BackendError {
    code: i64,
    message: StackString,
}

/// Decode a feature-service query response body. The backend reports filter
/// rejections as an `error` object in an otherwise 200 response.
///
/// # Errors
/// Return `LayerLoad` if the body carries a backend error, `SerdeJsonError`
/// if it is not the query response shape
pub fn decode_query_response(data: &str) -> Result<Vec<Feature>, Error> {
    let response: QueryResponse = serde_json::from_str(data)?;
    if let Some(error) = response.error {
        return Err(Error::LayerLoad(format_sstr!(
            "backend returned code {} {}",
            error.code,
            error.message
        )));
    }
    Ok(response.features.unwrap_or_default())
}

/// Thin client for the feature-service REST endpoint.
pub struct FeatureServiceClient {
    client: reqwest::Client,
}

impl FeatureServiceClient {
    /// # Errors
    /// Return error if the underlying client cannot be constructed
    pub fn new(config: &TrailConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Query the service with an attribute filter. The filter predicate is
    /// passed through untouched, a malformed predicate is the backend's to
    /// reject.
    ///
    /// # Errors
    /// Return `LayerLoad` if the service is unreachable or rejects the filter
    pub async fn query(
        &self,
        service_url: &str,
        where_clause: Option<&str>,
    ) -> Result<Vec<Feature>, Error> {
        let url = Url::parse_with_params(
            &format_sstr!("{service_url}/query"),
            &[
                ("where", where_clause.unwrap_or("1=1")),
                ("outFields", "*"),
                ("returnGeometry", "true"),
                ("f", "json"),
            ],
        )?;
        debug!("query {url}");
        let body = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::LayerLoad(format_sstr!("{service_url} unreachable: {e}")))?
            .error_for_status()
            .map_err(|e| Error::LayerLoad(format_sstr!("{service_url} failed: {e}")))?
            .text()
            .await?;
        decode_query_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use trail_lib::errors::TrailError as Error;

    use crate::feature_service::decode_query_response;

    #[test]
    fn test_decode_features() {
        let body = r#"{
            "features": [
                {
                    "attributes": {"OBJECTID": 1, "Class": "restaurant", "Name": "Sunnbüel"},
                    "geometry": {"x": 7.6731, "y": 46.4622, "z": 1934.0}
                },
                {
                    "attributes": {"OBJECTID": 2, "Class": "bus", "Name": "Eggeschwand"},
                    "geometry": {"x": 7.6735, "y": 46.4800}
                }
            ]
        }"#;
        let features = decode_query_response(body).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].attributes["Class"], "restaurant");
        assert_eq!(features[0].geometry.unwrap().z, Some(1934.0));
        assert_eq!(features[1].geometry.unwrap().z, None);
    }

    #[test]
    fn test_decode_backend_error() {
        let body = r#"{
            "error": {
                "code": 400,
                "message": "Unable to complete operation.",
                "details": ["Invalid definition expression"]
            }
        }"#;
        let err = decode_query_response(body).unwrap_err();
        assert!(matches!(err, Error::LayerLoad(_)));
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_decode_empty_response() {
        assert!(decode_query_response("{}").unwrap().is_empty());
        assert!(decode_query_response("[1,2,3]").is_err());
    }
}
