//! Terrain elevation lookup against an [OpenTopoData] compatible
//! service.
//!
//! Each lookup is a single `GET` request:
//!
//! ```text
//! GET <endpoint>?locations=<lat>,<lon>&interpolation=cubic
//! ```
//!
//! and only `results[0].elevation` of the response is used. There
//! are no retries; a failed or timed out request is reported to the
//! caller as is.
//!
//! [OpenTopoData]: https://www.opentopodata.org/api/

mod error;

pub use crate::error::TopodataError;
pub use geo;
use geo::geometry::Coord;
use log::debug;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

/// Public SRTM 30m dataset.
pub const DEFAULT_ENDPOINT: &str = "https://api.opentopodata.org/v1/srtm30m";

/// How long a single lookup may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const INTERPOLATION: &str = "cubic";

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Returns the endpoint this client queries.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the ground elevation, in meters, at `coord`.
    ///
    /// As everywhere in `geo`, `coord.y` is latitude and `coord.x` is
    /// longitude.
    pub async fn elevation(&self, coord: Coord<f64>) -> Result<f64, TopodataError> {
        let location = format!("{},{}", coord.y, coord.x);
        debug!("elevation request; location: {location}");

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("locations", location.as_str()),
                ("interpolation", INTERPOLATION),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TopodataError::Status(status));
        }

        let body = response.bytes().await?;
        let elevation = parse_elevation(&body)?;
        debug!("elevation response; location: {location}, elevation: {elevation}");
        Ok(elevation)
    }
}

pub struct ClientBuilder {
    /// Service URL, without query (required).
    endpoint: Option<String>,

    /// Per-request timeout (defaults to [DEFAULT_TIMEOUT]).
    timeout: Duration,
}

impl ClientBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client, TopodataError> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| TopodataError::Builder("missing endpoint".to_string()))?;
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| TopodataError::Builder(format!("endpoint {endpoint:?}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TopodataError::Builder(e.to_string()))?;
        Ok(Client { http, endpoint })
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    results: Vec<Sample>,
}

#[derive(Debug, Deserialize)]
struct Sample {
    /// The service reports `null` for locations outside its dataset.
    elevation: Option<f64>,
}

fn parse_elevation(body: &[u8]) -> Result<f64, TopodataError> {
    let Response { results } = serde_json::from_slice(body)
        .map_err(|e| TopodataError::MalformedResponse(e.to_string()))?;
    let sample = results
        .first()
        .ok_or_else(|| TopodataError::MalformedResponse("empty results".to_string()))?;
    sample
        .elevation
        .ok_or_else(|| TopodataError::MalformedResponse("missing elevation".to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_elevation, Client, Coord, TopodataError};
    use assert_approx_eq::assert_approx_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    const LAKE_SPARTAK: Coord = Coord {
        y: 55.115923,
        x: 82.9707,
    };

    fn client(server: &MockServer) -> Client {
        Client::builder()
            .endpoint(format!("{}/v1/srtm30m", server.uri()))
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_first_result() {
        let body = json!({
            "results": [
                {"dataset": "srtm30m", "elevation": 120.25, "location": {"lat": 55.1, "lng": 82.9}},
                {"dataset": "srtm30m", "elevation": 99.0, "location": {"lat": 55.2, "lng": 82.9}},
            ],
            "status": "OK",
        });
        let elevation = parse_elevation(body.to_string().as_bytes()).unwrap();
        assert_approx_eq!(elevation, 120.25);
    }

    #[test]
    fn test_parse_malformed() {
        for body in [
            "not json",
            r#"{"status": "OK"}"#,
            r#"{"results": []}"#,
            r#"{"results": [{"dataset": "srtm30m"}]}"#,
            r#"{"results": [{"elevation": null}]}"#,
            r#"{"results": [{"elevation": "120"}]}"#,
        ] {
            assert!(
                matches!(
                    parse_elevation(body.as_bytes()),
                    Err(TopodataError::MalformedResponse(_))
                ),
                "{body}"
            );
        }
    }

    #[test]
    fn test_builder_requires_endpoint() {
        assert!(matches!(
            Client::builder().build(),
            Err(TopodataError::Builder(_))
        ));
        assert!(matches!(
            Client::builder().endpoint("not a url").build(),
            Err(TopodataError::Builder(_))
        ));
    }

    #[tokio::test]
    async fn test_elevation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/srtm30m"))
            .and(query_param("locations", "55.115923,82.9707"))
            .and(query_param("interpolation", "cubic"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"elevation": 120.0}],
                "status": "OK",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let elevation = client(&server).elevation(LAKE_SPARTAK).await.unwrap();
        assert_approx_eq!(elevation, 120.0);
    }

    #[tokio::test]
    async fn test_empty_results_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"results": [], "status": "OK"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).elevation(LAKE_SPARTAK).await.unwrap_err();
        assert!(matches!(err, TopodataError::MalformedResponse(_)));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_error_status_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "Invalid locations argument.",
                "status": "INVALID_REQUEST",
            })))
            .mount(&server)
            .await;

        let err = client(&server).elevation(LAKE_SPARTAK).await.unwrap_err();
        assert!(matches!(err, TopodataError::Status(status) if status.as_u16() == 400));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_timeout_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": [{"elevation": 1.0}]}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client(&server).elevation(LAKE_SPARTAK).await.unwrap_err();
        assert!(matches!(err, TopodataError::Transport(_)));
        assert!(err.is_transport());
    }
}
