//! Map rendering service client
//!
//! HTTP client for the external map renderer. One POST per report:
//! coordinates plus the mode's pixel dimensions and style, PNG bytes
//! back. Any failure is folded into `Error::MapRendering`, which the
//! report builder downgrades to a skipped-map outcome.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use termo_common::render::{MapRenderer, MapSpec, MapStyle};
use termo_common::{Error, Result};
use thiserror::Error as ThisError;

const USER_AGENT: &str = concat!("termo-rg/", env!("CARGO_PKG_VERSION"));

/// Map service client errors
#[derive(Debug, ThisError)]
pub enum MapClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error {0}: {1}")]
    Service(u16, String),

    #[error("Service returned an empty image")]
    EmptyImage,
}

/// Request body sent to the map service
#[derive(Debug, Serialize)]
struct MapRenderRequest {
    latitude: f64,
    longitude: f64,
    width: u32,
    height: u32,
    style: MapStyle,
}

impl MapRenderRequest {
    fn for_spec(spec: &MapSpec) -> Self {
        let params = spec.params();
        Self {
            latitude: spec.latitude,
            longitude: spec.longitude,
            width: params.width,
            height: params.height,
            style: params.style,
        }
    }
}

/// Map rendering service client
pub struct MapServiceClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl MapServiceClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> std::result::Result<Self, MapClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| MapClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    fn render_url(&self) -> String {
        format!("{}/render", self.base_url.trim_end_matches('/'))
    }

    async fn request_png(&self, spec: &MapSpec) -> std::result::Result<Vec<u8>, MapClientError> {
        let request = MapRenderRequest::for_spec(spec);

        tracing::debug!(
            latitude = spec.latitude,
            longitude = spec.longitude,
            width = request.width,
            height = request.height,
            "Requesting site map"
        );

        let response = self
            .http_client
            .post(self.render_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| MapClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MapClientError::Service(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MapClientError::Network(e.to_string()))?;
        if bytes.is_empty() {
            return Err(MapClientError::EmptyImage);
        }

        tracing::info!(bytes = bytes.len(), "Site map rendered");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl MapRenderer for MapServiceClient {
    async fn render(&self, spec: &MapSpec) -> Result<Vec<u8>> {
        self.request_png(spec)
            .await
            .map_err(|e| Error::MapRendering(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termo_common::reading::CoordinateMode;

    #[test]
    fn test_client_creation() {
        let client = MapServiceClient::new("http://localhost:9100", Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_render_url_tolerates_trailing_slash() {
        let client =
            MapServiceClient::new("http://localhost:9100/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.render_url(), "http://localhost:9100/render");
    }

    #[test]
    fn test_urban_request_body() {
        let spec = MapSpec {
            latitude: 3.451647,
            longitude: -76.531985,
            mode: CoordinateMode::Urban,
        };
        let body = serde_json::to_value(MapRenderRequest::for_spec(&spec)).unwrap();
        assert_eq!(body["latitude"], 3.451647);
        assert_eq!(body["width"], 600);
        assert_eq!(body["height"], 400);
        assert_eq!(body["style"]["kind"], "marker");
        assert_eq!(body["style"]["color"], "red");
        assert_eq!(body["style"]["radius"], 12);
    }

    #[test]
    fn test_rural_request_body() {
        let spec = MapSpec {
            latitude: 4.2,
            longitude: -75.1,
            mode: CoordinateMode::Rural,
        };
        let body = serde_json::to_value(MapRenderRequest::for_spec(&spec)).unwrap();
        assert_eq!(body["width"], 900);
        assert_eq!(body["height"], 700);
        assert_eq!(body["style"]["kind"], "satellite");
        assert_eq!(body["style"]["buffer_m"], 300);
        assert_eq!(body["style"]["zoom"], 17);
    }
}
