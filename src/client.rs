//! Prediction service client.
//!
//! Provides async HTTP access to the squid prediction service.
//! Uses reqwest with rustls for TLS.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::errors::SquidmapError;
use crate::models::{Month, PredictRequest, PredictResponse, Year};

/// User agent string for API requests.
const USER_AGENT: &str = concat!("squidmap/", env!("CARGO_PKG_VERSION"));

/// Default base URL of the prediction service.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";

/// A source of heatmap predictions.
///
/// The production implementation talks HTTP; tests substitute stubs that
/// succeed or fail deterministically.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Request the heatmap for a year/month pair.
    ///
    /// Returns the first heatmap fragment from the response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// response without any heatmap entries.
    async fn predict(&self, year: Year, month: Month) -> Result<String, SquidmapError>;
}

/// HTTP client for the prediction service.
pub struct HttpPredictionClient {
    client: Client,
    base_url: String,
}

impl HttpPredictionClient {
    /// Create a new client against the given base URL.
    ///
    /// No request timeout is set: a prediction can take as long as the
    /// model needs, and an abandoned request simply settles late.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SquidmapError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    #[instrument(skip(self), fields(year = %year, month = %month))]
    async fn predict(&self, year: Year, month: Month) -> Result<String, SquidmapError> {
        let url = format!("{}/predict", self.base_url);
        let body = PredictRequest::new(year, month);

        debug!("requesting heatmap from {}", url);

        let response = self.client.post(&url).json(&body).send().await?;

        // Check status before parsing
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SquidmapError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let prediction: PredictResponse = serde_json::from_str(&body)?;
        prediction.validate()?;

        debug!("received {} heatmap(s)", prediction.heatmaps.len());

        prediction
            .into_first_heatmap()
            .ok_or_else(|| SquidmapError::InvalidResponse("response contained no heatmaps".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn month(n: u8) -> Month {
        Month::new(n).expect("valid month")
    }

    #[tokio::test]
    async fn test_predict_returns_first_heatmap() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/predict")
                .header("content-type", "application/json")
                .json_body(serde_json::json!({"year": 2023, "month": 1}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "heatmaps": ["<div>A</div>", "<div>B</div>"]
                }));
        });

        let client = HttpPredictionClient::new(server.base_url()).expect("client");
        let markup = client
            .predict(Year::Y2023, month(1))
            .await
            .expect("predict");

        mock.assert();
        assert_eq!(markup, "<div>A</div>");
    }

    #[tokio::test]
    async fn test_predict_maps_error_status_to_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/predict");
            then.status(500).body("model not loaded");
        });

        let client = HttpPredictionClient::new(server.base_url()).expect("client");
        let err = client
            .predict(Year::Y2024, month(6))
            .await
            .expect_err("should fail");

        match err {
            SquidmapError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model not loaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_predict_rejects_empty_heatmaps() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/predict");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"heatmaps": []}));
        });

        let client = HttpPredictionClient::new(server.base_url()).expect("client");
        let err = client
            .predict(Year::Y2023, month(1))
            .await
            .expect_err("should fail");

        assert!(matches!(err, SquidmapError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_predict_rejects_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/predict");
            then.status(200)
                .header("Content-Type", "application/json")
                .body("not json");
        });

        let client = HttpPredictionClient::new(server.base_url()).expect("client");
        let err = client
            .predict(Year::Y2023, month(1))
            .await
            .expect_err("should fail");

        assert!(matches!(err, SquidmapError::Parse(_)));
    }
}
