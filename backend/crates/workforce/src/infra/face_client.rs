//! HTTP client for the external face-matching service
//!
//! `POST {base}/compare` with both images base64-encoded; the service
//! answers `{"similarity": f64, "livenessConfidence": f64}` on a 0-100
//! scale.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};

use crate::domain::gateway::{FaceComparison, FaceMatcher};
use crate::error::{WorkforceError, WorkforceResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct HttpFaceMatcher {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareRequest {
    source_image: String,
    target_image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompareResponse {
    #[serde(default)]
    similarity: f64,
    #[serde(default)]
    liveness_confidence: f64,
}

impl HttpFaceMatcher {
    pub fn new(base_url: impl AsRef<str>, api_key: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }
}

impl FaceMatcher for HttpFaceMatcher {
    async fn compare(&self, reference: &[u8], live: &[u8]) -> WorkforceResult<FaceComparison> {
        let url = format!("{}/compare", self.base_url);
        let body = CompareRequest {
            source_image: general_purpose::STANDARD.encode(reference),
            target_image: general_purpose::STANDARD.encode(live),
        };

        let mut request = self.http_client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                WorkforceError::FaceService(format!("request timed out: {e}"))
            } else if e.is_connect() {
                WorkforceError::FaceService(format!("connection failed: {e}"))
            } else {
                WorkforceError::FaceService(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(WorkforceError::FaceService(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let parsed: CompareResponse = response
            .json()
            .await
            .map_err(|e| WorkforceError::FaceService(format!("invalid response: {e}")))?;

        Ok(FaceComparison {
            similarity: parsed.similarity.clamp(0.0, 100.0),
            liveness_confidence: parsed.liveness_confidence.clamp(0.0, 100.0),
        })
    }
}
