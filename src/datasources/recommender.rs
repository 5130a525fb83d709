use super::{endpoint, RecommendationSource};
use crate::error::{CropwiseError, Result};
use crate::models::{RecommendationRequest, RecommendationResponse};
use async_trait::async_trait;

pub struct RecommendationClient {
    client: reqwest::Client,
    base_url: String,
}

impl RecommendationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn test_connection(&self, request: &RecommendationRequest) -> Result<bool> {
        let response = self
            .client
            .post(endpoint(&self.base_url, "/api/recommend"))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                CropwiseError::DataSourceUnavailable(format!("Recommendation service: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl RecommendationSource for RecommendationClient {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        let url = endpoint(&self.base_url, "/api/recommend");
        tracing::debug!(%url, crops = request.previous_crops.len(), "requesting recommendations");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                CropwiseError::DataSourceUnavailable(format!("Recommendation service: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CropwiseError::DataSourceUnavailable(format!(
                "Recommendation service returned {}: {}",
                status, body
            )));
        }

        let parsed: RecommendationResponse = response.json().await.map_err(|e| {
            CropwiseError::DataSourceUnavailable(format!(
                "Failed to parse recommendation response: {}",
                e
            ))
        })?;

        parsed.validate()?;
        Ok(parsed)
    }
}
