use super::{endpoint, AutoDataSource};
use crate::error::{CropwiseError, Result};
use crate::models::{AutoDataSnapshot, Coordinate};
use async_trait::async_trait;

pub struct AutoDataClient {
    client: reqwest::Client,
    base_url: String,
}

impl AutoDataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn snapshot_url(&self, coordinate: &Coordinate) -> String {
        // Coordinates go out exactly as typed.
        format!(
            "{}?lat={}&lon={}",
            endpoint(&self.base_url, "/api/auto-data"),
            coordinate.latitude,
            coordinate.longitude
        )
    }

    pub async fn test_connection(&self, coordinate: &Coordinate) -> Result<bool> {
        let response = self
            .client
            .get(self.snapshot_url(coordinate))
            .send()
            .await
            .map_err(|e| CropwiseError::DataSourceUnavailable(format!("Auto-data: {}", e)))?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl AutoDataSource for AutoDataClient {
    async fn fetch_snapshot(&self, coordinate: &Coordinate) -> Result<AutoDataSnapshot> {
        let url = self.snapshot_url(coordinate);
        tracing::debug!(%url, "requesting auto-data snapshot");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CropwiseError::DataSourceUnavailable(format!("Auto-data: {}", e)))?;

        if !response.status().is_success() {
            return Err(CropwiseError::DataSourceUnavailable(format!(
                "Auto-data service returned {}",
                response.status()
            )));
        }

        let snapshot: AutoDataSnapshot = response.json().await.map_err(|e| {
            CropwiseError::DataSourceUnavailable(format!(
                "Failed to parse auto-data response: {}",
                e
            ))
        })?;

        snapshot.validate()?;
        Ok(snapshot)
    }
}
