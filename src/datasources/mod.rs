pub mod auto_data;
pub mod recommender;

pub use auto_data::AutoDataClient;
pub use recommender::RecommendationClient;

use crate::error::Result;
use crate::models::{AutoDataSnapshot, Coordinate, RecommendationRequest, RecommendationResponse};
use async_trait::async_trait;

/// Source of soil/weather/market snapshots keyed by coordinate.
#[async_trait]
pub trait AutoDataSource: Send + Sync {
    async fn fetch_snapshot(&self, coordinate: &Coordinate) -> Result<AutoDataSnapshot>;
}

/// Source of ranked crop recommendations for a full input bundle.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse>;
}

/// Joins a configured base with an API path. An empty base yields a
/// relative path.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    pub async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
