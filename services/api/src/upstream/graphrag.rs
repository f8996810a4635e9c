//! HTTP client for the GraphRAG matching microservice

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

use super::{Recommender, UpstreamError, error_message};
use crate::models::matching::MatchRequest;

const FIND_MATCHES_FALLBACK: &str = "Failed to find matches";

/// GraphRAG client
#[derive(Clone)]
pub struct GraphRagClient {
    client: reqwest::Client,
    base_url: String,
}

impl GraphRagClient {
    /// Create a new client for the service at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Recommender for GraphRagClient {
    async fn find_matches(&self, request: &MatchRequest) -> Result<Value, UpstreamError> {
        info!(
            "Finding matches for user {} and skill {}",
            request.user_id, request.skill_name
        );

        let response = self
            .client
            .post(self.endpoint("/match/find"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            let message = error_message(&body, FIND_MATCHES_FALLBACK);
            warn!("Matching service returned {}: {}", status, message);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}
