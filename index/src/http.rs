use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::simindex::{Candidate, Modality, SimIndex};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Search request body.
#[derive(Serialize)]
struct SearchRequest<'a> {
    modality: Modality,
    vector: &'a [f32],
    top_k: usize,
}

/// Search response: candidates ordered by descending similarity.
#[derive(Deserialize)]
struct SearchResponse {
    matches: Vec<Candidate>,
}

/// HTTP client for the similarity-index service.
pub struct HttpIndex {
    client: Client,
    base_url: String,
}

impl HttpIndex {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SimIndex for HttpIndex {
    async fn search(
        &self,
        modality: Modality,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<Candidate>, IndexError> {
        if query.is_empty() {
            return Err(IndexError::EmptyQuery);
        }

        let url = format!("{}/search", self.base_url);
        let body = SearchRequest {
            modality,
            vector: query,
            top_k,
        };

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::Api(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(IndexError::Api(format!("HTTP {status}: {body}")));
        }

        let data: SearchResponse = resp
            .json()
            .await
            .map_err(|e| IndexError::Api(e.to_string()))?;

        Ok(data.matches)
    }
}
