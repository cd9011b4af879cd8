use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ExtractConfig;
use crate::error::EmbedError;
use crate::extract::FaceExtractor;

const DEFAULT_DIM: usize = 512;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Extraction request body. Images are base64-encoded.
#[derive(Serialize)]
struct ExtractRequest<'a> {
    images: &'a [String],
    dimensions: usize,
}

/// Extraction response. `embedding` is null when no face was detected
/// in the corresponding image.
#[derive(Deserialize)]
struct ExtractResponse {
    data: Vec<ExtractData>,
}

#[derive(Deserialize)]
struct ExtractData {
    index: usize,
    embedding: Option<Vec<f64>>,
}

/// HTTP client for the face embedding-extraction service.
///
/// Posts base64 images to `{base_url}/embeddings` and reads one
/// embedding (or an explicit no-detection null) per image.
pub struct HttpExtractor {
    client: Client,
    base_url: String,
    dim: usize,
}

impl HttpExtractor {
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ExtractConfig::default().with_base_url(base_url))
    }

    pub fn with_config(cfg: ExtractConfig) -> Self {
        let timeout = if cfg.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            cfg.timeout
        };
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: cfg.base_url,
            dim: if cfg.dimension == 0 {
                DEFAULT_DIM
            } else {
                cfg.dimension
            },
        }
    }

    async fn call_api(&self, images: &[&[u8]]) -> Result<Vec<Option<Vec<f32>>>, EmbedError> {
        let url = format!("{}/embeddings", self.base_url);
        let encoded: Vec<String> = images.iter().map(|img| B64.encode(img)).collect();
        let body = ExtractRequest {
            images: &encoded,
            dimensions: self.dim,
        };

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbedError::Api(format!("HTTP {status}: {body}")));
        }

        let data: ExtractResponse = resp
            .json()
            .await
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        // Fill results by index (the service may return out of order).
        let mut vecs: Vec<Option<Option<Vec<f32>>>> = vec![None; images.len()];
        for item in data.data {
            if item.index >= images.len() {
                return Err(EmbedError::UnexpectedIndex {
                    index: item.index,
                    batch_size: images.len(),
                });
            }
            vecs[item.index] = Some(
                item.embedding
                    .map(|emb| emb.iter().map(|&v| v as f32).collect()),
            );
        }

        // Verify all slots are filled.
        vecs.into_iter()
            .enumerate()
            .map(|(i, v)| v.ok_or(EmbedError::MissingIndex(i)))
            .collect()
    }
}

#[async_trait::async_trait]
impl FaceExtractor for HttpExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Option<Vec<f32>>, EmbedError> {
        if image.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        let vecs = self.extract_batch(&[image]).await?;
        Ok(vecs.into_iter().next().flatten())
    }

    async fn extract_batch(&self, images: &[&[u8]]) -> Result<Vec<Option<Vec<f32>>>, EmbedError> {
        if images.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        self.call_api(images).await
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}
