use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::StoreError;
use crate::identity::{Identity, NewIdentity, VectorUpdate};
use crate::idstore::IdentityStore;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP client for the identity store service.
///
/// - `POST   {base}/identities`               create, store assigns the id
/// - `GET    {base}/identities/{id}`          read current record
/// - `PATCH  {base}/identities/{id}/vectors`  overwrite selected vectors
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
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
impl IdentityStore for HttpStore {
    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let url = format!("{}/identities", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&new)
            .send()
            .await
            .map_err(|e| StoreError::Api(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api(format!("HTTP {status}: {body}")));
        }

        resp.json().await.map_err(|e| StoreError::Api(e.to_string()))
    }

    async fn get(&self, id: &str) -> Result<Option<Identity>, StoreError> {
        let url = format!("{}/identities/{}", self.base_url, id);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Api(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api(format!("HTTP {status}: {body}")));
        }

        let identity: Identity = resp
            .json()
            .await
            .map_err(|e| StoreError::Api(e.to_string()))?;
        Ok(Some(identity))
    }

    async fn update_vectors(&self, id: &str, update: VectorUpdate) -> Result<(), StoreError> {
        if update.is_empty() {
            return Ok(());
        }

        let url = format!("{}/identities/{}/vectors", self.base_url, id);
        let resp = self
            .client
            .patch(&url)
            .json(&update)
            .send()
            .await
            .map_err(|e| StoreError::Api(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api(format!("HTTP {status}: {body}")));
        }

        Ok(())
    }
}
