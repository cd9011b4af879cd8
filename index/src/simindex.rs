use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Which reference vector of an identity a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Face,
    Body,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Face => "face",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single result from a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier of the matched identity.
    pub id: String,

    /// Similarity between the query and the stored vector, in [0, 1].
    /// Higher values indicate a closer match.
    pub similarity: f32,
}

/// SimIndex is the interface to nearest-neighbor search over the stored
/// identity reference vectors, one sub-index per modality.
///
/// All implementations must be safe for concurrent use (Send + Sync).
#[async_trait::async_trait]
pub trait SimIndex: Send + Sync {
    /// Return the top-k candidates for the query, ordered by descending
    /// similarity (closest first). May be empty.
    async fn search(
        &self,
        modality: Modality,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<Candidate>, IndexError>;

    /// Return the single best candidate for the query, or None if the
    /// index holds no vectors for this modality.
    async fn best(&self, modality: Modality, query: &[f32]) -> Result<Option<Candidate>, IndexError> {
        let mut matches = self.search(modality, query, 1).await?;
        if matches.is_empty() {
            Ok(None)
        } else {
            Ok(Some(matches.swap_remove(0)))
        }
    }
}
