use std::collections::HashMap;
use std::sync::RwLock;

use crate::cosine::cosine_sim;
use crate::error::IndexError;
use crate::simindex::{Candidate, Modality, SimIndex};

/// In-memory SimIndex using brute-force cosine similarity.
/// Intended for testing and small embedded deployments (< 1000 identities).
pub struct MemoryIndex {
    vectors: RwLock<HashMap<(Modality, String), Vec<f32>>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self {
            vectors: RwLock::new(HashMap::new()),
        }
    }

    /// Add or replace the vector stored for an identity under a modality.
    pub fn insert(&self, modality: Modality, id: &str, vector: &[f32]) {
        let mut vecs = self.vectors.write().unwrap();
        vecs.insert((modality, id.to_string()), vector.to_vec());
    }

    /// Remove an identity's vector for a modality. No-op if absent.
    pub fn delete(&self, modality: Modality, id: &str) {
        let mut vecs = self.vectors.write().unwrap();
        vecs.remove(&(modality, id.to_string()));
    }

    /// Return the number of stored vectors across all modalities.
    pub fn len(&self) -> usize {
        self.vectors.read().unwrap().len()
    }

    /// Return true if the index contains no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SimIndex for MemoryIndex {
    async fn search(
        &self,
        modality: Modality,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<Candidate>, IndexError> {
        if query.is_empty() {
            return Err(IndexError::EmptyQuery);
        }

        let vecs = self.vectors.read().unwrap();
        if vecs.is_empty() || top_k == 0 {
            return Ok(vec![]);
        }

        let mut results: Vec<(String, f32)> = vecs
            .iter()
            .filter(|((m, _), _)| *m == modality)
            .map(|((_, id), vec)| (id.clone(), cosine_sim(query, vec)))
            .collect();

        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        if results.len() > top_k {
            results.truncate(top_k);
        }

        Ok(results
            .into_iter()
            .map(|(id, similarity)| Candidate { id, similarity })
            .collect())
    }
}
