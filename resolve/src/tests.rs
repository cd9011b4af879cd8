use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use trackfuse_embed::{EmbedError, FaceExtractor};
use trackfuse_index::{Candidate, IndexError, MemoryIndex, Modality, SimIndex};
use trackfuse_store::{
    Identity, IdentityStore, MemoryStore, NewIdentity, StoreError, VectorUpdate,
};

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::observation::{Observation, PrelimHint, Source};
use crate::resolver::Resolver;

const DIM: usize = 4;

fn cfg() -> ResolverConfig {
    ResolverConfig {
        dim: DIM,
        ..ResolverConfig::default()
    }
}

/// Extractor returning a fixed embedding (or no detection), counting calls.
struct FixedExtractor {
    emb: Option<Vec<f32>>,
    calls: AtomicUsize,
}

impl FixedExtractor {
    fn new(emb: Option<Vec<f32>>) -> Self {
        Self {
            emb,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FaceExtractor for FixedExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<Option<Vec<f32>>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.emb.clone())
    }

    async fn extract_batch(&self, images: &[&[u8]]) -> Result<Vec<Option<Vec<f32>>>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.emb.clone(); images.len()])
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

/// Extractor simulating an unreachable service.
struct FailingExtractor;

#[async_trait::async_trait]
impl FaceExtractor for FailingExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<Option<Vec<f32>>, EmbedError> {
        Err(EmbedError::Api("connection refused".into()))
    }

    async fn extract_batch(&self, _images: &[&[u8]]) -> Result<Vec<Option<Vec<f32>>>, EmbedError> {
        Err(EmbedError::Api("connection refused".into()))
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

/// Index simulating an unreachable service.
struct FailingIndex;

#[async_trait::async_trait]
impl SimIndex for FailingIndex {
    async fn search(
        &self,
        _modality: Modality,
        _query: &[f32],
        _top_k: usize,
    ) -> Result<Vec<Candidate>, IndexError> {
        Err(IndexError::Api("connection refused".into()))
    }
}

/// Store simulating an unreachable service.
struct FailingStore;

#[async_trait::async_trait]
impl IdentityStore for FailingStore {
    async fn create(&self, _new: NewIdentity) -> Result<Identity, StoreError> {
        Err(StoreError::Api("connection refused".into()))
    }

    async fn get(&self, _id: &str) -> Result<Option<Identity>, StoreError> {
        Err(StoreError::Api("connection refused".into()))
    }

    async fn update_vectors(&self, _id: &str, _update: VectorUpdate) -> Result<(), StoreError> {
        Err(StoreError::Api("connection refused".into()))
    }
}

/// Store that serves reads but rejects vector writes.
struct ReadOnlyStore {
    inner: MemoryStore,
}

#[async_trait::async_trait]
impl IdentityStore for ReadOnlyStore {
    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        self.inner.create(new).await
    }

    async fn get(&self, id: &str) -> Result<Option<Identity>, StoreError> {
        self.inner.get(id).await
    }

    async fn update_vectors(&self, _id: &str, _update: VectorUpdate) -> Result<(), StoreError> {
        Err(StoreError::Api("write timeout".into()))
    }
}

fn no_face_extractor() -> Arc<FixedExtractor> {
    Arc::new(FixedExtractor::new(None))
}

async fn seed_identity(
    store: &MemoryStore,
    index: &MemoryIndex,
    face: Option<Vec<f32>>,
    body: Option<Vec<f32>>,
) -> String {
    let identity = store
        .create(NewIdentity {
            label: "seed".into(),
            face_vec: face.clone(),
            body_vec: body.clone(),
        })
        .await
        .unwrap();
    if let Some(v) = &face {
        index.insert(Modality::Face, &identity.id, v);
    }
    if let Some(v) = &body {
        index.insert(Modality::Body, &identity.id, v);
    }
    identity.id
}

#[tokio::test]
async fn face_match_beats_body_and_prelim() {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(MemoryIndex::new());
    let face_id = seed_identity(&store, &index, Some(vec![1.0, 0.0, 0.0, 0.0]), None).await;
    let body_id = seed_identity(&store, &index, None, Some(vec![0.0, 0.0, 1.0, 0.0])).await;

    let resolver = Resolver::new(cfg(), no_face_extractor(), index, store.clone());

    let obs = Observation {
        face_embedding: Some(vec![0.9, 0.435, 0.0, 0.0]),
        body_embedding: Some(vec![0.0, 0.0, 1.0, 0.0]),
        prelim: Some(PrelimHint {
            identity_id: "elsewhere".into(),
            face_similarity: Some(0.99),
            reid_similarity: Some(0.99),
        }),
        ..Observation::new("cam1")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::Face);
    assert_eq!(r.identity_id, face_id);
    assert_ne!(r.identity_id, body_id);
    assert!(r.similarity >= 0.65 && r.similarity <= 1.0);
}

#[tokio::test]
async fn face_fusion_applies_exact_ema() {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(MemoryIndex::new());
    let old = vec![1.0, 0.0, 0.0, 0.0];
    let id = seed_identity(&store, &index, Some(old.clone()), None).await;

    let resolver = Resolver::new(cfg(), no_face_extractor(), index, store.clone());

    let new = vec![0.9, 0.435, 0.0, 0.0];
    let obs = Observation {
        face_embedding: Some(new.clone()),
        ..Observation::new("cam1")
    };
    resolver.resolve(&obs).await.unwrap();

    let fused = store.get(&id).await.unwrap().unwrap().face_vec.unwrap();
    for i in 0..DIM {
        let want = 0.30 * new[i] + 0.70 * old[i];
        assert!(
            (fused[i] - want).abs() < 1e-6,
            "component {i}: got {}, want {want}",
            fused[i]
        );
    }
}

#[tokio::test]
async fn body_match_when_face_misses() {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(MemoryIndex::new());
    // Face in the index points the other way: below threshold.
    seed_identity(&store, &index, Some(vec![0.0, 1.0, 0.0, 0.0]), None).await;
    let body_id = seed_identity(&store, &index, None, Some(vec![0.0, 0.0, 0.98, 0.1])).await;

    let resolver = Resolver::new(cfg(), no_face_extractor(), index, store.clone());

    let obs = Observation {
        face_embedding: Some(vec![1.0, 0.0, 0.0, 0.0]),
        body_embedding: Some(vec![0.0, 0.0, 1.0, 0.0]),
        ..Observation::new("cam2")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::Reid);
    assert_eq!(r.identity_id, body_id);
    assert!(r.similarity >= 0.86);

    // Only the body vector was fused; the face reference is untouched.
    let identity = store.get(&body_id).await.unwrap().unwrap();
    assert!(identity.face_vec.is_none());
    assert!(identity.body_vec.is_some());
}

#[tokio::test]
async fn body_below_threshold_falls_through_to_new() {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(MemoryIndex::new());
    // ~0.85 similarity to the query below: under the 0.86 bar.
    seed_identity(&store, &index, None, Some(vec![0.0, 0.5, 0.8, 0.0])).await;

    let resolver = Resolver::new(cfg(), no_face_extractor(), index, store.clone());

    let obs = Observation {
        body_embedding: Some(vec![0.0, 0.0, 1.0, 0.0]),
        ..Observation::new("cam2")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::New);
    assert_eq!(r.similarity, 1.0);
}

#[tokio::test]
async fn prelim_accepted_with_max_confidence() {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(MemoryIndex::new());
    let known = seed_identity(&store, &index, None, None).await;

    let resolver = Resolver::new(cfg(), no_face_extractor(), index, store.clone());

    let body = vec![0.1, 0.2, 0.3, 0.4];
    let obs = Observation {
        body_embedding: Some(body.clone()),
        prelim: Some(PrelimHint {
            identity_id: known.clone(),
            face_similarity: Some(0.70),
            reid_similarity: Some(0.30),
        }),
        ..Observation::new("cam3")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::Prelim);
    assert_eq!(r.identity_id, known);
    assert_eq!(r.similarity, 0.70);

    // No prior body vector: fusion is a direct assignment.
    let identity = store.get(&known).await.unwrap().unwrap();
    assert_eq!(identity.body_vec, Some(body));
}

#[tokio::test]
async fn prelim_rejected_when_tracker_unconfident() {
    let store = Arc::new(MemoryStore::new());
    let resolver = Resolver::new(
        cfg(),
        no_face_extractor(),
        Arc::new(MemoryIndex::new()),
        store.clone(),
    );

    let obs = Observation {
        prelim: Some(PrelimHint {
            identity_id: "p1".into(),
            face_similarity: Some(0.50),
            reid_similarity: Some(0.50),
        }),
        ..Observation::new("cam3")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::New);
    assert_ne!(r.identity_id, "p1");
}

#[tokio::test]
async fn prelim_with_unknown_identity_still_resolves() {
    // The hint's identity is not in the store; the fusion write fails
    // and is swallowed, the resolution stands.
    let resolver = Resolver::new(
        cfg(),
        no_face_extractor(),
        Arc::new(MemoryIndex::new()),
        Arc::new(MemoryStore::new()),
    );

    let obs = Observation {
        body_embedding: Some(vec![0.1, 0.2, 0.3, 0.4]),
        prelim: Some(PrelimHint {
            identity_id: "ghost".into(),
            face_similarity: None,
            reid_similarity: Some(0.90),
        }),
        ..Observation::new("cam3")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::Prelim);
    assert_eq!(r.identity_id, "ghost");
}

#[tokio::test]
async fn no_evidence_mints_anchorless_identity() {
    let store = Arc::new(MemoryStore::new());
    let resolver = Resolver::new(
        cfg(),
        no_face_extractor(),
        Arc::new(MemoryIndex::new()),
        store.clone(),
    );

    let r = resolver
        .resolve(&Observation::new("cam-lobby"))
        .await
        .unwrap();
    assert_eq!(r.source, Source::New);
    assert_eq!(r.similarity, 0.0);

    let identity = store.get(&r.identity_id).await.unwrap().unwrap();
    assert!(identity.label.starts_with("cam-lobby-"));
    assert!(identity.face_vec.is_none());
    assert!(identity.body_vec.is_none());
}

#[tokio::test]
async fn new_identity_keeps_initial_vectors_unblended() {
    let store = Arc::new(MemoryStore::new());
    let resolver = Resolver::new(
        cfg(),
        no_face_extractor(),
        Arc::new(MemoryIndex::new()),
        store.clone(),
    );

    let face = vec![0.5, 0.5, 0.5, 0.5];
    let obs = Observation {
        face_embedding: Some(face.clone()),
        ..Observation::new("cam1")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::New);
    assert_eq!(r.similarity, 1.0);

    let identity = store.get(&r.identity_id).await.unwrap().unwrap();
    assert_eq!(identity.face_vec, Some(face), "no fusion on the new path");
}

#[tokio::test]
async fn repeated_resolution_is_stable() {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(MemoryIndex::new());
    let id = seed_identity(&store, &index, Some(vec![1.0, 0.0, 0.0, 0.0]), None).await;

    let resolver = Resolver::new(cfg(), no_face_extractor(), index, store);

    let obs = Observation {
        face_embedding: Some(vec![0.95, 0.2, 0.0, 0.0]),
        ..Observation::new("cam1")
    };

    let first = resolver.resolve(&obs).await.unwrap();
    let second = resolver.resolve(&obs).await.unwrap();
    assert_eq!(first.identity_id, id);
    assert_eq!(second.identity_id, id);
    assert_eq!(first.source, Source::Face);
    assert_eq!(second.source, Source::Face);
}

#[tokio::test]
async fn index_unavailable_degrades_to_prelim() {
    let resolver = Resolver::new(
        cfg(),
        no_face_extractor(),
        Arc::new(FailingIndex),
        Arc::new(MemoryStore::new()),
    );

    let obs = Observation {
        face_embedding: Some(vec![1.0, 0.0, 0.0, 0.0]),
        prelim: Some(PrelimHint {
            identity_id: "p5".into(),
            face_similarity: Some(0.80),
            reid_similarity: None,
        }),
        ..Observation::new("cam4")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::Prelim);
    assert_eq!(r.identity_id, "p5");
}

#[tokio::test]
async fn extraction_failure_is_not_fatal() {
    let store = Arc::new(MemoryStore::new());
    let resolver = Resolver::new(
        cfg(),
        Arc::new(FailingExtractor),
        Arc::new(MemoryIndex::new()),
        store,
    );

    let obs = Observation {
        image: Some(vec![0xFF, 0xD8, 0xFF]),
        ..Observation::new("cam5")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::New);
    assert_eq!(r.similarity, 0.0, "no usable evidence was acquired");
}

#[tokio::test]
async fn supplied_embedding_skips_extraction() {
    let extractor = Arc::new(FixedExtractor::new(Some(vec![1.0, 0.0, 0.0, 0.0])));
    let resolver = Resolver::new(
        cfg(),
        extractor.clone(),
        Arc::new(MemoryIndex::new()),
        Arc::new(MemoryStore::new()),
    );

    let obs = Observation {
        face_embedding: Some(vec![0.5, 0.5, 0.5, 0.5]),
        image: Some(vec![1, 2, 3]),
        ..Observation::new("cam6")
    };

    resolver.resolve(&obs).await.unwrap();
    assert_eq!(extractor.calls(), 0, "caller-supplied embedding wins");
}

#[tokio::test]
async fn image_is_extracted_when_no_embedding_supplied() {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(MemoryIndex::new());
    let id = seed_identity(&store, &index, Some(vec![1.0, 0.0, 0.0, 0.0]), None).await;

    let extractor = Arc::new(FixedExtractor::new(Some(vec![1.0, 0.0, 0.0, 0.0])));
    let resolver = Resolver::new(cfg(), extractor.clone(), index, store);

    let obs = Observation {
        image: Some(vec![1, 2, 3]),
        ..Observation::new("cam6")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(extractor.calls(), 1);
    assert_eq!(r.source, Source::Face);
    assert_eq!(r.identity_id, id);
}

#[tokio::test]
async fn create_failure_is_fatal() {
    let resolver = Resolver::new(
        cfg(),
        no_face_extractor(),
        Arc::new(MemoryIndex::new()),
        Arc::new(FailingStore),
    );

    let err = resolver.resolve(&Observation::new("cam7")).await;
    assert!(matches!(err, Err(ResolveError::Store(_))));
}

#[tokio::test]
async fn fusion_write_failure_is_swallowed() {
    let inner = MemoryStore::new();
    let id = inner
        .create(NewIdentity {
            label: "seed".into(),
            face_vec: Some(vec![1.0, 0.0, 0.0, 0.0]),
            body_vec: None,
        })
        .await
        .unwrap()
        .id;
    let index = Arc::new(MemoryIndex::new());
    index.insert(Modality::Face, &id, &[1.0, 0.0, 0.0, 0.0]);

    let resolver = Resolver::new(
        cfg(),
        no_face_extractor(),
        index,
        Arc::new(ReadOnlyStore { inner }),
    );

    let obs = Observation {
        face_embedding: Some(vec![0.95, 0.2, 0.0, 0.0]),
        ..Observation::new("cam8")
    };

    let r = resolver.resolve(&obs).await.unwrap();
    assert_eq!(r.source, Source::Face);
    assert_eq!(r.identity_id, id);
}

#[tokio::test]
async fn wrong_dimension_is_rejected() {
    let resolver = Resolver::new(
        cfg(),
        no_face_extractor(),
        Arc::new(MemoryIndex::new()),
        Arc::new(MemoryStore::new()),
    );

    let obs = Observation {
        face_embedding: Some(vec![1.0, 0.0, 0.0]),
        ..Observation::new("cam9")
    };
    let err = resolver.resolve(&obs).await;
    assert!(matches!(
        err,
        Err(ResolveError::Dimension {
            modality: "face",
            expected: 4,
            got: 3
        })
    ));

    let obs = Observation {
        body_embedding: Some(vec![1.0; 5]),
        ..Observation::new("cam9")
    };
    let err = resolver.resolve(&obs).await;
    assert!(matches!(
        err,
        Err(ResolveError::Dimension {
            modality: "body",
            ..
        })
    ));
}

#[tokio::test]
async fn reporter_counts_outcomes() {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(MemoryIndex::new());
    seed_identity(&store, &index, Some(vec![1.0, 0.0, 0.0, 0.0]), None).await;

    let resolver = Resolver::new(cfg(), no_face_extractor(), index, store);

    let face_obs = Observation {
        face_embedding: Some(vec![0.95, 0.2, 0.0, 0.0]),
        ..Observation::new("cam1")
    };
    resolver.resolve(&face_obs).await.unwrap();
    resolver.resolve(&face_obs).await.unwrap();
    resolver.resolve(&Observation::new("cam1")).await.unwrap();

    let snap = resolver.reporter().snapshot();
    assert_eq!(snap.face, 2);
    assert_eq!(snap.new, 1);
    assert_eq!(snap.total, 3);
}
