use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use trackfuse_embed::FaceExtractor;
use trackfuse_index::{Modality, SimIndex};
use trackfuse_store::{IdentityStore, NewIdentity, VectorUpdate};

use crate::acquire::acquire_face;
use crate::cascade::{Decision, MatchRule, match_rules, prelim_decision};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::fusion::ema_blend;
use crate::observation::{Observation, Resolution, Source};
use crate::report::Reporter;

/// Resolves observations to global identities and fuses embeddings.
///
/// Stateless per call apart from the immutable config and the outcome
/// counters; safe for unbounded concurrent use. Collaborators are
/// injected once at construction.
pub struct Resolver {
    cfg: ResolverConfig,
    rules: Vec<MatchRule>,
    extractor: Arc<dyn FaceExtractor>,
    index: Arc<dyn SimIndex>,
    store: Arc<dyn IdentityStore>,
    reporter: Reporter,
}

impl Resolver {
    pub fn new(
        cfg: ResolverConfig,
        extractor: Arc<dyn FaceExtractor>,
        index: Arc<dyn SimIndex>,
        store: Arc<dyn IdentityStore>,
    ) -> Self {
        let cfg = cfg.with_defaults();
        let rules = match_rules(&cfg);
        Self {
            cfg,
            rules,
            extractor,
            index,
            store,
            reporter: Reporter::new(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.cfg
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Resolve one observation to exactly one global identity.
    ///
    /// Never fails for lack of evidence; the only error paths are a
    /// malformed caller embedding and a store failure while persisting
    /// the terminal fallback identity.
    pub async fn resolve(&self, obs: &Observation) -> Result<Resolution, ResolveError> {
        let start = Instant::now();

        self.check_dim("face", obs.face_embedding.as_deref())?;
        self.check_dim("body", obs.body_embedding.as_deref())?;

        let face = acquire_face(self.extractor.as_ref(), obs, self.cfg.dim).await;
        let body = obs.body_embedding.clone();

        let decision = match self.cascade(obs, face.as_deref(), body.as_deref()).await {
            Some(d) => d,
            None => self.create_identity(obs, &face, &body).await?,
        };

        if decision.fuse_face || decision.fuse_body {
            self.fuse(&decision, face.as_deref(), body.as_deref()).await;
        }

        let resolution = Resolution {
            identity_id: decision.identity_id,
            source: decision.source,
            similarity: decision.similarity,
        };
        self.reporter.record(resolution.source, start.elapsed());
        Ok(resolution)
    }

    fn check_dim(&self, modality: &'static str, emb: Option<&[f32]>) -> Result<(), ResolveError> {
        if let Some(emb) = emb {
            if emb.len() != self.cfg.dim {
                return Err(ResolveError::Dimension {
                    modality,
                    expected: self.cfg.dim,
                    got: emb.len(),
                });
            }
        }
        Ok(())
    }

    /// Apply the match rules in priority order, then the preliminary
    /// hint. Index unavailability is "no match by this modality".
    async fn cascade(
        &self,
        obs: &Observation,
        face: Option<&[f32]>,
        body: Option<&[f32]>,
    ) -> Option<Decision> {
        for rule in &self.rules {
            let emb = match rule.modality {
                Modality::Face => face,
                Modality::Body => body,
            };
            let Some(emb) = emb else { continue };

            match self.index.best(rule.modality, emb).await {
                Ok(Some(candidate)) => {
                    if let Some(decision) = rule.decide(&candidate) {
                        return Some(decision);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        modality = %rule.modality,
                        error = %e,
                        "index query failed, treating as no match"
                    );
                }
            }
        }

        obs.prelim
            .as_ref()
            .and_then(|hint| prelim_decision(hint, &self.cfg, face.is_some(), body.is_some()))
    }

    /// Terminal fallback: mint a new identity holding whatever embeddings
    /// are present as its initial reference vectors. No fusion follows —
    /// the record already represents this first observation.
    async fn create_identity(
        &self,
        obs: &Observation,
        face: &Option<Vec<f32>>,
        body: &Option<Vec<f32>>,
    ) -> Result<Decision, ResolveError> {
        let ts = obs.timestamp.unwrap_or_else(Utc::now);
        let label = format!("{}-{}", obs.camera_id, ts.timestamp_nanos_opt().unwrap_or(0));

        let created = self
            .store
            .create(NewIdentity {
                label,
                face_vec: face.clone(),
                body_vec: body.clone(),
            })
            .await?;

        info!(identity = %created.id, camera = %obs.camera_id, "minted new identity");

        let similarity = if face.is_some() || body.is_some() {
            1.0
        } else {
            0.0
        };

        Ok(Decision {
            identity_id: created.id,
            source: Source::New,
            similarity,
            fuse_face: false,
            fuse_body: false,
        })
    }

    /// EMA-blend the observation into the winner's stored vectors for each
    /// flagged modality. Store failures are logged and swallowed: the
    /// resolution is already decided, and each write only nudges a running
    /// average. Concurrent fusions on one identity race; last write per
    /// modality wins.
    async fn fuse(&self, decision: &Decision, face: Option<&[f32]>, body: Option<&[f32]>) {
        let current = match self.store.get(&decision.identity_id).await {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    identity = %decision.identity_id,
                    error = %e,
                    "fusion read failed, skipping vector update"
                );
                return;
            }
        };
        let (old_face, old_body) = match current {
            Some(identity) => (identity.face_vec, identity.body_vec),
            None => (None, None),
        };

        let mut update = VectorUpdate::default();
        if decision.fuse_face {
            if let Some(new) = face {
                update.face_vec = Some(ema_blend(old_face.as_deref(), new, self.cfg.ema_alpha));
            }
        }
        if decision.fuse_body {
            if let Some(new) = body {
                update.body_vec = Some(ema_blend(old_body.as_deref(), new, self.cfg.ema_alpha));
            }
        }
        if update.is_empty() {
            return;
        }

        if let Err(e) = self
            .store
            .update_vectors(&decision.identity_id, update)
            .await
        {
            warn!(
                identity = %decision.identity_id,
                error = %e,
                "fusion write failed, keeping resolution"
            );
        }
    }
}
