use trackfuse_index::{Candidate, Modality};

use crate::config::ResolverConfig;
use crate::observation::{PrelimHint, Source};

/// One rule of the ordered match policy: a modality, its acceptance
/// threshold, and the source it reports when it wins.
///
/// The cascade is this list, consulted in order; the first rule whose
/// index candidate clears the threshold decides. Adding a modality means
/// adding a rule, not another branch.
#[derive(Debug, Clone, Copy)]
pub struct MatchRule {
    pub modality: Modality,
    pub threshold: f32,
    pub source: Source,
}

impl MatchRule {
    /// Accept the candidate if it clears this rule's threshold.
    pub fn decide(&self, candidate: &Candidate) -> Option<Decision> {
        if candidate.similarity < self.threshold {
            return None;
        }
        Some(Decision {
            identity_id: candidate.id.clone(),
            source: self.source,
            similarity: candidate.similarity,
            fuse_face: self.modality == Modality::Face,
            fuse_body: self.modality == Modality::Body,
        })
    }
}

/// The match policy in strict priority order: face first (higher
/// precision, lower bar), then body re-id (weaker signal, higher bar).
pub fn match_rules(cfg: &ResolverConfig) -> Vec<MatchRule> {
    vec![
        MatchRule {
            modality: Modality::Face,
            threshold: cfg.face_threshold,
            source: Source::Face,
        },
        MatchRule {
            modality: Modality::Body,
            threshold: cfg.reid_threshold,
            source: Source::Reid,
        },
    ]
}

/// A settled cascade decision, including which reference vectors the
/// fusion step must blend.
#[derive(Debug, Clone)]
pub struct Decision {
    pub identity_id: String,
    pub source: Source,
    pub similarity: f32,
    pub fuse_face: bool,
    pub fuse_body: bool,
}

/// Accept the tracker's preliminary identity iff the tracker itself was
/// confident: its face confidence clears the face threshold or its re-id
/// confidence clears the re-id threshold. The reported similarity is the
/// max of the supplied confidences. Fusion flags follow whichever
/// observation embeddings are present.
pub fn prelim_decision(
    hint: &PrelimHint,
    cfg: &ResolverConfig,
    has_face: bool,
    has_body: bool,
) -> Option<Decision> {
    let face_ok = hint.face_similarity.is_some_and(|s| s >= cfg.face_threshold);
    let reid_ok = hint.reid_similarity.is_some_and(|s| s >= cfg.reid_threshold);
    if !face_ok && !reid_ok {
        return None;
    }

    let similarity = hint
        .face_similarity
        .unwrap_or(0.0)
        .max(hint.reid_similarity.unwrap_or(0.0));

    Some(Decision {
        identity_id: hint.identity_id.clone(),
        source: Source::Prelim,
        similarity,
        fuse_face: has_face,
        fuse_body: has_body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ResolverConfig {
        ResolverConfig::default()
    }

    #[test]
    fn rules_are_face_then_body() {
        let rules = match_rules(&cfg());
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].modality, Modality::Face);
        assert_eq!(rules[0].threshold, 0.65);
        assert_eq!(rules[1].modality, Modality::Body);
        assert_eq!(rules[1].threshold, 0.86);
    }

    #[test]
    fn rule_accepts_at_threshold() {
        let rule = match_rules(&cfg())[0];
        let d = rule
            .decide(&Candidate {
                id: "p1".into(),
                similarity: 0.65,
            })
            .expect("at-threshold candidate should win");
        assert_eq!(d.identity_id, "p1");
        assert_eq!(d.source, Source::Face);
        assert!(d.fuse_face);
        assert!(!d.fuse_body);
    }

    #[test]
    fn rule_rejects_below_threshold() {
        let rule = match_rules(&cfg())[1];
        assert!(rule
            .decide(&Candidate {
                id: "p1".into(),
                similarity: 0.85,
            })
            .is_none());
    }

    #[test]
    fn prelim_needs_one_confident_modality() {
        let c = cfg();
        let hint = PrelimHint {
            identity_id: "p7".into(),
            face_similarity: Some(0.5),
            reid_similarity: Some(0.5),
        };
        assert!(prelim_decision(&hint, &c, true, true).is_none());

        let hint = PrelimHint {
            identity_id: "p7".into(),
            face_similarity: Some(0.7),
            reid_similarity: Some(0.5),
        };
        let d = prelim_decision(&hint, &c, true, false).unwrap();
        assert_eq!(d.identity_id, "p7");
        assert_eq!(d.source, Source::Prelim);
        assert_eq!(d.similarity, 0.7, "similarity is the max confidence");
        assert!(d.fuse_face);
        assert!(!d.fuse_body, "no body embedding, no body fusion");
    }

    #[test]
    fn prelim_reid_confidence_alone_suffices() {
        let hint = PrelimHint {
            identity_id: "p9".into(),
            face_similarity: None,
            reid_similarity: Some(0.9),
        };
        let d = prelim_decision(&hint, &cfg(), false, true).unwrap();
        assert_eq!(d.similarity, 0.9);
        assert!(!d.fuse_face);
        assert!(d.fuse_body);
    }

    #[test]
    fn prelim_without_confidences_is_rejected() {
        let hint = PrelimHint {
            identity_id: "p9".into(),
            face_similarity: None,
            reid_similarity: None,
        };
        assert!(prelim_decision(&hint, &cfg(), true, true).is_none());
    }
}
