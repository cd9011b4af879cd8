use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One biometric observation from a per-camera tracker.
/// Exists only for the duration of a single resolve call.
#[derive(Clone, Default)]
pub struct Observation {
    /// Originating camera.
    pub camera_id: String,

    /// Capture time, if the tracker supplied one.
    pub timestamp: Option<DateTime<Utc>>,

    /// Face embedding, if the tracker already extracted one.
    pub face_embedding: Option<Vec<f32>>,

    /// Body appearance embedding, always supplied by the caller when
    /// available (never derived here).
    pub body_embedding: Option<Vec<f32>>,

    /// Raw image bytes, used only when `face_embedding` is absent.
    pub image: Option<Vec<u8>>,

    /// The single-camera tracker's own identity guess.
    pub prelim: Option<PrelimHint>,
}

impl Observation {
    pub fn new(camera_id: &str) -> Self {
        Self {
            camera_id: camera_id.to_string(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("camera_id", &self.camera_id)
            .field("timestamp", &self.timestamp)
            .field("face_len", &self.face_embedding.as_ref().map(|v| v.len()))
            .field("body_len", &self.body_embedding.as_ref().map(|v| v.len()))
            .field("image_bytes", &self.image.as_ref().map(|b| b.len()))
            .field("prelim", &self.prelim)
            .finish()
    }
}

/// A single-camera tracker's preliminary identity, with that tracker's
/// own confidence per modality.
#[derive(Debug, Clone)]
pub struct PrelimHint {
    pub identity_id: String,

    /// The tracker's face-match confidence in [0, 1], if it had one.
    pub face_similarity: Option<f32>,

    /// The tracker's re-id confidence in [0, 1], if it had one.
    pub reid_similarity: Option<f32>,
}

/// Which rule of the cascade decided the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Face-index candidate cleared the face threshold.
    Face,
    /// Body-index candidate cleared the re-id threshold.
    Reid,
    /// The tracker's own preliminary hint was accepted.
    Prelim,
    /// Terminal fallback: a brand-new identity was minted.
    New,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Face => "face",
            Self::Reid => "reid",
            Self::Prelim => "prelim",
            Self::New => "new",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one resolve call.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// The selected global identity.
    pub identity_id: String,

    /// Which cascade rule produced the match.
    pub source: Source,

    /// The similarity that justified the decision, in [0, 1].
    pub similarity: f32,
}
