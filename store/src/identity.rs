use std::fmt;

use serde::{Deserialize, Serialize};

/// A persistent global identity: one record per physical person.
///
/// Reference vectors, when present, hold the running appearance average
/// for the modality. The store owns the record; the resolution engine
/// only creates it once and refines its vectors.
#[derive(Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque store-assigned identifier.
    pub id: String,

    /// Human-readable display label.
    pub label: String,

    /// Face reference vector, if any face has been observed.
    pub face_vec: Option<Vec<f32>>,

    /// Body reference vector, if any body appearance has been observed.
    pub body_vec: Option<Vec<f32>>,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("face_vec_len", &self.face_vec.as_ref().map(|v| v.len()))
            .field("body_vec_len", &self.body_vec.as_ref().map(|v| v.len()))
            .finish()
    }
}

/// Payload for creating an identity. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIdentity {
    pub label: String,
    pub face_vec: Option<Vec<f32>>,
    pub body_vec: Option<Vec<f32>>,
}

/// Partial vector update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_vec: Option<Vec<f32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_vec: Option<Vec<f32>>,
}

impl VectorUpdate {
    pub fn is_empty(&self) -> bool {
        self.face_vec.is_none() && self.body_vec.is_none()
    }
}
