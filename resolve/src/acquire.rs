use tracing::{debug, warn};

use trackfuse_embed::FaceExtractor;

use crate::observation::Observation;

/// Obtain a usable face embedding for the observation, or None.
///
/// A caller-supplied embedding is used unchanged. Otherwise, if a raw
/// image is present, the extraction service is invoked once. Every
/// failure mode (unreachable service, non-success response, no face
/// detected, wrong output dimension) degrades to "no face evidence" —
/// face evidence is optional, not required.
pub async fn acquire_face(
    extractor: &dyn FaceExtractor,
    obs: &Observation,
    dim: usize,
) -> Option<Vec<f32>> {
    if let Some(emb) = &obs.face_embedding {
        return Some(emb.clone());
    }

    let image = obs.image.as_ref()?;

    match extractor.extract(image).await {
        Ok(Some(emb)) if emb.len() == dim => Some(emb),
        Ok(Some(emb)) => {
            warn!(
                camera = %obs.camera_id,
                got = emb.len(),
                expected = dim,
                "extracted face embedding has wrong dimension, ignoring"
            );
            None
        }
        Ok(None) => {
            debug!(camera = %obs.camera_id, "no face detected in image");
            None
        }
        Err(e) => {
            warn!(
                camera = %obs.camera_id,
                error = %e,
                "face extraction failed, continuing without face evidence"
            );
            None
        }
    }
}
