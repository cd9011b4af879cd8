use crate::error::EmbedError;

/// FaceExtractor turns raw images into dense face embeddings.
///
/// `Ok(None)` means the service saw the image but found no face in it.
/// Implementations must be safe for concurrent use (Send + Sync).
#[async_trait::async_trait]
pub trait FaceExtractor: Send + Sync {
    /// Return the face embedding for a single image, or None if no face
    /// was detected.
    async fn extract(&self, image: &[u8]) -> Result<Option<Vec<f32>>, EmbedError>;

    /// Return face embeddings for multiple images, one slot per input.
    async fn extract_batch(&self, images: &[&[u8]]) -> Result<Vec<Option<Vec<f32>>>, EmbedError>;

    /// Return the dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
