use crate::error::StoreError;
use crate::identity::{Identity, NewIdentity, VectorUpdate};

/// IdentityStore is the interface to the durable person record store.
///
/// Exactly the three operations the resolution engine needs: create with
/// initial vectors, read current vectors, update vector fields.
/// Implementations must be safe for concurrent use (Send + Sync).
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    /// Create a new identity with its initial reference vectors.
    /// Returns the stored record with its assigned id.
    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError>;

    /// Return the identity with the given id, or None if unknown.
    async fn get(&self, id: &str) -> Result<Option<Identity>, StoreError>;

    /// Overwrite the vector fields set in `update` for the given id.
    async fn update_vectors(&self, id: &str, update: VectorUpdate) -> Result<(), StoreError>;
}
