use thiserror::Error;

use trackfuse_store::StoreError;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// Malformed input: a caller-supplied embedding with the wrong
    /// dimensionality.
    #[error("resolve: {modality} embedding has {got} components, expected {expected}")]
    Dimension {
        modality: &'static str,
        expected: usize,
        got: usize,
    },

    /// The identity store failed while persisting a newly minted identity.
    /// This is the only fatal collaborator failure: there is no identity
    /// to return.
    #[error("resolve: identity store error: {0}")]
    Store(#[from] StoreError),
}
