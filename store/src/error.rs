use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store: identity not found: {0}")]
    NotFound(String),

    #[error("store: API error: {0}")]
    Api(String),
}
