use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("index: empty query vector")]
    EmptyQuery,

    #[error("index: API error: {0}")]
    Api(String),
}
