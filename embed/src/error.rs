use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("embed: empty input")]
    EmptyInput,

    #[error("embed: API error: {0}")]
    Api(String),

    #[error("embed: missing result for image {0}")]
    MissingIndex(usize),

    #[error("embed: unexpected result index {index} for batch size {batch_size}")]
    UnexpectedIndex { index: usize, batch_size: usize },
}
