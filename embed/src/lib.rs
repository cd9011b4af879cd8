pub mod config;
pub mod error;
pub mod extract;
pub mod http;

pub use config::ExtractConfig;
pub use error::EmbedError;
pub use extract::FaceExtractor;
pub use http::HttpExtractor;
