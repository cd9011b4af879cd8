pub mod cosine;
pub mod error;
pub mod http;
pub mod memory;
pub mod simindex;

pub use cosine::cosine_sim;
pub use error::IndexError;
pub use http::HttpIndex;
pub use memory::MemoryIndex;
pub use simindex::{Candidate, Modality, SimIndex};
