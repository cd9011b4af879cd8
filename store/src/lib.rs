pub mod error;
pub mod http;
pub mod identity;
pub mod idstore;
pub mod memory;

pub use error::StoreError;
pub use http::HttpStore;
pub use identity::{Identity, NewIdentity, VectorUpdate};
pub use idstore::IdentityStore;
pub use memory::MemoryStore;
