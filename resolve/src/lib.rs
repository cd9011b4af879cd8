//! Cross-camera identity resolution and embedding fusion.
//!
//! Per-camera trackers produce biometric observations (face and body
//! appearance vectors). This crate fuses them into one global identity
//! per physical person: an ordered cascade of match rules picks the
//! identity (face match first, then body re-id, then the tracker's own
//! preliminary hint, then a freshly minted identity), and an exponential
//! moving average blends each new observation into the winner's stored
//! reference vectors.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use trackfuse_resolve::{Observation, Resolver, ResolverConfig};
//! use trackfuse_embed::HttpExtractor;
//! use trackfuse_index::HttpIndex;
//! use trackfuse_store::HttpStore;
//!
//! # async fn run() -> Result<(), trackfuse_resolve::ResolveError> {
//! let resolver = Resolver::new(
//!     ResolverConfig::default(),
//!     Arc::new(HttpExtractor::new("http://embedder:8001")),
//!     Arc::new(HttpIndex::new("http://index:8002")),
//!     Arc::new(HttpStore::new("http://store:8003")),
//! );
//!
//! let resolution = resolver.resolve(&Observation::new("cam-entrance")).await?;
//! println!("{} via {}", resolution.identity_id, resolution.source);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//!
//! Collaborators are explicit constructor arguments, never module-level
//! singletons, so tests substitute in-memory implementations freely.
//! Evidence failures (extractor or index unreachable, nothing detected)
//! degrade to "no evidence for that modality"; the only fatal error is a
//! store failure while creating the terminal fallback identity.
//!
//! Concurrent resolves that land on the same identity race on fusion:
//! the last write per modality wins. This is a deliberate weak-consistency
//! property — each write only nudges a long-lived running average.

pub mod acquire;
pub mod cascade;
pub mod config;
pub mod error;
pub mod fusion;
pub mod observation;
pub mod report;
pub mod resolver;

pub use cascade::{Decision, MatchRule};
pub use config::ResolverConfig;
pub use error::ResolveError;
pub use fusion::ema_blend;
pub use observation::{Observation, PrelimHint, Resolution, Source};
pub use report::{ReportSnapshot, Reporter};
pub use resolver::Resolver;

#[cfg(test)]
mod tests;
