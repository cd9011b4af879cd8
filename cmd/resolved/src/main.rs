//! resolved - multi-tracker identity resolution service.

mod config;
mod server;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trackfuse_embed::{ExtractConfig, HttpExtractor};
use trackfuse_index::HttpIndex;
use trackfuse_resolve::{Resolver, ResolverConfig};
use trackfuse_store::HttpStore;

/// Multi-tracker identity resolution service.
#[derive(Parser, Debug)]
#[command(name = "resolved")]
#[command(about = "Resolves per-camera biometric observations to global identities")]
struct Args {
    /// Config file path (YAML)
    #[arg(short, long)]
    config: PathBuf,

    /// Override the listen address from the config (e.g. :8080)
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let cfg = config::load(&args.config)?;

    let timeout = Duration::from_secs(cfg.services.timeout_secs);
    let resolver_cfg = ResolverConfig {
        face_threshold: cfg.resolver.face_threshold,
        reid_threshold: cfg.resolver.reid_threshold,
        ema_alpha: cfg.resolver.ema_alpha,
        dim: cfg.resolver.dim,
    }
    .with_defaults();

    let extractor = HttpExtractor::with_config(
        ExtractConfig::default()
            .with_base_url(&cfg.services.embed_url)
            .with_dimension(resolver_cfg.dim)
            .with_timeout(timeout),
    );
    let index = HttpIndex::with_timeout(&cfg.services.index_url, timeout);
    let store = HttpStore::with_timeout(&cfg.services.store_url, timeout);

    let resolver = Arc::new(Resolver::new(
        resolver_cfg,
        Arc::new(extractor),
        Arc::new(index),
        Arc::new(store),
    ));

    let listen = args.listen.unwrap_or(cfg.listen);
    server::serve(&listen, resolver).await
}
