//! # Demo: routing player events and resolving a lifecycle
//!
//! Wires a router with the built-in `LogWriter`, registers a UI listener, then
//! resolves two media items: one that plays with ads and one the catalog
//! doesn't know.
//!
//! Run with:
//! ```text
//! RUST_LOG=playroute=debug cargo run --example demo --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;
use url::Url;

use playroute::{
    AdDescriptor, AdPosition, AdResolver, Config, ContentRef, LifecycleResolver, Listener,
    LogWriter, MediaDescriptor, MediaId, MediaResolver, PlaybackListener, ResolveError,
    ResolverParams, RouterBuilder, SubscribeManager, TokioExecutor,
};

struct Catalog;

#[async_trait]
impl MediaResolver for Catalog {
    async fn resolve(&self, id: &MediaId) -> Result<MediaDescriptor, ResolveError> {
        tokio::time::sleep(Duration::from_millis(150)).await;
        if id.as_str() == "missing" {
            return Err(ResolveError::fail(format!("{id} not in catalog")));
        }
        let url = Url::parse(&format!("https://cdn.example.com/{id}/master.m3u8"))
            .map_err(|e| ResolveError::fail(e.to_string()))?;
        Ok(MediaDescriptor::new(id.clone(), url)
            .with_duration(Duration::from_secs(600))
            .with_title("Demo clip"))
    }
}

struct AdServer;

#[async_trait]
impl AdResolver for AdServer {
    async fn resolve(&self, id: &MediaId) -> Result<Vec<AdDescriptor>, ResolveError> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let vast = Url::parse(&format!("https://ads.example.com/vast?media={id}"))
            .map_err(|e| ResolveError::fail(e.to_string()))?;
        Ok(vec![
            AdDescriptor::new("preroll", vast.clone(), AdPosition::Absolute(Duration::ZERO)),
            AdDescriptor::new("midroll", vast.clone(), AdPosition::Relative(0.5)),
            AdDescriptor::new("postroll", vast, AdPosition::Relative(1.0)),
        ])
    }
}

struct Ui;

impl PlaybackListener for Ui {
    fn on_seek(&self, position: Duration) {
        println!("[ui] seek bar moved to {}s", position.as_secs());
    }

    fn name(&self) -> &'static str {
        "ui"
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config {
        ads_timeout: Duration::from_secs(2),
        ..Config::default()
    };

    let registry = Arc::new(SubscribeManager::new());
    registry.register_listener(Listener::Playback(Arc::new(Ui)));

    let router = RouterBuilder::new(cfg.clone())
        .with_registry(registry)
        .with_logger(LogWriter)
        .build();

    let params = ResolverParams {
        media_resolver: Arc::new(Catalog),
        ad_resolver: Arc::new(AdServer),
        executor: Arc::new(TokioExecutor::current()),
        listener: router.lifecycle_listener(),
        config: cfg,
    };

    let (tx, rx) = tokio::sync::oneshot::channel();
    let resolver = LifecycleResolver::spawn_with_callback("intro", params.clone(), move |lc| {
        let _ = tx.send(lc);
    });

    let content = ContentRef::new(
        resolver.media_id().clone(),
        Url::parse("https://cdn.example.com/intro/master.m3u8")?,
    );
    router.player_listener().on_media_opened(content);

    let lifecycle = rx.await?;
    for stop in lifecycle.schedule() {
        println!("[demo] ad '{}' at {:?}", stop.id, stop.at);
    }

    let playback = router.playback_listener();
    playback.on_play();
    playback.on_seek(Duration::from_millis(1500));

    let missing = LifecycleResolver::spawn("missing", params);
    let lifecycle = missing.wait().await;
    println!("[demo] 'missing' playable: {}", lifecycle.is_playable());

    router.shutdown_listener().on_shutdown();
    // Give the dispatch tasks a moment to drain before exiting.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
