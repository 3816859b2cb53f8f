use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use livescore_viewer::api::routes::{router, ApiState};
use livescore_viewer::cache::FreshnessCache;
use livescore_viewer::config::Config;
use livescore_viewer::error::Result;
use livescore_viewer::loader::HttpSnapshotLoader;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let loader = HttpSnapshotLoader::new(&cfg)?;
    let cache = Arc::new(FreshnessCache::new(
        loader,
        Duration::from_secs(cfg.cache_ttl_secs),
    ));
    info!(
        "snapshot source: {} (timeout {}s, ttl {}s, history limit {})",
        cfg.snapshot_url, cfg.fetch_timeout_secs, cfg.cache_ttl_secs, cfg.history_limit
    );

    // Warm the cache once at startup. A failure here is not fatal: the
    // first request retries and the API serves an explicit no-data state
    // until a load succeeds.
    let view = cache.get_or_load().await;
    match (&view.data, &view.notice) {
        (Some(data), _) => info!(
            "initial snapshot loaded: {} matches, {} history rows",
            data.latest.len(),
            data.history.len()
        ),
        (None, Some(notice)) => warn!("initial snapshot load failed: {notice}"),
        (None, None) => {}
    }

    let api_state = ApiState { cache };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
