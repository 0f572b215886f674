mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tweetlens_analytics::AnalyticsConfig;
use tweetlens_store::TweetLibrary;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = tweetlens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(config = ?config, "configuration loaded");

    let overrides = config
        .lexicon_path
        .as_deref()
        .map(tweetlens_core::load_lexicon_file)
        .transpose()?;
    let analytics = AnalyticsConfig::from_app_config(&config);

    let library = match config.data_path.clone() {
        Some(path) => {
            tokio::task::spawn_blocking(move || {
                TweetLibrary::from_dataset(&analytics, &path, overrides.as_ref())
            })
            .await??
        }
        None => {
            tracing::warn!("TWEETLENS_DATA_PATH not set; starting with an empty library");
            TweetLibrary::from_tweets(&analytics, &[], overrides.as_ref())?
        }
    };

    let app = build_app(
        AppState {
            library: Arc::new(library),
        },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "tweetlens server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
