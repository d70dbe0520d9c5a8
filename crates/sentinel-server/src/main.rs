mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(sentinel_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = sentinel_db::PoolConfig::from_app_config(&config);
    let pool = sentinel_db::connect_pool(&config.database_url, pool_config).await?;
    sentinel_db::run_migrations(&pool).await?;

    let youtube = Arc::new(sentinel_youtube::YoutubeClient::new(
        &config.youtube_api_key,
        config.request_timeout_secs,
    )?);
    let analyzer = Arc::new(sentinel_analysis::AnalysisClient::new(
        &config.gemini_api_key,
        &config.gemini_model,
        config.request_timeout_secs,
        config.min_secs_between_calls,
    )?);

    let app = build_app(AppState {
        pool,
        youtube,
        analyzer,
        config: Arc::clone(&config),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "sentinel-server listening");
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
