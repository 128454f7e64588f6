use dossier::{DocumentRenderer, EngineConfig};
use dossier_server::{config::ServerConfig, router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::load()?;
    let engine = EngineConfig {
        http_timeout_secs: config.fetch_timeout_secs,
        ..EngineConfig::from_env()
    };
    let renderer = DocumentRenderer::from_config(&engine)?;
    tracing::info!("Font '{}' registered from {}", engine.font_family, engine.font_path.display());

    let addr = config.address();
    let app = router(AppState::new(renderer, config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("dossier-server listening on {}", addr);
    tracing::info!("  - POST /cv");
    tracing::info!("  - POST /cover-letter");
    tracing::info!("  - GET  /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,dossier=debug,dossier_server=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
