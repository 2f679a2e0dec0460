use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use labreport::{
    config::Config,
    ocr::{OcrService, TextRecognizer},
    routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("labreport=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let ocr_service = OcrService::new_with_config(config.ocr.clone());
    if !ocr_service.is_available() {
        warn!("⚠️  Built without the `ocr` feature; every upload will fail text recognition");
    }
    let recognizer: Arc<dyn TextRecognizer> = Arc::new(ocr_service);

    let state = Arc::new(AppState::new(config.clone(), recognizer)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_address))?;

    info!("🚀 Lab report API listening on {}", config.server_address);
    info!("📖 API documentation at http://{}/docs", config.server_address);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
