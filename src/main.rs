use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use recycle_vision::{
    adapters::{
        http::{router, state::HttpState},
        onnx::model_catalog::OnnxModelCatalog,
    },
    application::{labels::LabelTable, services::DetectionService},
    config::ServerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging (RUST_LOG, info by default)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ServerConfig::parse();

    // 2. Labels and model. Any failure here aborts startup.
    let labels = LabelTable::from_json_file(&cfg.labels)?;
    tracing::info!("Loaded {} labels from {}", labels.len(), cfg.labels.display());

    let model_catalog = Arc::new(OnnxModelCatalog::new(cfg.intra_threads));
    let detection = Arc::new(DetectionService::new(model_catalog));
    let model = cfg.model_id();
    detection
        .load_model(&model)
        .await
        .with_context(|| format!("startup failed: cannot load {}", model.onnx_path))?;

    // 3. API state and router
    let state = HttpState {
        detection,
        labels: Arc::new(labels),
        params: cfg.detect_params(),
    };
    let app = router(state, cfg.max_upload_bytes());

    // 4. Serve
    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    tracing::info!("API listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
