use portfolio_service::{api::app_router, build_state, config::Config, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(&config);

    let state = build_state(&config)?;
    let app = app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    info!(" Portfolio Service starting on http://{}", config.listen_addr);
    info!(" Available endpoints:");
    info!("  GET  / - Liveness message");
    info!("  GET  /health - Health check");
    info!("  POST /transactions - Apply a batch, returns realized profit");
    info!("  GET  /transactions - Committed transaction log");
    info!("  GET  /balance - Net shares per stock");
    info!("  GET  /lots - Open FIFO lots per stock");

    axum::serve(listener, app).await?;
    Ok(())
}
