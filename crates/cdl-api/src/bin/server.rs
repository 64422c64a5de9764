//! CDL API server entry point.

use cdl_api::{create_router, Config};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let config = Config::load();
    info!("Starting CDL API v{}", cdl_api::VERSION);

    let app = create_router(&config);

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
