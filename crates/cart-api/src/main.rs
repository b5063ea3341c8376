//! # catalog-server
//!
//! Serves product and stock records for the cart.
//!
//! ## Usage
//!
//! ```bash
//! # Optional settings
//! export PORT=3333
//! export CATALOG_FILE=config/catalog.toml
//!
//! catalog-server
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;
    let addr = state.config.socket_addr()?;

    info!("Products loaded: {}", state.catalog.products.len());

    let app = routes::create_router(state);

    info!("Catalog server listening on http://{}", addr);
    info!("Product: GET http://{}/products/{{id}}", addr);
    info!("Stock:   GET http://{}/stock/{{id}}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
