use std::net::SocketAddr;

use axum::{routing::get, Router};

use crate::service::Services;

mod handlers;
mod models;

pub use models::ErrorResponse;

use handlers::{
    create_category, create_product, delete_category, delete_product, get_category, get_product,
    health, inventory_value, list_categories, list_category_products, list_products, low_stock,
    not_found, search_products, update_category, update_product,
};

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub started_at: std::time::SystemTime,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            started_at: std::time::SystemTime::now(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/categories/:id/products", get(list_category_products))
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route("/products/low-stock", get(low_stock))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/inventory/value", get(inventory_value))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve(
    addr: SocketAddr,
    services: Services,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST service on http://{}", addr);

    let app = router(AppState::new(services));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
