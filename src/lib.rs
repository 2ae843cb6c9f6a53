pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;

use anyhow::anyhow;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{Config, RunMode};
use crate::db::{CartRepository, ItemRepository};
use crate::middleware::trace_requests;
use crate::routes::{cart, item, root};

pub fn create_app(items: ItemRepository, carts: CartRepository) -> Router {
    Router::new()
        .route("/", get(root::handler))
        .route("/item", get(item::list).post(item::create))
        .route("/item/", get(item::list).post(item::create))
        .route(
            "/item/:id",
            get(item::get_by_id)
                .put(item::replace)
                .patch(item::patch)
                .delete(item::delete),
        )
        .route("/cart", get(cart::list).post(cart::create))
        .route("/cart/", get(cart::list).post(cart::create))
        .route("/cart/:id", get(cart::get_by_id))
        .route("/cart/:cart_id/add/:item_id", post(cart::add_item))
        .layer(from_fn(trace_requests))
        .layer(Extension(items))
        .layer(Extension(carts))
}

pub async fn run_app(config: Config) -> anyhow::Result<()> {
    let app = create_app(ItemRepository::new(), CartRepository::new());

    match config.run_mode {
        RunMode::Lambda => {
            info!("starting shop api on lambda");
            lambda_http::run(app).await.map_err(|e| anyhow!(e))
        }
        RunMode::Local => {
            let address = config.address();
            let listener = TcpListener::bind(&address).await?;
            info!(%address, "shop api listening");
            axum::serve(listener, app).await?;
            Ok(())
        }
    }
}
