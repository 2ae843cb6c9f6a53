use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use crate::db::{CartOperations, CartRepository, ItemRepository};
use crate::error::AppError;
use crate::models::cart::Cart;
use crate::routes::parameters::CartListParams;

pub async fn create(Extension(db): Extension<CartRepository>) -> impl IntoResponse {
    let cart = db.create().await;
    let location = format!("/cart/{}", cart.id);
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(cart))
}

pub async fn get_by_id(
    Extension(db): Extension<CartRepository>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<Cart>, AppError> {
    let Path(id) = path?;
    db.get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))
}

/// An empty result answers 404.
pub async fn list(
    Extension(db): Extension<CartRepository>,
    params: Result<Query<CartListParams>, QueryRejection>,
) -> Result<Json<Vec<Cart>>, AppError> {
    let Query(params) = params?;
    let carts = db.list(params.into_query()?).await;
    if carts.is_empty() {
        return Err(AppError::NotFound("No matching carts found".to_string()));
    }
    Ok(Json(carts))
}

pub async fn add_item(
    Extension(db): Extension<CartRepository>,
    Extension(items): Extension<ItemRepository>,
    path: Result<Path<(u64, u64)>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path((cart_id, item_id)) = path?;
    let cart = db.add_item(cart_id, item_id, &items).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}
