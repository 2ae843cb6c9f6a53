use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use crate::db::{ItemOperations, ItemRepository, SoftDeletable};
use crate::error::AppError;
use crate::models::item::{Item, ItemRequest, PatchItemRequest};
use crate::routes::parameters::ItemListParams;

pub async fn create(
    Extension(db): Extension<ItemRepository>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = body?;
    request.validate()?;

    let item = db.create(request).await;
    let location = format!("/item/{}", item.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

pub async fn get_by_id(
    Extension(db): Extension<ItemRepository>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = path?;
    match db.get(id).await {
        Some(item) if !item.is_deleted() => Ok(Json(item)),
        _ => Err(AppError::NotFound("Item not found".to_string())),
    }
}

pub async fn list(
    Extension(db): Extension<ItemRepository>,
    params: Result<Query<ItemListParams>, QueryRejection>,
) -> Result<Json<Vec<Item>>, AppError> {
    let Query(params) = params?;
    let query = params.into_query()?;
    Ok(Json(db.list(query).await))
}

/// Missing or deleted items answer 422, not 404.
pub async fn replace(
    Extension(db): Extension<ItemRepository>,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = path?;
    let Json(request) = body?;
    request.validate()?;

    db.replace(id, request)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Unprocessable("Item not found".to_string()))
}

/// Any failure to apply the patch, including a missing item, answers 304.
pub async fn patch(
    Extension(db): Extension<ItemRepository>,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<PatchItemRequest>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = path?;
    let Json(request) = body?;
    request.validate()?;

    db.patch(id, request)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotModified("Item not found".to_string()))
}

pub async fn delete(
    Extension(db): Extension<ItemRepository>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = path?;
    db.delete(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
}
