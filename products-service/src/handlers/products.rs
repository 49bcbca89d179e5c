use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use mongodb::bson::oid::ObjectId;

use crate::dtos::{
    CreateProductRequest, CreateProductResponse, ProductResponse, UpdateProductRequest,
};
use crate::models::Product;
use crate::startup::AppState;
use service_core::error::AppError;
use service_core::extractors::ValidatedJson;

/// List every stored product, oldest first.
///
/// GET /products
#[tracing::instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.db.list().await?;

    Ok(Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}

/// Create a product from a validated body and return its new identifier.
///
/// POST /products
#[tracing::instrument(skip(state, request))]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<CreateProductResponse>), AppError> {
    let product = Product::new(request.name, request.description, request.price);
    let id = state.db.insert(&product).await?;

    tracing::info!(product_id = %id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse { id: id.to_hex() }),
    ))
}

/// Rename a product and return the full updated record.
///
/// PUT /products/:id
#[tracing::instrument(skip(state, request))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let object_id = parse_product_id(&id)?;

    let updated = state
        .db
        .update_name(object_id, &request.name)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product {} not found", id)))?;

    tracing::info!(product_id = %id, "Product renamed");

    Ok(Json(ProductResponse::from(updated)))
}

/// Delete a product.
///
/// DELETE /products/:id
#[tracing::instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let object_id = parse_product_id(&id)?;

    if state.db.delete_by_id(object_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Product {} not found",
            id
        )));
    }

    tracing::info!(product_id = %id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}

// A malformed identifier cannot match any stored product, so it gets the same
// 404 as an unknown one.
fn parse_product_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::NotFound(anyhow::anyhow!("Product {} not found", id)))
}
