use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    service::{ServiceError, DEFAULT_LOW_STOCK_THRESHOLD},
    types::{Category, Product, ProductInput},
};

use super::{
    models::{
        CategoryRequest, ErrorResponse, HealthResponse, InventoryValueResponse, LowStockParams,
        SearchParams,
    },
    AppState,
};

/// Maps service failures onto HTTP statuses with a `{ "message": .. }` body.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ServiceError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServiceError::Storage(err) => {
                log::error!("request failed on storage: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage failure, the operation was rolled back".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn not_found_error(what: &str) -> ApiError {
    ApiError(ServiceError::NotFound(format!("{what} not found")))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            uptime_secs,
        }),
    )
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.services.categories.list_all()?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Category>> {
    state
        .services
        .categories
        .get_by_id(id)?
        .map(Json)
        .ok_or_else(|| not_found_error("category"))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let created = state.services.categories.create(&req.description)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.services.categories.update(id, &req.description)?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.services.categories.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_category_products(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Product>>> {
    if state.services.categories.get_by_id(id)?.is_none() {
        return Err(not_found_error("category"));
    }
    Ok(Json(state.services.products.list_by_category(id)?))
}

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.services.products.list_all()?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Product>> {
    state
        .services
        .products
        .get_by_id(id)?
        .map(Json)
        .ok_or_else(|| not_found_error("product"))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let created = state.services.products.create(input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.services.products.update(id, input)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.services.products.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.services.products.search_by_description(&params.q)?))
}

pub async fn low_stock(
    State(state): State<AppState>,
    Query(params): Query<LowStockParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let threshold = params.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    Ok(Json(state.services.products.low_stock(threshold)?))
}

pub async fn inventory_value(
    State(state): State<AppState>,
) -> ApiResult<Json<InventoryValueResponse>> {
    let total_value = state.services.products.total_inventory_value()?;
    Ok(Json(InventoryValueResponse { total_value }))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "no such route".to_string(),
        }),
    )
}
