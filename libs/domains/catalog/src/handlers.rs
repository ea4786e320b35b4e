//! HTTP handlers for the catalog API.
//!
//! Every endpoint responds with the [`ProductResponse`] envelope. Failures
//! are carried in its `errors` list; reads answer 404 and writes 400 when
//! the list is non-empty.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::models::{ListQuery, ProductDto, ProductResponse};
use crate::rates::RateProvider;
use crate::repository::ProductRepository;
use crate::service::CatalogService;

const API_TAG: &str = "products";

/// Header carrying the total match count on successful list responses
const TOTAL_ITEMS_HEADER: &str = "totalItems";

#[derive(OpenApi)]
#[openapi(
    paths(list_products, get_product, add_product),
    components(schemas(ProductDto, ProductResponse)),
    tags((name = API_TAG, description = "Product catalog management endpoints"))
)]
pub struct ApiDoc;

/// List products with pagination, sorting, and filtering
#[utoipa::path(
    get,
    path = "/products",
    tag = API_TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "One page of products, total match count in the totalItems header", body = ProductResponse),
        (status = 404, description = "No products found or invalid query parameters", body = ProductResponse)
    )
)]
async fn list_products<R, P>(
    State(service): State<CatalogService<R, P>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: ProductRepository + 'static,
    P: RateProvider + 'static,
{
    let (response, total_items) = service.list_products(query).await;

    if response.errors.is_empty() {
        (
            StatusCode::OK,
            AppendHeaders([(TOTAL_ITEMS_HEADER, total_items.to_string())]),
            Json(response),
        )
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(response)).into_response()
    }
}

/// Get a single product by id
#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = API_TAG,
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found or invalid id", body = ProductResponse)
    )
)]
async fn get_product<R, P>(
    State(service): State<CatalogService<R, P>>,
    Path(id): Path<i64>,
) -> Response
where
    R: ProductRepository + 'static,
    P: RateProvider + 'static,
{
    let response = service.get_product(Some(id)).await;

    if response.errors.is_empty() {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(response)).into_response()
    }
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/product",
    tag = API_TAG,
    request_body = ProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid or duplicate product", body = ProductResponse)
    )
)]
async fn add_product<R, P>(
    State(service): State<CatalogService<R, P>>,
    payload: Option<Json<ProductDto>>,
) -> Response
where
    R: ProductRepository + 'static,
    P: RateProvider + 'static,
{
    let response = service.add_product(payload.map(|Json(dto)| dto)).await;

    if response.errors.is_empty() {
        (StatusCode::CREATED, Json(response)).into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(response)).into_response()
    }
}

/// Build the catalog router with the given service as state
pub fn router<R, P>(service: CatalogService<R, P>) -> Router
where
    R: ProductRepository + 'static,
    P: RateProvider + 'static,
{
    Router::new()
        .route("/products", get(list_products))
        .route("/product/{id}", get(get_product))
        .route("/product", post(add_product))
        .with_state(service)
}
