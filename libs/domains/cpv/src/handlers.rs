//! REST handlers for CPV search

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::{ErrorResponse, ValidatedQuery};
use utoipa::OpenApi;

use crate::error::CpvResult;
use crate::models::{CpvMatch, HealthResponse, SearchParams, SearchResponse};
use crate::repository::CatalogRepository;
use crate::service::SearchService;

/// OpenAPI documentation for the CPV search API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CPV Code Search",
        version = "1.0.0",
        description = "Semantic search over Common Procurement Vocabulary codes."
    ),
    paths(search, health),
    components(schemas(SearchResponse, CpvMatch, HealthResponse, ErrorResponse)),
    tags(
        (name = "search", description = "Semantic CPV search")
    )
)]
pub struct CpvApiDoc;

/// Semantic CPV search
///
/// Returns the top-K CPV codes most similar to the query.
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matches ordered by descending score", body = SearchResponse),
        (status = 422, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn search<R: CatalogRepository>(
    State(service): State<Arc<SearchService<R>>>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> CpvResult<Json<SearchResponse>> {
    Ok(Json(service.search(params).await?))
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "search",
    responses(
        (status = 200, description = "Table row count and model name", body = HealthResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn health<R: CatalogRepository>(
    State(service): State<Arc<SearchService<R>>>,
) -> CpvResult<Json<HealthResponse>> {
    Ok(Json(service.health().await?))
}

/// Create the router for `GET /search` and `GET /health`
pub fn router<R: CatalogRepository + 'static>(service: Arc<SearchService<R>>) -> Router {
    Router::new()
        .route("/search", get(search::<R>))
        .route("/health", get(health::<R>))
        .with_state(service)
}
