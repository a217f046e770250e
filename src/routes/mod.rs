use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{providers::CatalogProvider, SearchService},
};

pub mod catalog;
pub mod search;

/// Deepest page the catalog serves
const MAX_PAGE: u32 = 500;

/// Shared handler state
pub struct AppState {
    pub search: SearchService,
    pub catalog: Arc<dyn CatalogProvider>,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(search::search))
        .route("/interpret", get(search::interpret))
        .route("/discover/:kind", get(catalog::discover))
        .route("/genres/:kind", get(catalog::genres))
        .route("/titles/:kind/:id", get(catalog::title_detail))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Paging parameter shared by the list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
pub struct PageParam(u32);

impl Default for PageParam {
    fn default() -> Self {
        Self(1)
    }
}

impl PageParam {
    pub fn validate(self) -> AppResult<u32> {
        if (1..=MAX_PAGE).contains(&self.0) {
            Ok(self.0)
        } else {
            Err(AppError::InvalidInput(format!(
                "page must be between 1 and {}",
                MAX_PAGE
            )))
        }
    }
}
