use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{FilterSet, KeywordMode, MediaKind, SortBy},
    routes::{AppState, PageParam},
    services::{interpret as interpret_text, SearchOutcome, SearchRequest},
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    kind: MediaKind,
    #[serde(default)]
    page: PageParam,
    /// How several keyword phrases combine
    #[serde(default)]
    keywords: KeywordMode,
    sort_by: Option<SortBy>,
}

/// Handler for free-text search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchOutcome>> {
    let request = SearchRequest {
        query: params.q,
        kind: params.kind,
        page: params.page.validate()?,
        mode: params.keywords,
        sort_by: params.sort_by,
    };

    let outcome = state.search.search(&request).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct InterpretParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    kind: MediaKind,
}

#[derive(Debug, Serialize)]
pub struct InterpretResponse {
    #[serde(flatten)]
    filters: FilterSet,
    has_filters: bool,
}

/// Handler exposing the interpreter alone; performs no catalog calls
pub async fn interpret(Query(params): Query<InterpretParams>) -> Json<InterpretResponse> {
    let filters = interpret_text(&params.q, params.kind);
    let has_filters = filters.has_filters();
    Json(InterpretResponse {
        filters,
        has_filters,
    })
}
