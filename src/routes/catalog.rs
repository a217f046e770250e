use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{DiscoverQuery, MediaKind, ResultPage, SortBy, TitleDetail},
    routes::{AppState, PageParam},
};

/// Structured browse parameters, named as the catalog names them
#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    #[serde(default)]
    page: PageParam,
    #[serde(default)]
    sort_by: SortBy,
    /// Comma-separated genre ids
    with_genres: Option<String>,
    year: Option<i32>,
    #[serde(rename = "vote_average.gte")]
    vote_gte: Option<f64>,
}

/// Handler for structured discovery without free text
pub async fn discover(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<MediaKind>,
    Query(params): Query<BrowseParams>,
) -> AppResult<Json<ResultPage>> {
    let query = DiscoverQuery {
        page: params.page.validate()?,
        sort_by: params.sort_by,
        with_genres: parse_genre_ids(params.with_genres.as_deref())?,
        year: params.year,
        vote_gte: params.vote_gte,
        ..Default::default()
    };

    let page = state.catalog.discover(kind, &query).await?;
    Ok(Json(page))
}

pub async fn genres(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<MediaKind>,
) -> AppResult<Json<Value>> {
    let genres = state.catalog.genres(kind).await?;
    Ok(Json(json!({ "genres": genres })))
}

pub async fn title_detail(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(MediaKind, u64)>,
) -> AppResult<Json<TitleDetail>> {
    let detail = state.catalog.detail(kind, id).await?;
    Ok(Json(detail))
}

fn parse_genre_ids(raw: Option<&str>) -> AppResult<Vec<u32>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<u32>()
                .map_err(|_| AppError::InvalidInput(format!("Invalid genre id: {}", id)))
        })
        .collect()
}
