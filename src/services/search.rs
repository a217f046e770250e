use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{FilterSet, KeywordMode, MediaKind, ResultPage, SortBy},
    services::{
        discovery::DiscoveryOrchestrator, interpreter::interpret, providers::CatalogProvider,
        resolver::FilterResolver,
    },
};

/// One free-text search as received from a caller
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub kind: MediaKind,
    pub page: u32,
    pub mode: KeywordMode,
    /// Requested ordering for the filtered path. Ignored by plain text search.
    pub sort_by: Option<SortBy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    #[serde(flatten)]
    pub page: ResultPage,
    /// The interpreted filters, present only when the filtered path ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSet>,
}

/// Free text → interpreted filters → catalog results.
///
/// Text that yields no filters is sent to the catalog's title search as-is.
#[derive(Clone)]
pub struct SearchService {
    catalog: Arc<dyn CatalogProvider>,
    resolver: FilterResolver,
    orchestrator: DiscoveryOrchestrator,
}

impl SearchService {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        resolver: FilterResolver,
        orchestrator: DiscoveryOrchestrator,
    ) -> Self {
        Self {
            catalog,
            resolver,
            orchestrator,
        }
    }

    pub async fn search(&self, request: &SearchRequest) -> AppResult<SearchOutcome> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let filters = interpret(query, request.kind);

        if !filters.has_filters() {
            tracing::info!(query = %query, kind = %request.kind, "No filters found, using text search");
            let page = self
                .catalog
                .search_text(request.kind, query, request.page)
                .await?;
            return Ok(SearchOutcome {
                page,
                filters: None,
            });
        }

        tracing::debug!(query = %query, filters = ?filters, "Query interpreted");

        let sort_by = if filters.vote_gte.is_some() {
            SortBy::RatingDesc
        } else {
            request.sort_by.unwrap_or_default()
        };

        let resolved = self.resolver.resolve(filters, request.mode).await;
        let page = self
            .orchestrator
            .search(&resolved, request.kind, request.page, sort_by)
            .await?;

        tracing::info!(
            query = %query,
            kind = %request.kind,
            page = request.page,
            results = page.items.len(),
            total_results = page.total_results,
            "Filtered search completed"
        );

        Ok(SearchOutcome {
            page,
            filters: Some(resolved.filters),
        })
    }
}
