use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, DiscoverQuery, MediaKind, ResolvedFilterSet, ResultPage, SortBy},
    services::providers::CatalogProvider,
};

/// Items per merged page, matching the catalog's own page size
pub const PAGE_SIZE: usize = 20;

/// Deepest page the catalog will serve
pub const MAX_CATALOG_PAGE: u32 = 500;

/// Runs resolved filters against the catalog.
///
/// A single keyword combination is one discovery call passed straight
/// through. OR mode with several keyword ids queries each id on its own and
/// unions the results, deduplicating and re-ranking by popularity locally.
#[derive(Clone)]
pub struct DiscoveryOrchestrator {
    catalog: Arc<dyn CatalogProvider>,
}

impl DiscoveryOrchestrator {
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog }
    }

    pub async fn search(
        &self,
        resolved: &ResolvedFilterSet,
        kind: MediaKind,
        page: u32,
        sort_by: SortBy,
    ) -> AppResult<ResultPage> {
        let base = DiscoverQuery::from_resolved(resolved, page, sort_by);

        if !resolved.fans_out() {
            return self.catalog.discover(kind, &base).await;
        }

        self.search_each_keyword(&base, &resolved.keyword_ids, kind, page)
            .await
    }

    async fn search_each_keyword(
        &self,
        base: &DiscoverQuery,
        keyword_ids: &[u64],
        kind: MediaKind,
        page: u32,
    ) -> AppResult<ResultPage> {
        tracing::info!(
            keywords = keyword_ids.len(),
            kind = %kind,
            page = page,
            "Fanning out keyword discovery"
        );

        let pages_needed = catalog_pages_needed(page);

        // Sub-queries run concurrently on this task, so dropping the search
        // also cancels every one still in flight.
        let outcomes = join_all(keyword_ids.iter().map(|&keyword_id| {
            let query = base.for_keyword(keyword_id, 1);
            let catalog = Arc::clone(&self.catalog);
            async move {
                let outcome = collect_keyword_items(catalog, kind, query, pages_needed).await;
                (keyword_id, outcome)
            }
        }))
        .await;

        let mut item_lists = Vec::new();
        let mut errors = Vec::new();

        for (keyword_id, outcome) in outcomes {
            match outcome {
                Ok(items) => item_lists.push(items),
                Err(e) => {
                    tracing::error!(keyword_id = keyword_id, error = %e, "Keyword discovery failed");
                    errors.push(e);
                }
            }
        }

        if !errors.is_empty() {
            tracing::warn!(
                success_count = item_lists.len(),
                error_count = errors.len(),
                "Partial keyword discovery failure"
            );
        }

        if item_lists.is_empty() && !errors.is_empty() {
            return Err(AppError::ExternalApi(
                "Failed to fetch results for any keyword".to_string(),
            ));
        }

        Ok(merge_pages(item_lists, page))
    }
}

/// Catalog pages each sub-query must read so the merged page can be filled
fn catalog_pages_needed(page: u32) -> u32 {
    let items = page as usize * PAGE_SIZE;
    let pages = items.div_ceil(PAGE_SIZE) as u32;
    pages.clamp(1, MAX_CATALOG_PAGE)
}

/// Reads pages `1..=pages_needed` of one sub-query, stopping at its last page
async fn collect_keyword_items(
    catalog: Arc<dyn CatalogProvider>,
    kind: MediaKind,
    query: DiscoverQuery,
    pages_needed: u32,
) -> AppResult<Vec<CatalogItem>> {
    let first = catalog.discover(kind, &query).await?;
    let last_page = pages_needed.min(first.total_pages);
    let mut items = first.items;

    for page in 2..=last_page {
        let next_query = DiscoverQuery {
            page,
            ..query.clone()
        };
        let next = catalog.discover(kind, &next_query).await?;
        items.extend(next.items);
    }

    Ok(items)
}

/// Unions per-keyword result lists into one page.
///
/// Lists are concatenated in keyword order, the first occurrence of each id
/// is kept, and the union is stably sorted by descending popularity before
/// slicing out `page`.
pub fn merge_pages(item_lists: Vec<Vec<CatalogItem>>, page: u32) -> ResultPage {
    let mut seen = HashSet::new();
    let mut merged: Vec<CatalogItem> = item_lists
        .into_iter()
        .flatten()
        .filter(|item| seen.insert(item.id))
        .collect();

    merged.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

    let total_results = merged.len();
    let total_pages = total_results.div_ceil(PAGE_SIZE).max(1) as u32;
    let start = (page.max(1) as usize - 1) * PAGE_SIZE;
    let items = merged.into_iter().skip(start).take(PAGE_SIZE).collect();

    ResultPage {
        items,
        page,
        total_pages,
        total_results: total_results as u64,
    }
}
