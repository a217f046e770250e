//! Catalog data provider abstraction.
//!
//! The discovery pipeline only talks to these traits. [`tmdb::TmdbProvider`]
//! implements all three against TMDB; tests substitute mocks.

use crate::{
    error::AppResult,
    models::{DiscoverQuery, Genre, LookupCandidate, MediaKind, ResultPage, TitleDetail},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Read access to the film and series catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// One page of structured discovery results
    async fn discover(&self, kind: MediaKind, query: &DiscoverQuery) -> AppResult<ResultPage>;

    /// One page of plain title-text search results
    async fn search_text(&self, kind: MediaKind, text: &str, page: u32) -> AppResult<ResultPage>;

    async fn genres(&self, kind: MediaKind) -> AppResult<Vec<Genre>>;

    /// Full record for a single title, with credits and content rating
    async fn detail(&self, kind: MediaKind, id: u64) -> AppResult<TitleDetail>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Keyword phrase → catalog keyword candidates, best match first
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeywordLookup: Send + Sync {
    async fn lookup_keywords(&self, phrase: &str) -> AppResult<Vec<LookupCandidate>>;
}

/// Person name → catalog person candidates, best match first
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PersonLookup: Send + Sync {
    async fn lookup_people(&self, name: &str) -> AppResult<Vec<LookupCandidate>>;
}
