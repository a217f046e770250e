//! TMDB provider
//!
//! Implements every catalog trait against the TMDB v3 REST API. Lookups,
//! genre lists and title details go through the Redis cache; discovery and
//! text search always hit the API.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        filters::DEFAULT_CERTIFICATION_COUNTRY, ApiContentRatings, ApiCredits, ApiGenreList,
        ApiReleaseDates, ApiSearchResults, DiscoverQuery, Genre, LookupCandidate, MediaKind,
        ResultPage, TitleDetail,
    },
    services::providers::{CatalogProvider, KeywordLookup, PersonLookup},
};
use chrono::Utc;
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const LOOKUP_CACHE_TTL: u64 = 86400; // 1 day
const GENRE_CACHE_TTL: u64 = 86400; // 1 day
const DETAIL_CACHE_TTL: u64 = 3600; // 1 hour
const DETAIL_CAST_LIMIT: usize = 12;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            cache,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// GET `path` with the credential and language attached, decoding the body as `T`
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.url(path))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {}", path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Unreadable TMDB response: {}", e)))
    }

    async fn certification(&self, kind: MediaKind, id: u64) -> AppResult<Option<String>> {
        match kind {
            MediaKind::Movie => {
                let dates: ApiReleaseDates = self
                    .get_json(&format!("/movie/{}/release_dates", id), &[])
                    .await?;
                Ok(dates.certification_for(DEFAULT_CERTIFICATION_COUNTRY))
            }
            MediaKind::Tv => {
                let ratings: ApiContentRatings = self
                    .get_json(&format!("/tv/{}/content_ratings", id), &[])
                    .await?;
                Ok(ratings.rating_for(DEFAULT_CERTIFICATION_COUNTRY))
            }
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn discover(&self, kind: MediaKind, query: &DiscoverQuery) -> AppResult<ResultPage> {
        let page: ResultPage = self
            .get_json(&format!("/discover/{}", kind), &query.to_params(kind))
            .await?;

        tracing::debug!(
            kind = %kind,
            page = page.page,
            results = page.items.len(),
            total_results = page.total_results,
            provider = self.name(),
            "Discovery page fetched"
        );

        Ok(page)
    }

    async fn search_text(&self, kind: MediaKind, text: &str, page: u32) -> AppResult<ResultPage> {
        let result: ResultPage = self
            .get_json(
                &format!("/search/{}", kind),
                &[("query", text.to_string()), ("page", page.to_string())],
            )
            .await?;

        tracing::info!(
            kind = %kind,
            query = %text,
            results = result.items.len(),
            provider = self.name(),
            "Text search completed"
        );

        Ok(result)
    }

    async fn genres(&self, kind: MediaKind) -> AppResult<Vec<Genre>> {
        cached!(
            self.cache,
            CacheKey::Genres(kind),
            GENRE_CACHE_TTL,
            async move {
                let list: ApiGenreList = self
                    .get_json(&format!("/genre/{}/list", kind), &[])
                    .await?;
                Ok::<_, AppError>(list.genres)
            }
        )
    }

    async fn detail(&self, kind: MediaKind, id: u64) -> AppResult<TitleDetail> {
        cached!(
            self.cache,
            CacheKey::TitleDetail(kind, id),
            DETAIL_CACHE_TTL,
            async move {
                let base_path = format!("/{}/{}", kind, id);
                let credits_path = format!("{}/credits", base_path);

                let (record, credits, certification) = tokio::try_join!(
                    self.get_json::<Map<String, Value>>(&base_path, &[]),
                    self.get_json::<ApiCredits>(&credits_path, &[]),
                    self.certification(kind, id),
                )?;

                tracing::info!(
                    kind = %kind,
                    id = id,
                    provider = self.name(),
                    "Title detail fetched"
                );

                Ok::<_, AppError>(TitleDetail {
                    record,
                    cast: credits.top_cast(DETAIL_CAST_LIMIT),
                    director: credits.director(),
                    certification,
                    fetched_at: Utc::now(),
                })
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[async_trait::async_trait]
impl KeywordLookup for TmdbProvider {
    async fn lookup_keywords(&self, phrase: &str) -> AppResult<Vec<LookupCandidate>> {
        cached!(
            self.cache,
            CacheKey::KeywordLookup(phrase.to_string()),
            LOOKUP_CACHE_TTL,
            async move {
                let found: ApiSearchResults<LookupCandidate> = self
                    .get_json("/search/keyword", &[("query", phrase.to_string())])
                    .await?;
                Ok::<_, AppError>(found.results)
            }
        )
    }
}

#[async_trait::async_trait]
impl PersonLookup for TmdbProvider {
    async fn lookup_people(&self, name: &str) -> AppResult<Vec<LookupCandidate>> {
        cached!(
            self.cache,
            CacheKey::PersonLookup(name.to_string()),
            LOOKUP_CACHE_TTL,
            async move {
                let found: ApiSearchResults<LookupCandidate> = self
                    .get_json("/search/person", &[("query", name.to_string())])
                    .await?;
                Ok::<_, AppError>(found.results)
            }
        )
    }
}
