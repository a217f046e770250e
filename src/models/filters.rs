use serde::{Deserialize, Serialize};

use super::MediaKind;

pub const DEFAULT_CERTIFICATION_COUNTRY: &str = "US";

/// Structured constraints extracted from a free-text description.
///
/// Person names and keyword phrases are still text here; see
/// [`ResolvedFilterSet`] for their catalog ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSet {
    /// Genre ids for the requested media kind, deduplicated, in dictionary order
    pub genre_ids: Vec<u32>,
    /// Matched keyword phrases, in dictionary order
    pub keyword_terms: Vec<String>,
    pub year_gte: Option<i32>,
    pub year_lte: Option<i32>,
    pub vote_gte: Option<f64>,
    /// Minutes
    pub runtime_gte: Option<u32>,
    /// Minutes
    pub runtime_lte: Option<u32>,
    pub certification: Option<String>,
    pub certification_country: String,
    /// ISO 639-1 code
    pub original_language: Option<String>,
    pub cast_name: Option<String>,
    pub crew_name: Option<String>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            genre_ids: Vec::new(),
            keyword_terms: Vec::new(),
            year_gte: None,
            year_lte: None,
            vote_gte: None,
            runtime_gte: None,
            runtime_lte: None,
            certification: None,
            certification_country: DEFAULT_CERTIFICATION_COUNTRY.to_string(),
            original_language: None,
            cast_name: None,
            crew_name: None,
        }
    }
}

impl FilterSet {
    /// True when any extracted field is populated.
    ///
    /// `certification_country` always carries a value and is not counted.
    pub fn has_filters(&self) -> bool {
        !self.genre_ids.is_empty()
            || !self.keyword_terms.is_empty()
            || self.year_gte.is_some()
            || self.year_lte.is_some()
            || self.vote_gte.is_some()
            || self.runtime_gte.is_some()
            || self.runtime_lte.is_some()
            || self.certification.is_some()
            || self.original_language.is_some()
            || self.cast_name.is_some()
            || self.crew_name.is_some()
    }
}

/// How multiple keyword ids are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMode {
    /// One query carrying every keyword id (catalog intersects them)
    #[default]
    And,
    /// One query per keyword id, results unioned and re-ranked locally
    Or,
}

/// A [`FilterSet`] with its indirect references looked up
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilterSet {
    pub filters: FilterSet,
    pub mode: KeywordMode,
    /// Ids of the keyword terms that resolved, in term order
    pub keyword_ids: Vec<u64>,
    pub cast_id: Option<u64>,
    pub crew_id: Option<u64>,
}

impl ResolvedFilterSet {
    /// Whether discovery has to issue one query per keyword id
    pub fn fans_out(&self) -> bool {
        self.mode == KeywordMode::Or && self.keyword_ids.len() > 1
    }
}

/// Result ordering understood by the discovery endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "popularity.asc")]
    PopularityAsc,
    #[serde(rename = "vote_average.desc")]
    RatingDesc,
    #[serde(rename = "vote_average.asc")]
    RatingAsc,
    #[serde(
        rename = "release_date.desc",
        alias = "primary_release_date.desc",
        alias = "first_air_date.desc"
    )]
    ReleaseDesc,
    #[serde(
        rename = "release_date.asc",
        alias = "primary_release_date.asc",
        alias = "first_air_date.asc"
    )]
    ReleaseAsc,
}

impl SortBy {
    /// Parameter value for the given media kind; release dates are named per kind
    pub fn as_param(self, kind: MediaKind) -> &'static str {
        match (self, kind) {
            (SortBy::PopularityDesc, _) => "popularity.desc",
            (SortBy::PopularityAsc, _) => "popularity.asc",
            (SortBy::RatingDesc, _) => "vote_average.desc",
            (SortBy::RatingAsc, _) => "vote_average.asc",
            (SortBy::ReleaseDesc, MediaKind::Movie) => "primary_release_date.desc",
            (SortBy::ReleaseDesc, MediaKind::Tv) => "first_air_date.desc",
            (SortBy::ReleaseAsc, MediaKind::Movie) => "primary_release_date.asc",
            (SortBy::ReleaseAsc, MediaKind::Tv) => "first_air_date.asc",
        }
    }
}

/// Parameters of a single discovery call
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub page: u32,
    pub sort_by: SortBy,
    pub with_genres: Vec<u32>,
    pub with_keywords: Vec<u64>,
    pub with_cast: Option<u64>,
    pub with_crew: Option<u64>,
    pub vote_gte: Option<f64>,
    pub runtime_gte: Option<u32>,
    pub runtime_lte: Option<u32>,
    pub certification: Option<String>,
    pub certification_country: String,
    pub original_language: Option<String>,
    pub year_gte: Option<i32>,
    pub year_lte: Option<i32>,
    /// Exact release (or first-air) year, used by structured browsing
    pub year: Option<i32>,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            page: 1,
            sort_by: SortBy::default(),
            with_genres: Vec::new(),
            with_keywords: Vec::new(),
            with_cast: None,
            with_crew: None,
            vote_gte: None,
            runtime_gte: None,
            runtime_lte: None,
            certification: None,
            certification_country: DEFAULT_CERTIFICATION_COUNTRY.to_string(),
            original_language: None,
            year_gte: None,
            year_lte: None,
            year: None,
        }
    }
}

impl DiscoverQuery {
    /// Maps every resolved field onto a query; keyword ids are all included
    pub fn from_resolved(resolved: &ResolvedFilterSet, page: u32, sort_by: SortBy) -> Self {
        let filters = &resolved.filters;
        Self {
            page,
            sort_by,
            with_genres: filters.genre_ids.clone(),
            with_keywords: resolved.keyword_ids.clone(),
            with_cast: resolved.cast_id,
            with_crew: resolved.crew_id,
            vote_gte: filters.vote_gte,
            runtime_gte: filters.runtime_gte,
            runtime_lte: filters.runtime_lte,
            certification: filters.certification.clone(),
            certification_country: filters.certification_country.clone(),
            original_language: filters.original_language.clone(),
            year_gte: filters.year_gte,
            year_lte: filters.year_lte,
            year: None,
        }
    }

    /// Copy of this query restricted to a single keyword id at the given page
    pub fn for_keyword(&self, keyword_id: u64, page: u32) -> Self {
        Self {
            page,
            with_keywords: vec![keyword_id],
            ..self.clone()
        }
    }

    /// Renders the query as catalog request parameters
    pub fn to_params(&self, kind: MediaKind) -> Vec<(&'static str, String)> {
        let (date_gte, date_lte, year_param) = match kind {
            MediaKind::Movie => (
                "primary_release_date.gte",
                "primary_release_date.lte",
                "primary_release_year",
            ),
            MediaKind::Tv => (
                "first_air_date.gte",
                "first_air_date.lte",
                "first_air_date_year",
            ),
        };

        let mut params = vec![
            ("page", self.page.to_string()),
            ("sort_by", self.sort_by.as_param(kind).to_string()),
        ];

        if !self.with_genres.is_empty() {
            params.push(("with_genres", join_ids(&self.with_genres)));
        }
        if !self.with_keywords.is_empty() {
            params.push(("with_keywords", join_ids(&self.with_keywords)));
        }
        if let Some(cast) = self.with_cast {
            params.push(("with_cast", cast.to_string()));
        }
        if let Some(crew) = self.with_crew {
            params.push(("with_crew", crew.to_string()));
        }
        if let Some(vote) = self.vote_gte {
            params.push(("vote_average.gte", vote.to_string()));
        }
        if let Some(runtime) = self.runtime_gte {
            params.push(("with_runtime.gte", runtime.to_string()));
        }
        if let Some(runtime) = self.runtime_lte {
            params.push(("with_runtime.lte", runtime.to_string()));
        }
        if let Some(certification) = &self.certification {
            params.push(("certification", certification.clone()));
            params.push(("certification_country", self.certification_country.clone()));
        }
        if let Some(language) = &self.original_language {
            params.push(("with_original_language", language.clone()));
        }
        if let Some(year) = self.year_gte {
            params.push((date_gte, format!("{}-01-01", year)));
        }
        if let Some(year) = self.year_lte {
            params.push((date_lte, format!("{}-12-31", year)));
        }
        if let Some(year) = self.year {
            params.push((year_param, year.to_string()));
        }

        params
    }
}

fn join_ids<T: ToString>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
