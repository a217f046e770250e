use futures::future::join_all;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{FilterSet, KeywordMode, LookupCandidate, ResolvedFilterSet},
    services::{
        lexicon::keyword_lookup_phrase,
        providers::{KeywordLookup, PersonLookup},
    },
};

/// Keyword terms looked up when combining with AND; OR mode looks up every term
const AND_MODE_KEYWORD_LIMIT: usize = 3;

/// Outcome of a single lookup. Only `Resolved` contributes an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupOutcome {
    Resolved(u64),
    NotFound,
    Failed,
}

impl LookupOutcome {
    fn from_result(result: AppResult<Vec<LookupCandidate>>, kind: &'static str, term: &str) -> Self {
        match result {
            Ok(candidates) => match candidates.first() {
                Some(best) => LookupOutcome::Resolved(best.id),
                None => {
                    tracing::debug!(lookup = kind, term = %term, "No catalog match");
                    LookupOutcome::NotFound
                }
            },
            Err(e) => {
                tracing::warn!(lookup = kind, term = %term, error = %e, "Lookup failed, dropping term");
                LookupOutcome::Failed
            }
        }
    }

    fn id(self) -> Option<u64> {
        match self {
            LookupOutcome::Resolved(id) => Some(id),
            LookupOutcome::NotFound | LookupOutcome::Failed => None,
        }
    }
}

/// Turns keyword phrases and person names into catalog ids.
///
/// Resolution never fails: an unmatched or failed lookup drops that one
/// constraint and the rest of the filter set is kept.
#[derive(Clone)]
pub struct FilterResolver {
    keywords: Arc<dyn KeywordLookup>,
    people: Arc<dyn PersonLookup>,
}

impl FilterResolver {
    pub fn new(keywords: Arc<dyn KeywordLookup>, people: Arc<dyn PersonLookup>) -> Self {
        Self { keywords, people }
    }

    pub async fn resolve(&self, filters: FilterSet, mode: KeywordMode) -> ResolvedFilterSet {
        let term_limit = match mode {
            KeywordMode::And => AND_MODE_KEYWORD_LIMIT,
            KeywordMode::Or => usize::MAX,
        };

        let keyword_lookups = join_all(
            filters
                .keyword_terms
                .iter()
                .take(term_limit)
                .map(|term| self.resolve_keyword(term)),
        );

        let (keyword_ids, cast_id, crew_id) = tokio::join!(
            keyword_lookups,
            self.resolve_person(filters.cast_name.as_deref()),
            self.resolve_person(filters.crew_name.as_deref()),
        );

        let keyword_ids: Vec<u64> = keyword_ids.into_iter().filter_map(LookupOutcome::id).collect();

        tracing::info!(
            mode = ?mode,
            terms = filters.keyword_terms.len(),
            keyword_ids = keyword_ids.len(),
            cast_resolved = cast_id.is_some(),
            crew_resolved = crew_id.is_some(),
            "Filters resolved"
        );

        ResolvedFilterSet {
            filters,
            mode,
            keyword_ids,
            cast_id,
            crew_id,
        }
    }

    async fn resolve_keyword(&self, term: &str) -> LookupOutcome {
        let phrase = keyword_lookup_phrase(term);
        let result = self.keywords.lookup_keywords(phrase).await;
        LookupOutcome::from_result(result, "keyword", phrase)
    }

    async fn resolve_person(&self, name: Option<&str>) -> Option<u64> {
        let name = name?;
        let result = self.people.lookup_people(name).await;
        LookupOutcome::from_result(result, "person", name).id()
    }
}
