use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod catalog;
pub mod filters;

pub use catalog::{
    ApiContentRatings, ApiCredits, ApiGenreList, ApiReleaseDates, ApiSearchResults, CastCredit,
    CatalogItem, Genre, LookupCandidate, ResultPage, TitleDetail,
};
pub use filters::{DiscoverQuery, FilterSet, KeywordMode, ResolvedFilterSet, SortBy};

/// Which half of the catalog a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
