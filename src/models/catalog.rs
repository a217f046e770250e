use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A movie or show record as returned by the catalog.
///
/// Only `id` and `popularity` are interpreted; every other field is carried
/// through untouched so callers see the catalog's own shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl CatalogItem {
    pub fn new(id: u64, popularity: f64) -> Self {
        Self {
            id,
            popularity,
            attributes: Map::new(),
        }
    }
}

/// One page of catalog results, in the catalog's paging shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultPage {
    #[serde(rename = "results", default)]
    pub items: Vec<CatalogItem>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

/// Catalog genre entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A keyword or person match from a lookup endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupCandidate {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Title record enriched with credits and the US content rating
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleDetail {
    #[serde(flatten)]
    pub record: Map<String, Value>,
    pub cast: Vec<CastCredit>,
    pub director: Option<String>,
    pub certification: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastCredit {
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Envelope for `/search/keyword` and `/search/person`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSearchResults<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Response from `/genre/{kind}/list`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Response from `/{kind}/{id}/credits`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCredits {
    #[serde(default)]
    pub cast: Vec<ApiCastMember>,
    #[serde(default)]
    pub crew: Vec<ApiCrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCrewMember {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

impl ApiCredits {
    /// Billing-order cast, truncated to `limit`
    pub fn top_cast(&self, limit: usize) -> Vec<CastCredit> {
        self.cast
            .iter()
            .take(limit)
            .map(|member| CastCredit {
                name: member.name.clone(),
                character: member.character.clone(),
                profile_path: member.profile_path.clone(),
            })
            .collect()
    }

    pub fn director(&self) -> Option<String> {
        self.crew
            .iter()
            .find(|member| member.job.as_deref() == Some("Director"))
            .map(|member| member.name.clone())
    }
}

/// Response from `/movie/{id}/release_dates`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiReleaseDates {
    #[serde(default)]
    pub results: Vec<ApiCountryReleaseDates>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountryReleaseDates {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<ApiReleaseDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiReleaseDate {
    #[serde(default)]
    pub certification: String,
}

impl ApiReleaseDates {
    /// First non-blank certification among the given country's releases
    pub fn certification_for(&self, country: &str) -> Option<String> {
        self.results
            .iter()
            .find(|entry| entry.iso_3166_1 == country)?
            .release_dates
            .iter()
            .map(|release| release.certification.trim())
            .find(|cert| !cert.is_empty())
            .map(str::to_string)
    }
}

/// Response from `/tv/{id}/content_ratings`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContentRatings {
    #[serde(default)]
    pub results: Vec<ApiContentRating>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiContentRating {
    pub iso_3166_1: String,
    #[serde(default)]
    pub rating: String,
}

impl ApiContentRatings {
    pub fn rating_for(&self, country: &str) -> Option<String> {
        self.results
            .iter()
            .find(|entry| entry.iso_3166_1 == country)
            .map(|entry| entry.rating.trim())
            .filter(|rating| !rating.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_page_deserializes_catalog_shape() {
        let json = r#"{
            "page": 2,
            "results": [
                {"id": 603, "title": "The Matrix", "popularity": 84.2, "vote_average": 8.2},
                {"id": 604, "title": "The Matrix Reloaded"}
            ],
            "total_pages": 7,
            "total_results": 131
        }"#;

        let page: ResultPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 7);
        assert_eq!(page.total_results, 131);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, 603);
        assert_eq!(page.items[0].popularity, 84.2);
        assert_eq!(page.items[0].attributes["title"], "The Matrix");
        // Missing popularity ranks as zero
        assert_eq!(page.items[1].popularity, 0.0);
    }

    #[test]
    fn test_catalog_item_round_trips_opaque_fields() {
        let json = r#"{"id":1399,"name":"Game of Thrones","popularity":12.5,"origin_country":["US"]}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["id"], 1399);
        assert_eq!(value["name"], "Game of Thrones");
        assert_eq!(value["origin_country"][0], "US");
    }

    #[test]
    fn test_result_page_serializes_items_as_results() {
        let page = ResultPage {
            items: vec![CatalogItem::new(1, 3.0)],
            page: 1,
            total_pages: 1,
            total_results: 1,
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["results"][0]["id"], 1);
        assert!(value.get("items").is_none());
    }

    #[test]
    fn test_credits_director_and_top_cast() {
        let json = r#"{
            "cast": [
                {"name": "Leonardo DiCaprio", "character": "Cobb", "profile_path": "/a.jpg"},
                {"name": "Joseph Gordon-Levitt", "character": "Arthur"},
                {"name": "Elliot Page", "character": "Ariadne"}
            ],
            "crew": [
                {"name": "Hans Zimmer", "job": "Original Music Composer"},
                {"name": "Christopher Nolan", "job": "Director"},
                {"name": "Christopher Nolan", "job": "Writer"}
            ]
        }"#;
        let credits: ApiCredits = serde_json::from_str(json).unwrap();

        assert_eq!(credits.director(), Some("Christopher Nolan".to_string()));
        let cast = credits.top_cast(2);
        assert_eq!(cast.len(), 2);
        assert_eq!(cast[0].name, "Leonardo DiCaprio");
        assert_eq!(cast[0].profile_path.as_deref(), Some("/a.jpg"));
        assert_eq!(cast[1].profile_path, None);
    }

    #[test]
    fn test_credits_without_director() {
        let credits = ApiCredits::default();
        assert_eq!(credits.director(), None);
        assert!(credits.top_cast(12).is_empty());
    }

    #[test]
    fn test_release_dates_skip_blank_certifications() {
        let json = r#"{"results": [
            {"iso_3166_1": "GB", "release_dates": [{"certification": "12A"}]},
            {"iso_3166_1": "US", "release_dates": [
                {"certification": ""},
                {"certification": " PG-13 "},
                {"certification": "R"}
            ]}
        ]}"#;
        let dates: ApiReleaseDates = serde_json::from_str(json).unwrap();

        assert_eq!(dates.certification_for("US"), Some("PG-13".to_string()));
        assert_eq!(dates.certification_for("GB"), Some("12A".to_string()));
        assert_eq!(dates.certification_for("FR"), None);
    }

    #[test]
    fn test_content_ratings_lookup() {
        let json = r#"{"results": [
            {"iso_3166_1": "DE", "rating": "16"},
            {"iso_3166_1": "US", "rating": "TV-MA"}
        ]}"#;
        let ratings: ApiContentRatings = serde_json::from_str(json).unwrap();

        assert_eq!(ratings.rating_for("US"), Some("TV-MA".to_string()));
        assert_eq!(ratings.rating_for("JP"), None);
    }
}
