use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use marquee_api::{
    error::{AppError, AppResult},
    models::{
        CastCredit, CatalogItem, DiscoverQuery, Genre, LookupCandidate, MediaKind, ResultPage,
        TitleDetail,
    },
    routes::{create_router, AppState},
    services::{
        providers::{CatalogProvider, KeywordLookup, PersonLookup},
        DiscoveryOrchestrator, FilterResolver, SearchService,
    },
};

/// In-process catalog with fixed data per keyword id
struct FakeCatalog;

fn item(id: u64, popularity: f64) -> CatalogItem {
    CatalogItem::new(id, popularity)
}

fn page(items: Vec<CatalogItem>) -> ResultPage {
    let total_results = items.len() as u64;
    ResultPage {
        items,
        page: 1,
        total_pages: 1,
        total_results,
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn discover(&self, kind: MediaKind, query: &DiscoverQuery) -> AppResult<ResultPage> {
        match query.with_keywords.as_slice() {
            [1] => Ok(page(vec![item(10, 10.0), item(20, 5.0)])),
            [2] => Ok(page(vec![item(20, 5.0), item(30, 20.0)])),
            [3] => Err(AppError::ExternalApi("keyword 3 unavailable".to_string())),
            _ => {
                // Echo the rendered request so tests can inspect it
                let params: Map<String, Value> = query
                    .to_params(kind)
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), Value::String(value)))
                    .collect();
                let mut echo = item(900, 1.0);
                echo.attributes.insert("params".to_string(), Value::Object(params));
                Ok(page(vec![echo]))
            }
        }
    }

    async fn search_text(&self, _kind: MediaKind, text: &str, _page: u32) -> AppResult<ResultPage> {
        let mut found = item(238, 80.0);
        found
            .attributes
            .insert("title".to_string(), json!(text.to_string()));
        Ok(page(vec![found]))
    }

    async fn genres(&self, _kind: MediaKind) -> AppResult<Vec<Genre>> {
        Ok(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 35,
                name: "Comedy".to_string(),
            },
        ])
    }

    async fn detail(&self, kind: MediaKind, id: u64) -> AppResult<TitleDetail> {
        if id == 404 {
            return Err(AppError::NotFound(format!("TMDB resource /{}/{}", kind, id)));
        }

        let mut record = Map::new();
        record.insert("id".to_string(), json!(id));
        record.insert("title".to_string(), json!("Inception"));

        Ok(TitleDetail {
            record,
            cast: vec![CastCredit {
                name: "Leonardo DiCaprio".to_string(),
                character: Some("Cobb".to_string()),
                profile_path: None,
            }],
            director: Some("Christopher Nolan".to_string()),
            certification: Some("PG-13".to_string()),
            fetched_at: Utc::now(),
        })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

struct FakeLookups;

#[async_trait::async_trait]
impl KeywordLookup for FakeLookups {
    async fn lookup_keywords(&self, phrase: &str) -> AppResult<Vec<LookupCandidate>> {
        let id = match phrase {
            "heist" => 1,
            "zombie" => 2,
            "robot" => 3,
            _ => return Ok(vec![]),
        };
        Ok(vec![LookupCandidate {
            id,
            name: phrase.to_string(),
        }])
    }
}

#[async_trait::async_trait]
impl PersonLookup for FakeLookups {
    async fn lookup_people(&self, name: &str) -> AppResult<Vec<LookupCandidate>> {
        match name {
            "tom hanks" => Ok(vec![LookupCandidate {
                id: 31,
                name: "Tom Hanks".to_string(),
            }]),
            _ => Err(AppError::ExternalApi("person search down".to_string())),
        }
    }
}

fn create_test_app() -> Router {
    let catalog: Arc<dyn CatalogProvider> = Arc::new(FakeCatalog);
    let lookups = Arc::new(FakeLookups);

    let search = SearchService::new(
        Arc::clone(&catalog),
        FilterResolver::new(lookups.clone(), lookups),
        DiscoveryOrchestrator::new(Arc::clone(&catalog)),
    );

    create_router(Arc::new(AppState { search, catalog }))
}

async fn get(uri: &str) -> Response {
    create_test_app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trace-abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-abc-123");
}

#[tokio::test]
async fn test_search_empty_query_rejected() {
    let response = get("/api/v1/search?q=%20%20").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Search query cannot be empty");
}

#[tokio::test]
async fn test_search_missing_query_rejected() {
    let response = get("/api/v1/search").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_page_out_of_range() {
    for uri in [
        "/api/v1/search?q=horror&page=0",
        "/api/v1/search?q=horror&page=501",
    ] {
        let response = get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_search_unknown_kind_rejected() {
    let response = get("/api/v1/search?q=horror&kind=anime").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_plain_text_fallback() {
    let response = get("/api/v1/search?q=The%20Godfather").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["results"][0]["id"], 238);
    assert_eq!(body["results"][0]["title"], "The Godfather");
    assert!(body.get("filters").is_none());
}

#[tokio::test]
async fn test_search_filtered_sorts_by_rating() {
    let response = get("/api/v1/search?q=highly%20rated%20horror&sort_by=popularity.asc").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let params = &body["results"][0]["params"];
    assert_eq!(params["sort_by"], "vote_average.desc");
    assert_eq!(params["with_genres"], "27");
    assert_eq!(params["vote_average.gte"], "7");
    assert_eq!(body["filters"]["vote_gte"], 7.0);
    assert_eq!(body["filters"]["genre_ids"], json!([27]));
}

#[tokio::test]
async fn test_search_resolves_cast_and_tolerates_lookup_failure() {
    let response =
        get("/api/v1/search?q=comedy%20with%20tom%20hanks%2C%20directed%20by%20someone%20unknown")
            .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let params = &body["results"][0]["params"];
    assert_eq!(params["with_cast"], "31");
    assert!(params.get("with_crew").is_none());
}

#[tokio::test]
async fn test_search_or_mode_merges_keywords() {
    let response = get("/api/v1/search?q=zombie%20heist%20robot%20movies&keywords=or").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let ids: Vec<u64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect();

    // Keyword 3 fails; the other two are merged by popularity
    assert_eq!(ids, vec![30, 10, 20]);
    assert_eq!(body["total_results"], 3);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(
        body["filters"]["keyword_terms"],
        json!(["heist", "zombie", "robot"])
    );
}

#[tokio::test]
async fn test_search_and_mode_single_query() {
    let response = get("/api/v1/search?q=zombie%20heist%20robot%20movies").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["results"][0]["params"]["with_keywords"], "1,2,3");
}

#[tokio::test]
async fn test_interpret_endpoint() {
    let response = get("/api/v1/interpret?q=rated%208.5%20anime%20from%202015&kind=tv").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["vote_gte"], 8.5);
    assert_eq!(body["original_language"], "ja");
    assert_eq!(body["year_gte"], 2015);
    assert_eq!(body["year_lte"], 2015);
    assert_eq!(body["certification_country"], "US");
    assert_eq!(body["has_filters"], true);
}

#[tokio::test]
async fn test_interpret_plain_title_has_no_filters() {
    let body = json_body(get("/api/v1/interpret?q=Casablanca").await).await;
    assert_eq!(body["has_filters"], false);
    assert_eq!(body["genre_ids"], json!([]));
}

#[tokio::test]
async fn test_discover_browse_renders_params() {
    let response =
        get("/api/v1/discover/tv?with_genres=18,80&year=2008&vote_average.gte=8&page=2").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let params = &body["results"][0]["params"];
    assert_eq!(params["with_genres"], "18,80");
    assert_eq!(params["first_air_date_year"], "2008");
    assert_eq!(params["vote_average.gte"], "8");
    assert_eq!(params["page"], "2");
    assert_eq!(params["sort_by"], "popularity.desc");
}

#[tokio::test]
async fn test_discover_rejects_bad_genre_ids() {
    let response = get("/api/v1/discover/movie?with_genres=action").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_discover_unknown_kind_rejected() {
    let response = get("/api/v1/discover/podcast").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_genres() {
    let response = get("/api/v1/genres/movie").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["genres"][0]["id"], 28);
    assert_eq!(body["genres"][1]["name"], "Comedy");
}

#[tokio::test]
async fn test_title_detail() {
    let response = get("/api/v1/titles/movie/27205").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], 27205);
    assert_eq!(body["title"], "Inception");
    assert_eq!(body["director"], "Christopher Nolan");
    assert_eq!(body["certification"], "PG-13");
    assert_eq!(body["cast"][0]["character"], "Cobb");
    assert!(body.get("fetched_at").is_some());
}

#[tokio::test]
async fn test_title_detail_not_found() {
    let response = get("/api/v1/titles/tv/404").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
