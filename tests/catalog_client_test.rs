//! Catalog API client tests
//!
//! Tests request shape, response parsing and error classification.

use mockito::{Matcher, Server};

use catalognav::api::CatalogClient;
use catalognav::codec::ApiQuery;
use catalognav::models::PlayTarget;
use catalognav::{ApiErrorKind, Category, ContentApi};

fn query(pairs: &[(&str, &str)]) -> ApiQuery {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Browse Tests
// =============================================================================

#[tokio::test]
async fn test_browse_movies_parses_page() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "count": 45,
        "list": [
            {
                "video_info": {"type": "movie", "id": 101},
                "item_info": {
                    "label": "Nasimi",
                    "art": {"poster": "https://img.example/101.jpg"},
                    "info": {"title": "Nasimi", "originaltitle": "Nəsimi", "year": 1973, "genre": "Drama"}
                }
            },
            {
                "video_info": {"type": "movie", "id": "102"},
                "item_info": {"label": "Babek", "info": {"title": "Babek"}}
            }
        ]
    }"#;

    let mock = server
        .mock("GET", "/browse/movies")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("genre".into(), "4".into()),
        ]))
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let page = client
        .browse_movies(&query(&[("page", "2"), ("genre", "4")]))
        .await
        .unwrap();

    mock.assert_async().await;

    assert_eq!(page.total_count, 45);
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[0].video_info.id, "101");
    assert_eq!(page.records[1].video_info.id, "102");

    let info = &page.records[0].item_info;
    assert_eq!(info.info.originaltitle.as_deref(), Some("Nəsimi"));
    assert_eq!(info.info.year, Some(1973));
    assert_eq!(
        info.art.get("poster").map(String::as_str),
        Some("https://img.example/101.jpg")
    );
}

#[tokio::test]
async fn test_browse_episodes_with_title() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/browse/episodes")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("tvserie_id".into(), "7".into()),
            Matcher::UrlEncoded("season".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"count": 1, "title": "Kitab - Season 2", "list": [
                {"video_info": {"type": "episodes", "id": 31, "tvserie_id": "7", "season": 2, "episode": "5"}}
            ]}"#,
        )
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let page = client
        .browse_episodes(&query(&[("tvserie_id", "7"), ("season", "2")]))
        .await
        .unwrap();

    mock.assert_async().await;

    assert_eq!(page.title.as_deref(), Some("Kitab - Season 2"));
    let video = &page.records[0].video_info;
    assert_eq!(video.tvserie_id.as_deref(), Some("7"));
    assert_eq!(video.season, Some(2));
    assert_eq!(video.episode, Some(5));
}

#[tokio::test]
async fn test_browse_uses_category_path() {
    let mut server = Server::new_async().await;

    let tv = server
        .mock("GET", "/browse/tvseries")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"count": 0, "list": []}"#)
        .create_async()
        .await;
    let related = server
        .mock("GET", "/browse/movie_related")
        .match_query(Matcher::UrlEncoded("id".into(), "99".into()))
        .with_status(200)
        .with_body(r#"{"count": 0}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(format!("{}/", server.url()));
    assert!(client.browse_tv_series(&ApiQuery::new()).await.unwrap().records.is_empty());
    assert_eq!(
        client
            .browse_related(&query(&[("id", "99")]))
            .await
            .unwrap()
            .total_count,
        0
    );

    tv.assert_async().await;
    related.assert_async().await;
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[tokio::test]
async fn test_category_and_genre_lists() {
    let mut server = Server::new_async().await;

    let categories = server
        .mock("GET", "/categories/videos")
        .with_status(200)
        .with_body(r#"[{"id": 12, "title": "Cartoons"}, {"id": "13", "title": "Music"}]"#)
        .create_async()
        .await;
    let genres = server
        .mock("GET", "/genres")
        .with_status(200)
        .with_body(r#"[{"id": 4, "title": "Drama"}]"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());

    let options = client.category_list(Category::Videos).await.unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].id, "12");
    assert_eq!(options[1].title, "Music");

    let options = client.genre_list().await.unwrap();
    assert_eq!(options[0].id, "4");

    categories.assert_async().await;
    genres.assert_async().await;
}

#[tokio::test]
async fn test_movie_detail() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movies/101")
        .with_status(200)
        .with_body(r#"{"video_quality": "1080p", "audio_quality": "AC3", "plot": "A poet.", "rating": 7.9}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let details = client.movie_detail("101").await.unwrap();

    mock.assert_async().await;
    assert_eq!(details.video_quality.as_deref(), Some("1080p"));
    assert_eq!(details.plot.as_deref(), Some("A poet."));
    assert_eq!(details.extra.get("rating"), Some(&serde_json::json!(7.9)));
}

#[tokio::test]
async fn test_stream_url() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/play")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "episodes".into()),
            Matcher::UrlEncoded("id".into(), "31".into()),
            Matcher::UrlEncoded("tvserie_id".into(), "7".into()),
            Matcher::UrlEncoded("season".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"url": "https://cdn.example/31.m3u8"}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let url = client
        .stream_url(&PlayTarget {
            kind: "episodes".into(),
            id: "31".into(),
            tvserie_id: Some("7".into()),
            season: Some("2".into()),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(url, "https://cdn.example/31.m3u8");
}

#[tokio::test]
async fn test_stream_url_missing() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/play")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"url": ""}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client
        .stream_url(&PlayTarget {
            kind: "movie".into(),
            id: "1".into(),
            tvserie_id: None,
            season: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Other);
    assert_eq!(err.message, "No stream available");
}

// =============================================================================
// Error Classification Tests
// =============================================================================

#[tokio::test]
async fn test_not_found_is_other() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movies/404")
        .with_status(404)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.movie_detail("404").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Other);
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_server_error_is_other() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/genres")
        .with_status(500)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.genre_list().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Other);
    assert_eq!(err.message, "Server error: 500");
}

#[tokio::test]
async fn test_malformed_json_is_other() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/browse/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.browse_videos(&ApiQuery::new()).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Other);
    assert!(err.message.starts_with("JSON parse error"));
}

#[tokio::test]
async fn test_unreachable_host_is_connection() {
    // Port 9 (discard) is closed on test machines
    let client = CatalogClient::new("http://127.0.0.1:9");
    let err = client.browse_movies(&ApiQuery::new()).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Connection);
    assert!(err.is_connection());
}
