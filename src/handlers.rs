//! HTTP handlers for the recommendation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::recommend::{Recommendation, Recommender};

pub const WELCOME: &str = "Welcome to the Enhanced Song Recommendation System!";

/// Body of `POST /recommend`.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub song_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
}

/// GET / - Welcome text.
pub async fn home() -> &'static str {
    WELCOME
}

/// GET /health - Health check.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /recommend - Sentiment label plus up to five tracks.
pub async fn recommend(
    State(recommender): State<Recommender>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<Recommendation>, AppError> {
    let Json(req) = body.map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;

    let song_name = req
        .song_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Song name is required".into()))?;

    let result = recommender
        .recommend(song_name, req.artist_name.as_deref())
        .await;

    Ok(Json(result))
}

/// Build the API router.
pub fn router() -> Router<Recommender> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/recommend", post(recommend))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::util::ServiceExt; // for `oneshot`
    use tower_http::cors::CorsLayer;

    use super::*;
    use crate::recommend::tests::{track, FakeCatalog, FixedScorer};

    fn app(catalog: Arc<FakeCatalog>, score: f64) -> Router {
        let recommender = Recommender::new(catalog, Arc::new(FixedScorer(score)));
        router()
            .layer(CorsLayer::permissive())
            .with_state(recommender)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/recommend")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body")
            .to_vec()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).expect("Should parse JSON")
    }

    #[tokio::test]
    async fn home_returns_welcome_text() {
        let app = app(Arc::new(FakeCatalog::default()), 0.0);
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, WELCOME.as_bytes());
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app(Arc::new(FakeCatalog::default()), 0.0);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn missing_song_name_is_rejected_without_searching() {
        for body in [
            r#"{}"#,
            r#"{"artist_name": "Adele"}"#,
            r#"{"song_name": "", "artist_name": "Adele"}"#,
            r#"{"song_name": null}"#,
        ] {
            let catalog = Arc::new(FakeCatalog::default());
            let response = app(catalog.clone(), 0.9).oneshot(post_json(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
            assert_eq!(
                body_json(response).await,
                serde_json::json!({ "error": "Song name is required" })
            );
            assert!(catalog.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let catalog = Arc::new(FakeCatalog::default());
        let response = app(catalog.clone(), 0.0).oneshot(post_json("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn whitespace_song_name_is_accepted() {
        let catalog = Arc::new(FakeCatalog::default());
        let response = app(catalog.clone(), 0.0)
            .oneshot(post_json(r#"{"song_name": "   ", "artist_name": "Adele"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["sentiment"], "Neutral");
        assert_eq!(body["recommendations"], serde_json::json!([]));

        let mut calls = catalog.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                ("artist:Adele".to_string(), 5),
                ("genre:pop chill".to_string(), 10),
            ]
        );
    }

    #[tokio::test]
    async fn missing_content_type_keeps_framework_status() {
        let catalog = Arc::new(FakeCatalog::default());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/recommend")
            .body(Body::from(r#"{"song_name": "Happy"}"#))
            .unwrap();
        let response = app(catalog.clone(), 0.0).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body_json(response).await["error"].is_string());
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn recommend_returns_sentiment_and_tracks() {
        let catalog = Arc::new(
            FakeCatalog::default()
                .with(
                    "artist:Pharrell Williams",
                    Ok(vec![track("Happy", "Pharrell Williams"), track("Freedom", "Pharrell Williams")]),
                )
                .with("genre:pop happy", Ok(vec![track("Walking on Sunshine", "Katrina")])),
        );
        let response = app(catalog, 0.6)
            .oneshot(post_json(r#"{"song_name": "Happy", "artist_name": "Pharrell Williams"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["sentiment"], "Very Positive");

        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[2]["track_name"], "Walking on Sunshine");
        assert_eq!(recs[2]["artist_name"], "Katrina");
        assert_eq!(recs[2]["album_cover"], "https://img.example/Walking on Sunshine");
        assert_eq!(recs[2]["spotify_url"], "https://open.spotify.com/track/Walking on Sunshine");
        for rec in &recs[..2] {
            assert_eq!(rec["artist_name"], "Pharrell Williams");
        }
    }

    #[tokio::test]
    async fn upstream_failures_still_return_ok() {
        let catalog = Arc::new(
            FakeCatalog::default()
                .with("artist:Ghost", Err("search request failed".into()))
                .with("genre:pop sad", Err("Spotify API error 503".into())),
        );
        let response = app(catalog, -0.2)
            .oneshot(post_json(r#"{"song_name": "Gone", "artist_name": "Ghost"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["sentiment"], "Negative");
        assert_eq!(body["recommendations"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/recommend")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app(Arc::new(FakeCatalog::default()), 0.0).oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
