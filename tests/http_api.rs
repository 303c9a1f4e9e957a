#![cfg(feature = "server")]

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{down_engine, starter_engine, DownCatalog};
use pokequiz_engine::http::{router, AppState};

fn test_app() -> Router {
    let (engine, _, _) = starter_engine();
    router(AppState::new(engine))
}

fn down_app(catalog: DownCatalog) -> Router {
    let (engine, _) = down_engine(catalog);
    router(AppState::new(engine))
}

fn live_session() -> Value {
    json!({
        "session": { "playerName": "Sacha", "score": 2, "lives": 3 },
        "currentItem": { "id": 25, "name": "pikachu", "imageUrl": "img" },
        "playerAnswer": "pikachu",
    })
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post(app: &Router, uri: &str, body: Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_is_ok() {
    let app = test_app();
    let res = get(&app, "/health").await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["status"], "ok");
}

#[tokio::test]
async fn test_start_returns_session_and_item() {
    let app = test_app();
    let res = post(&app, "/game/start", json!({ "playerName": "Ondine" })).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["playerName"], "Ondine");
    assert_eq!(body["score"], 0);
    assert_eq!(body["lives"], 3);
    assert!(body["currentItem"]["imageUrl"].as_str().is_some());
}

#[tokio::test]
async fn test_start_rejects_invalid_name() {
    let app = test_app();

    for name in ["", "Ash123", "abcdefghijklmnop"] {
        let res = post(&app, "/game/start", json!({ "playerName": name })).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{name:?}");
        assert_eq!(json_body(res).await["kind"], "validation");
    }
}

#[tokio::test]
async fn test_answer_right_then_wrong() {
    let app = test_app();
    let item = json!({ "id": 25, "name": "pikachu", "imageUrl": "img" });

    let res = post(
        &app,
        "/game/answer",
        json!({
            "session": { "playerName": "Sacha", "score": 0, "lives": 3 },
            "currentItem": item,
            "playerAnswer": " Pikachu ",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["score"], 1);
    assert_eq!(body["isOver"], false);
    assert!(body.get("correctAnswer").is_none());
    assert!(body["currentItem"].is_object());

    let res = post(
        &app,
        "/game/answer",
        json!({
            "session": { "playerName": "Sacha", "score": 1, "lives": 3 },
            "currentItem": item,
            "playerAnswer": "Dracaufeu",
        }),
    )
    .await;
    let body = json_body(res).await;
    assert_eq!(body["lives"], 2);
    assert_eq!(body["correctAnswer"], "pikachu");
}

#[tokio::test]
async fn test_last_life_ends_game_and_records_score() {
    let app = test_app();

    let res = post(
        &app,
        "/game/answer",
        json!({
            "session": { "playerName": "Pierre", "score": 30, "lives": 1 },
            "currentItem": { "id": 95, "name": "onix", "imageUrl": "img" },
            "playerAnswer": "geodude",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["isOver"], true);
    assert_eq!(body["lives"], 0);
    assert!(body["currentItem"].is_null());

    let res = get(&app, "/game/scores?limit=5").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!([{ "name": "Pierre", "score": 30 }]));
}

#[tokio::test]
async fn test_answer_without_session_is_bad_request() {
    let app = test_app();
    let res = post(
        &app,
        "/game/answer",
        json!({ "currentItem": { "id": 1, "name": "mew", "imageUrl": "i" }, "playerAnswer": "mew" }),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/game/start")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_next_avoids_previous_item() {
    let app = test_app();

    let res = post(&app, "/game/next", json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let first = json_body(res).await;
    assert!(first["name"].as_str().is_some());

    let res = post(&app, "/game/next", json!({ "previousItem": first })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(json_body(res).await["imageUrl"].as_str().is_some());
}

#[tokio::test]
async fn test_scores_empty_is_not_found() {
    let app = test_app();
    let res = get(&app, "/game/scores").await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await["kind"], "not_found");
}

#[tokio::test]
async fn test_answer_without_lives_is_bad_request() {
    let app = test_app();
    let res = post(
        &app,
        "/game/answer",
        json!({
            "session": { "playerName": "Ash", "score": 0 },
            "currentItem": { "id": 1, "name": "mew", "imageUrl": "i" },
            "playerAnswer": "mew",
        }),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("lives"), "{body}");
}

#[tokio::test]
async fn test_answer_on_finished_game_records_nothing() {
    let app = test_app();
    let res = post(
        &app,
        "/game/answer",
        json!({
            "session": { "playerName": "Ash", "score": 5, "lives": 0 },
            "currentItem": { "id": 151, "name": "mew", "imageUrl": "i" },
            "playerAnswer": "mew",
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = get(&app, "/game/scores").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_with_catalog_down_is_bad_gateway() {
    let app = down_app(DownCatalog::broken());
    let res = post(&app, "/game/start", json!({ "playerName": "Ondine" })).await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(res).await["kind"], "upstream");
}

#[tokio::test]
async fn test_answer_with_catalog_down_is_server_error() {
    for catalog in [DownCatalog::unreachable(), DownCatalog::broken()] {
        let app = down_app(catalog);
        let res = post(&app, "/game/answer", live_session()).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(res).await["kind"], "upstream");
    }
}

#[tokio::test]
async fn test_next_with_unreachable_catalog_is_not_found() {
    let app = down_app(DownCatalog::unreachable());
    let res = post(&app, "/game/next", json!({})).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_next_with_broken_catalog_is_server_error() {
    let app = down_app(DownCatalog::broken());
    let res = post(
        &app,
        "/game/next",
        json!({ "previousItem": { "id": 4, "name": "charmander", "imageUrl": "url" } }),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
