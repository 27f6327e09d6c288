use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`
use wellness_pass::infrastructure::AppState;
use wellness_pass::{api, auth, db, seed};

// Helper to create a router over a seeded in-memory database
async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    seed::seed_demo_data(&db, chrono::Utc::now())
        .await
        .expect("Failed to seed");
    api::api_router_with_state(AppState::new(db))
}

fn token_for(user_id: &str) -> String {
    auth::create_jwt(user_id).expect("Failed to create token")
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, token: &str, payload: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    match payload {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_app().await;

    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "wellness-pass");
}

#[tokio::test]
async fn test_requires_bearer_token() {
    let app = setup_app().await;

    let req = Request::builder()
        .uri("/wellness/passes")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await["code"], "UNAUTHORIZED");

    let response = app
        .oneshot(get("/wellness/active", "not-a-jwt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_catalog_lists_seeded_passes() {
    let app = setup_app().await;
    let token = token_for("patient-catalog");

    let response = app
        .oneshot(get("/wellness/passes", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let passes = body["passes"].as_array().unwrap();
    assert_eq!(passes.len(), 2);
    assert_eq!(passes[0]["slug"], "glow-5");
    assert_eq!(passes[0]["totalDays"], 5);
    assert_eq!(passes[0]["state"], "AVAILABLE_TO_START");
    assert_eq!(passes[0]["canStart"], true);
    assert!(passes[0].get("progressPercent").is_none());
}

#[tokio::test]
async fn test_start_and_complete_over_http() {
    let app = setup_app().await;
    let token = token_for("patient-flow");

    let response = app
        .clone()
        .oneshot(get("/wellness/active", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(read_json(response).await["active"].is_null());

    let response = app
        .clone()
        .oneshot(post("/wellness/passes/glow-5/start", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["activeSlug"], "glow-5");

    // Empty body completes whatever day is due
    let response = app
        .clone()
        .oneshot(post("/wellness/complete", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["isFinished"], false);
    assert!(body["rewardCode"].is_null());
    assert_eq!(body["active"]["completedDaysCount"], 1);
    assert_eq!(body["active"]["currentDayNumber"], 2);
    assert_eq!(body["active"]["days"][0]["status"], "DONE");
    assert_eq!(body["active"]["days"][1]["status"], "LOCKED");

    let response = app
        .clone()
        .oneshot(post("/wellness/complete", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(read_json(response).await["code"], "DAY_LOCKED");

    let response = app
        .oneshot(post(
            "/wellness/complete",
            &token,
            Some(json!({ "day_number": 5 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "WRONG_DAY");
}

#[tokio::test]
async fn test_complete_body_is_validated() {
    let app = setup_app().await;
    let token = token_for("patient-body");

    let response = app
        .clone()
        .oneshot(post("/wellness/passes/glow-5/start", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // camelCase like every response; day 4 is not due yet
    let response = app
        .clone()
        .oneshot(post(
            "/wellness/complete",
            &token,
            Some(json!({ "dayNumber": 4 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "WRONG_DAY");

    for payload in [
        json!({ "day_number": "four" }),
        json!({ "day": 1 }),
        json!([1]),
    ] {
        let response = app
            .clone()
            .oneshot(post("/wellness/complete", &token, Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["code"], "INVALID_REQUEST");
    }

    // Nothing was recorded by the rejected requests
    let response = app
        .oneshot(get("/wellness/active", &token))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["active"]["completedDaysCount"], 0);
    assert_eq!(body["active"]["currentDayNumber"], 1);
}

#[tokio::test]
async fn test_start_errors_map_to_codes() {
    let app = setup_app().await;
    let token = token_for("patient-errors");

    let response = app
        .clone()
        .oneshot(post("/wellness/passes/nope/start", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["code"], "PASS_NOT_FOUND");

    let response = app
        .clone()
        .oneshot(post("/wellness/complete", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["code"], "PASS_NOT_ACTIVE");

    let response = app
        .clone()
        .oneshot(post("/wellness/passes/calm-3/start", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post("/wellness/passes/glow-5/start", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await;
    assert_eq!(body["code"], "PASS_ALREADY_ACTIVE");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_redeem_promo_coupon() {
    let app = setup_app().await;
    let token = token_for("patient-coupon");

    let response = app
        .clone()
        .oneshot(post(
            "/coupons/redeem",
            &token,
            Some(json!({ "code": " welcome10 " })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["code"], "WELCOME10");
    assert_eq!(body["usedCount"], 1);

    let response = app
        .oneshot(post(
            "/coupons/redeem",
            &token,
            Some(json!({ "code": "NOPE" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["code"], "COUPON_NOT_FOUND");
}
