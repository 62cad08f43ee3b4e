//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    create_router(ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn sample_body() -> serde_json::Value {
    serde_json::json!({
        "expenses": [
            {"categoryId": 1, "amount": 50, "date": "2024-01-15"},
            {"categoryId": 1, "amount": 30, "date": "2024-02-01"},
            {"categoryId": 2, "amount": 0, "date": "2024-01-20"}
        ],
        "categories": [
            {"id": 1, "budget": 100},
            {"id": 2, "budget": 50}
        ]
    })
}

// ========== Health Tests ==========

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// ========== Analysis Tests ==========

#[tokio::test]
async fn test_analyze_expenses() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/analyze-expenses", &sample_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["totalSpent"].as_f64(), Some(80.0));

    let breakdown = json["categoryBreakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0]["categoryId"], 1);
    assert_eq!(breakdown[0]["percentage"].as_f64(), Some(100.0));

    let trend = json["monthlyTrend"].as_array().unwrap();
    assert_eq!(trend[0]["month"], "Jan 2024");
    assert_eq!(trend[1]["month"], "Feb 2024");

    let budget = json["budgetStatus"].as_array().unwrap();
    assert_eq!(budget.len(), 2);
    assert_eq!(budget[0]["percentage"].as_f64(), Some(80.0));
    assert_eq!(budget[1]["spent"].as_f64(), Some(0.0));

    assert_eq!(json["stats"]["count"], 3);
    assert_eq!(json["stats"]["median"].as_f64(), Some(30.0));
}

#[tokio::test]
async fn test_analyze_alias_route() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/analyze", &sample_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["totalSpent"].as_f64(), Some(80.0));
}

#[tokio::test]
async fn test_analyze_empty_object() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/analyze-expenses", &serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["totalSpent"].as_f64(), Some(0.0));
    assert_eq!(json["categoryBreakdown"], serde_json::json!([]));
    assert_eq!(json["monthlyTrend"], serde_json::json!([]));
    assert_eq!(json["budgetStatus"], serde_json::json!([]));
    assert_eq!(json["stats"]["count"], 0);
    assert_eq!(json["stats"]["median"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_analyze_missing_field_is_bad_request() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "expenses": [{"categoryId": 1, "date": "2024-01-15"}],
        "categories": []
    });

    let response = app
        .oneshot(post_json("/analyze-expenses", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("expenses[0]"));
    assert!(message.contains("amount"));
    // No partial result leaks through
    assert!(json.get("totalSpent").is_none());
}

#[tokio::test]
async fn test_analyze_bad_date_is_bad_request() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "expenses": [{"categoryId": 1, "amount": 5, "date": "15/01/2024"}]
    });

    let response = app
        .oneshot(post_json("/analyze-expenses", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("unparseable date"));
}

#[tokio::test]
async fn test_analyze_negative_budget_is_bad_request() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "categories": [{"id": "rent", "budget": -1}]
    });

    let response = app
        .oneshot(post_json("/analyze-expenses", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_overflowing_total_is_bad_request() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "expenses": [
            {"categoryId": 1, "amount": 1e308, "date": "2024-01-01"},
            {"categoryId": 1, "amount": 1e308, "date": "2024-01-02"}
        ],
        "categories": [{"id": 1, "budget": 10}]
    });

    let response = app
        .oneshot(post_json("/analyze-expenses", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("representable range"));
}

#[tokio::test]
async fn test_analyze_malformed_json_is_bad_request() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze-expenses")
                .header("content-type", "application/json")
                .body(Body::from("{\"expenses\": ["))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not valid JSON"));
}

#[tokio::test]
async fn test_analyze_rejects_get() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/analyze-expenses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_body_limit() {
    let app = create_router(ServerConfig {
        max_body_bytes: 64,
        ..Default::default()
    });

    let response = app
        .oneshot(post_json("/analyze-expenses", &sample_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// ========== CORS / Header Tests ==========

#[tokio::test]
async fn test_cors_any_origin_by_default() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/analyze-expenses")
                .header("origin", "http://localhost:8080")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_cors_restricted_origins() {
    let config = ServerConfig {
        allowed_origins: vec!["https://app.example.com".to_string()],
        ..Default::default()
    };

    let allowed = create_router(config.clone())
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/analyze-expenses")
                .header("origin", "https://app.example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "https://app.example.com"
    );

    let denied = create_router(config)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/analyze-expenses")
                .header("origin", "https://evil.example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(denied
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

// ========== Config Tests ==========

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins("https://a.example.com, https://b.example.com,,"),
        vec!["https://a.example.com", "https://b.example.com"]
    );
    assert!(parse_origins("").is_empty());
    assert!(parse_origins(" , ").is_empty());
}

#[test]
fn test_allows_any_origin() {
    assert!(ServerConfig::default().allows_any_origin());

    let star = ServerConfig {
        allowed_origins: vec!["*".to_string()],
        ..Default::default()
    };
    assert!(star.allows_any_origin());

    let listed = ServerConfig {
        allowed_origins: vec!["https://app.example.com".to_string()],
        ..Default::default()
    };
    assert!(!listed.allows_any_origin());
}

#[test]
fn test_core_io_error_maps_to_internal() {
    let err = spendlens_core::Error::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        "disk on fire",
    ));
    let app_err = AppError::from(err);
    assert_eq!(app_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app_err.message, "An internal error occurred");
}
