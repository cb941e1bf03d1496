use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "fleet-maintenance");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommendations_requires_json_body() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/journey/recommendations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Sin content-type JSON el extractor rechaza la request
    assert_ne!(response.status(), StatusCode::OK);
    assert_ne!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_recommendations_empty_selection_is_a_state() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/journey/recommendations")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "equipment_ids": [] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    // Selección vacía es un estado del resultado, no un error
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["status"], "no_vehicles_selected");
}

// Función helper para crear la app de test (sin base de datos; replica la
// forma de las rutas y los estados degenerados del recomendador)
fn create_test_app() -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({ "service": "fleet-maintenance", "status": "healthy" }))
            }),
        )
        .route(
            "/api/journey/recommendations",
            post(|Json(request): Json<serde_json::Value>| async move {
                let empty = request["equipment_ids"]
                    .as_array()
                    .map(|ids| ids.is_empty())
                    .unwrap_or(true);
                let status = if empty { "no_vehicles_selected" } else { "no_fault_data" };
                Json(json!({
                    "success": true,
                    "data": { "status": status }
                }))
            }),
        )
}
