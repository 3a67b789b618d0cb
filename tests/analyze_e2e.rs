use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, routing::post, Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use roofwatt::analysis::ImageFormat;
use roofwatt::inference::{MockInferenceGateway, OpenRouterConfig, OpenRouterGateway};
use roofwatt::web::{create_router, AppState};
use roofwatt::RoofwattError;

const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01, 0x02, 0x03,
];

fn test_app(gateway: &MockInferenceGateway) -> Router {
    create_router(AppState::new(Arc::new(gateway.clone()), "test-model"))
}

fn png_data_url() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(PNG_BYTES))
}

fn analyze_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn valid_body() -> serde_json::Value {
    json!({
        "image": png_data_url(),
        "location": "Austin, TX",
        "rate": "0.13",
    })
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn e2e_analyze_returns_model_text_verbatim() {
    let gateway = MockInferenceGateway::with_completion("Estimated savings: $500/year");
    let app = test_app(&gateway);

    let response = app.oneshot(analyze_request(valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["analysis"], "Estimated savings: $500/year");
    assert_eq!(body["model"], "test-model");
    assert!(body.get("assessment").is_none());
    assert!(body.get("roi").is_none());
}

#[tokio::test]
async fn e2e_analyze_sends_exact_prompt_and_image() {
    let gateway = MockInferenceGateway::with_completion("ok");
    let app = test_app(&gateway);

    app.oneshot(analyze_request(valid_body())).await.unwrap();

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].user_prompt,
        "Analyze this rooftop image for solar potential. Location: Austin, TX. \
         Electricity rate: $0.13/kWh."
    );
    assert_eq!(calls[0].image.bytes, PNG_BYTES);
    assert!(calls[0].system_prompt.contains("roof_area_sqm"));
}

#[tokio::test]
async fn e2e_bare_base64_image_is_accepted() {
    let gateway = MockInferenceGateway::with_completion("ok");
    let app = test_app(&gateway);
    let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x10, 0x20];

    let response = app
        .oneshot(analyze_request(json!({
            "image": STANDARD.encode(jpeg),
            "location": "Austin, TX",
            "rate": "0.13",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let calls = gateway.calls();
    assert_eq!(calls[0].image.format, ImageFormat::Jpeg);
    assert_eq!(calls[0].image.bytes, jpeg);
}

#[tokio::test]
async fn e2e_missing_image_is_rejected_without_inference() {
    let gateway = MockInferenceGateway::new();
    let app = test_app(&gateway);

    let response = app
        .oneshot(analyze_request(json!({
            "location": "Austin, TX",
            "rate": "0.13",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "an image is required");
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn e2e_non_numeric_rate_is_rejected_without_inference() {
    let gateway = MockInferenceGateway::new();
    let app = test_app(&gateway);

    let response = app
        .oneshot(analyze_request(json!({
            "image": png_data_url(),
            "location": "Austin, TX",
            "rate": "abc",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "electricity rate must be a number");
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn e2e_non_positive_rate_is_rejected() {
    let gateway = MockInferenceGateway::new();
    let app = test_app(&gateway);

    for rate in ["0", "-0.5"] {
        let response = app
            .clone()
            .oneshot(analyze_request(json!({
                "image": png_data_url(),
                "location": "Austin, TX",
                "rate": rate,
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["error"], "electricity rate must be a positive number");
    }

    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn e2e_gateway_failure_hides_details_and_recovers() {
    let gateway = MockInferenceGateway::new();
    gateway.push_response(Err(RoofwattError::Api(
        "OpenRouter API error 500: internal stack trace".to_string(),
    )));
    gateway.push_response(Ok("second attempt".to_string()));
    let app = test_app(&gateway);

    let response = app
        .clone()
        .oneshot(analyze_request(valid_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Error analyzing image. Please try again.");

    let response = app.oneshot(analyze_request(valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["analysis"], "second attempt");
}

#[tokio::test]
async fn e2e_gateway_timeout_maps_to_504() {
    let gateway = MockInferenceGateway::new();
    gateway.push_response(Err(RoofwattError::Timeout("60s elapsed".to_string())));
    let app = test_app(&gateway);

    let response = app.oneshot(analyze_request(valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Error analyzing image. Please try again.");
}

#[tokio::test]
async fn e2e_structured_assessment_enables_roi() {
    let completion = r#"Here is my assessment of the rooftop:
```json
{
  "roof_area_sqm": 100.0,
  "azimuth_degrees": 180.0,
  "tilt_degrees": 20.0,
  "shading_percentage": 10.0,
  "suggested_panel_type": "monocrystalline",
  "estimated_annual_kwh": 12000.0
}
```"#;
    let gateway = MockInferenceGateway::with_completion(completion);
    let app = test_app(&gateway);

    let response = app
        .oneshot(analyze_request(json!({
            "image": png_data_url(),
            "location": "Austin, TX",
            "rate": "0.15",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    assert_eq!(body["analysis"], completion);
    assert_eq!(body["assessment"]["suggested_panel_type"], "monocrystalline");
    assert_eq!(body["assessment"]["roof_area_sqm"], 100.0);

    assert_eq!(body["roi"]["total_watts"], 20000.0);
    assert_eq!(body["roi"]["installation_cost"], 60000.0);
    assert_eq!(body["roi"]["incentive"], 18000.0);
    assert_eq!(body["roi"]["net_cost"], 42000.0);
    assert_eq!(body["roi"]["annual_savings"], 1800.0);
    let payback = body["roi"]["payback_period_years"].as_f64().unwrap();
    assert!((payback - 42000.0 / 1800.0).abs() < 1e-9);
}

#[tokio::test]
async fn e2e_index_serves_analyzer_page() {
    let gateway = MockInferenceGateway::new();
    let app = test_app(&gateway);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[http::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("Solar Rooftop Analyzer"));
    assert!(page.contains("/api/analyze"));
}

#[tokio::test]
async fn e2e_unknown_route_returns_json_404() {
    let gateway = MockInferenceGateway::new();
    let app = test_app(&gateway);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/nope")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "not found");
}

async fn spawn_stub_openrouter() -> String {
    let app = Router::new().route(
        "/api/v1/chat/completions",
        post(|| async {
            Json(json!({
                "choices": [{"message": {"content": "Stub rooftop analysis."}}]
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api/v1/chat/completions")
}

fn openrouter_app(api_url: String) -> Router {
    let gateway = OpenRouterGateway::with_config(OpenRouterConfig {
        api_key: "test-key".to_string(),
        api_url,
        model: "test-model".to_string(),
        timeout: Duration::from_secs(5),
    });
    create_router(AppState::new(Arc::new(gateway), "test-model"))
}

#[tokio::test]
async fn e2e_openrouter_gateway_round_trip() {
    let api_url = spawn_stub_openrouter().await;
    let app = openrouter_app(api_url);

    let response = app.oneshot(analyze_request(valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["analysis"], "Stub rooftop analysis.");
}

#[tokio::test]
async fn e2e_unreachable_model_endpoint_is_bad_gateway() {
    let app = openrouter_app("http://127.0.0.1:1/api/v1/chat/completions".to_string());

    let response = app.oneshot(analyze_request(valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Error analyzing image. Please try again.");
}
