//! HTTP handlers for the analyzer.

use crate::analysis::{
    build_user_prompt, AnalysisRequest, RoiEstimate, SolarAssessment, UploadedImage,
    ASSESSMENT_SYSTEM_PROMPT,
};
use crate::error::RoofwattError;
use crate::inference::InferenceRequest;
use crate::web::models::{AnalyzeRequest, AnalyzeResponse, ErrorResponse};
use crate::web::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use tracing::{debug, info, warn};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Shown to the user when the analysis fails for any reason that is not
/// their input. Upstream details go to the log, never to the browser.
const GENERIC_ANALYSIS_ERROR: &str = "Error analyzing image. Please try again.";

/// `GET /` - the single-page analyzer UI.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `POST /api/analyze` - run one rooftop analysis.
///
/// Validates the upload and form fields, sends the image and prompt to the
/// configured gateway, and returns the model's analysis along with any
/// structured assessment it contained.
pub async fn analyze(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> std::result::Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let image = UploadedImage::from_payload(&payload.image).map_err(reject)?;
    let request = AnalysisRequest::new(image, &payload.location, &payload.rate).map_err(reject)?;

    info!(location = %request.location, "Analyzing rooftop image");

    let inference = InferenceRequest {
        system_prompt: ASSESSMENT_SYSTEM_PROMPT.to_string(),
        user_prompt: build_user_prompt(&request.location, request.rate),
        image: request.image,
    };

    let analysis = state.gateway.complete(&inference).await.map_err(reject)?;

    let assessment = SolarAssessment::from_completion(&analysis);
    let roi = assessment
        .as_ref()
        .map(|a| RoiEstimate::calculate(a, request.rate));

    debug!(
        chars = analysis.len(),
        structured = assessment.is_some(),
        "Analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        analysis,
        assessment,
        roi,
        model: state.model.clone(),
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not found".to_string(),
        }),
    )
}

/// Map a [`RoofwattError`] onto an HTTP status and user-facing body.
///
/// Only validation messages pass through to the client; everything else
/// collapses to [`GENERIC_ANALYSIS_ERROR`].
fn reject(err: RoofwattError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        RoofwattError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: msg }))
        }
        RoofwattError::Timeout(msg) => {
            warn!(error = %msg, "Analysis timed out");
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ErrorResponse {
                    error: GENERIC_ANALYSIS_ERROR.to_string(),
                }),
            )
        }
        other => {
            warn!(error = %other, "Analysis failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: GENERIC_ANALYSIS_ERROR.to_string(),
                }),
            )
        }
    }
}
