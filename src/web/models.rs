//! Request and response bodies for the analyzer API.

use crate::analysis::{RoiEstimate, SolarAssessment};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/analyze`.
///
/// Every field arrives as a string so the handler can report what is
/// missing or malformed as a 400 instead of an opaque decoder rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Image payload: a `data:` URL or bare base64.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub location: String,
    /// Electricity rate in $/kWh, as typed by the user.
    #[serde(default)]
    pub rate: String,
}

/// Body of a successful analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// The model's analysis text, verbatim.
    pub analysis: String,
    /// Structured assessment, present when the analysis contained
    /// parseable JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<SolarAssessment>,
    /// Return-on-investment figures derived from the assessment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi: Option<RoiEstimate>,
    /// Model that produced the analysis.
    pub model: String,
}

/// Body of any failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
