//! Best-effort interpretation of the model's reply.
//!
//! The completion text is authoritative and always rendered as-is. When the
//! reply happens to carry the JSON object the system prompt asks for, a
//! structured assessment is extracted and an ROI breakdown computed from it;
//! when it does not, extraction quietly yields nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Installed cost per watt, in dollars.
const COST_PER_WATT: f64 = 3.0;
/// Federal tax credit applied to the installation cost.
const INCENTIVE_RATE: f64 = 0.30;
/// Panel output per square meter of usable roof (20% efficient panels).
const PANEL_WATTS_PER_SQM: f64 = 200.0;

/// Structured rooftop assessment, as described by the system prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarAssessment {
    pub roof_area_sqm: f64,
    pub azimuth_degrees: f64,
    pub tilt_degrees: f64,
    pub shading_percentage: f64,
    pub suggested_panel_type: String,
    pub estimated_annual_kwh: f64,
}

impl SolarAssessment {
    /// Extract an assessment from the completion text, tolerating code
    /// fences and surrounding prose. Returns `None` when no conforming JSON
    /// object is found.
    pub fn from_completion(text: &str) -> Option<Self> {
        let value = extract_json(text)?;
        serde_json::from_value(value).ok()
    }
}

/// Return-on-investment estimate derived from an assessment and the user's
/// electricity rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiEstimate {
    pub total_watts: f64,
    pub installation_cost: f64,
    pub incentive: f64,
    pub net_cost: f64,
    pub annual_savings: f64,
    /// `None` when annual savings are not positive (JSON has no infinity).
    pub payback_period_years: Option<f64>,
}

impl RoiEstimate {
    /// Compute the ROI breakdown for an assessment at the given rate ($/kWh).
    pub fn calculate(assessment: &SolarAssessment, rate: f64) -> Self {
        let total_watts = assessment.roof_area_sqm * PANEL_WATTS_PER_SQM;
        let installation_cost = total_watts * COST_PER_WATT;
        let incentive = installation_cost * INCENTIVE_RATE;
        let net_cost = installation_cost - incentive;
        let annual_savings = assessment.estimated_annual_kwh * rate;

        let payback_period_years =
            (annual_savings > 0.0).then(|| net_cost / annual_savings);

        Self {
            total_watts,
            installation_cost,
            incentive,
            net_cost,
            annual_savings,
            payback_period_years,
        }
    }
}

/// Find the first parseable JSON value in free-form model output: the whole
/// text, then the outermost brace span, then fenced code blocks.
fn extract_json(text: &str) -> Option<Value> {
    let t = text.trim().trim_matches('\u{feff}');

    if let Ok(v) = serde_json::from_str::<Value>(t) {
        return Some(v);
    }

    if let (Some(i), Some(j)) = (t.find('{'), t.rfind('}')) {
        if i < j {
            if let Ok(v) = serde_json::from_str::<Value>(&t[i..=j]) {
                return Some(v);
            }
        }
    }

    for fence in ["```json", "```"] {
        if let Some(start) = t.find(fence) {
            let body = &t[start + fence.len()..];
            if let Some(end) = body.find("```") {
                if let Ok(v) = serde_json::from_str::<Value>(body[..end].trim()) {
                    return Some(v);
                }
            }
        }
    }

    None
}
