//! Prompt construction for the rooftop analysis call.

/// System prompt pinning the shape of the model's reply. The fields mirror
/// what the report extractor looks for; replies that ignore the shape still
/// render as plain text.
pub const ASSESSMENT_SYSTEM_PROMPT: &str = r#"You are a solar installation analyst. Examine the provided satellite image of a rooftop for solar panel installation potential.

Respond with a single JSON object containing the following fields:
- roof_area_sqm: float, usable roof area in square meters
- azimuth_degrees: float, predominant roof orientation
- tilt_degrees: float, estimated roof pitch
- shading_percentage: float, portion of the roof affected by shading
- suggested_panel_type: string
- estimated_annual_kwh: float, expected annual production for the location

Return only the JSON object."#;

/// Build the user prompt for an analysis request.
///
/// Pure string templating: deterministic, and the location and rate appear
/// verbatim in the output.
pub fn build_user_prompt(location: &str, rate: f64) -> String {
    format!(
        "Analyze this rooftop image for solar potential. Location: {location}. \
         Electricity rate: ${rate}/kWh."
    )
}
