//! Form input validation.

use crate::analysis::image::UploadedImage;
use crate::error::{Result, RoofwattError};

/// One validated analysis request: the uploaded image plus the context the
/// user typed into the form.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub image: UploadedImage,
    pub location: String,
    /// Electricity rate in $/kWh. Always positive and finite.
    pub rate: f64,
}

impl AnalysisRequest {
    /// Validate raw form fields into a request.
    ///
    /// The image must already be decoded; the rate arrives as the raw string
    /// from the form and must parse to a positive number.
    pub fn new(image: UploadedImage, location: &str, rate: &str) -> Result<Self> {
        let rate = parse_rate(rate)?;

        Ok(Self {
            image,
            location: location.trim().to_string(),
            rate,
        })
    }
}

fn parse_rate(raw: &str) -> Result<f64> {
    let rate: f64 = raw.trim().parse().map_err(|_| {
        RoofwattError::Validation("electricity rate must be a number".to_string())
    })?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(RoofwattError::Validation(
            "electricity rate must be a positive number".to_string(),
        ));
    }

    Ok(rate)
}
