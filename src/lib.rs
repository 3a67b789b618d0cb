pub mod analysis;
pub mod error;
pub mod inference;
pub mod web;

pub use error::{Result, RoofwattError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{
        AnalysisRequest, ImageFormat, RoiEstimate, SolarAssessment, UploadedImage,
    };
    pub use crate::error::{Result, RoofwattError};
    pub use crate::inference::{
        InferenceGateway, InferenceRequest, MockInferenceGateway, OpenRouterGateway,
    };
    pub use crate::web::{create_router, run_server, AppState};
}
