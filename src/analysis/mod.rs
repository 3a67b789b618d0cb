pub mod image;
pub mod prompt;
pub mod report;
pub mod request;

pub use image::{ImageFormat, UploadedImage};
pub use prompt::{build_user_prompt, ASSESSMENT_SYSTEM_PROMPT};
pub use report::{RoiEstimate, SolarAssessment};
pub use request::AnalysisRequest;
