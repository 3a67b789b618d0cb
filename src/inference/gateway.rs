use crate::analysis::UploadedImage;
use crate::error::Result;
use async_trait::async_trait;

/// One analysis request for the hosted model: the prompt pair plus the image
/// it should look at.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub image: UploadedImage,
}

/// Abstract interface to the hosted model endpoint.
///
/// Exactly one HTTPS round trip per call; implementations do not retry.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Send the request and return the completion text.
    async fn complete(&self, request: &InferenceRequest) -> Result<String>;
}
