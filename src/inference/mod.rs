pub mod gateway;
pub mod mock;
pub mod openrouter;

pub use gateway::{InferenceGateway, InferenceRequest};
pub use mock::MockInferenceGateway;
pub use openrouter::{OpenRouterConfig, OpenRouterGateway};
