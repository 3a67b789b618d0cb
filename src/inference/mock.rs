//! Scripted in-memory gateway for tests.

use crate::error::{Result, RoofwattError};
use crate::inference::gateway::{InferenceGateway, InferenceRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Test double that replays scripted responses and records every request
/// it receives. Clones share the same script and call log.
#[derive(Clone, Default)]
pub struct MockInferenceGateway {
    responses: Arc<Mutex<VecDeque<Result<String>>>>,
    calls: Arc<Mutex<Vec<InferenceRequest>>>,
}

impl MockInferenceGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a gateway scripted with a single successful completion.
    pub fn with_completion(text: &str) -> Self {
        let gateway = Self::new();
        gateway.push_response(Ok(text.to_string()));
        gateway
    }

    /// Queue the next response to hand out.
    pub fn push_response(&self, response: Result<String>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Every request seen so far, in call order.
    pub fn calls(&self) -> Vec<InferenceRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceGateway for MockInferenceGateway {
    async fn complete(&self, request: &InferenceRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());

        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(RoofwattError::Api(
                "mock gateway has no scripted response".to_string(),
            ))
        })
    }
}
