//! Reference backend proxy.
//!
//! Holds the model credential, turns each `{action, payload}` request into a
//! prompt (plus a response schema for structured actions), calls the model
//! and returns the body the client contract expects.

pub mod gemini;
pub mod mock;
pub mod server;

pub use gemini::GeminiModelClient;
pub use mock::MockModelClient;
pub use server::{router, serve, INVALID_REQUEST_MESSAGE};

use crate::models::{Action, OperationRequest, PitchResponse, RewriteResponse};
use crate::{prompts, schema, Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// A generative model reachable from the proxy.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Generate output constrained to `schema` and return it as JSON.
    async fn generate_json(&self, system: &str, prompt: &str, schema: &Value) -> Result<Value>;
    async fn generate_text(&self, system: &str, prompt: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct Dispatcher {
    model: Arc<dyn ModelService>,
}

impl Dispatcher {
    pub fn new(model: Arc<dyn ModelService>) -> Self {
        Self { model }
    }

    /// Produce the success body for one request. Structured actions return
    /// the model's JSON as-is; text actions are wrapped in their single-field
    /// object.
    pub async fn dispatch(&self, request: &OperationRequest) -> Result<Value> {
        let action = request.action();
        info!("Dispatching `{}`", action.as_str());

        match request {
            OperationRequest::Analyze(payload) => {
                let prompt =
                    prompts::build_analyze_prompt(&payload.job_description, &payload.resume)?;
                self.structured(action, &prompt).await
            }
            OperationRequest::Rewrite(payload) => {
                let prompt = prompts::build_rewrite_prompt(
                    &payload.original_resume,
                    &payload.job_description,
                    &payload.modernization_suggestions,
                )?;
                let rewritten_resume = self.model.generate_text(prompts::SYSTEM, &prompt).await?;
                Ok(serde_json::to_value(RewriteResponse { rewritten_resume })?)
            }
            OperationRequest::FindJobs(payload) => {
                let prompt = prompts::build_find_jobs_prompt(&payload.resume)?;
                self.structured(action, &prompt).await
            }
            OperationRequest::GeneratePitch(payload) => {
                let prompt =
                    prompts::build_pitch_prompt(&payload.resume, &payload.job_description)?;
                let pitch = self.model.generate_text(prompts::SYSTEM, &prompt).await?;
                Ok(serde_json::to_value(PitchResponse { pitch })?)
            }
            OperationRequest::GenerateLinkedin(payload) => {
                let prompt =
                    prompts::build_linkedin_prompt(&payload.resume, &payload.job_description)?;
                self.structured(action, &prompt).await
            }
        }
    }

    async fn structured(&self, action: Action, prompt: &str) -> Result<Value> {
        let schema = schema::response_schema(action).ok_or_else(|| {
            Error::Unknown(format!("No response schema for `{}`", action.as_str()))
        })?;
        self.model
            .generate_json(prompts::SYSTEM, prompt, &schema)
            .await
    }
}
