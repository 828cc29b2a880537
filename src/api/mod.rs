//! Advisor backend integration
//!
//! Every operation reaches the backend proxy through [`AdvisorService`]. The
//! HTTP implementation is [`ApiClient`]; [`MockAdvisorClient`] stands in for
//! it in tests and harnesses.

pub mod client;
pub mod mock;

pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use mock::MockAdvisorClient;

use crate::models::{AnalysisResult, JobSuggestion, LinkedInGeneratorResult, ModernizationSuggestion};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AdvisorService: Send + Sync {
    async fn analyze(&self, job_description: &str, resume: &str) -> Result<AnalysisResult>;

    async fn rewrite(
        &self,
        original_resume: &str,
        job_description: &str,
        modernization_suggestions: &[ModernizationSuggestion],
    ) -> Result<String>;

    async fn find_jobs(&self, resume: &str) -> Result<Vec<JobSuggestion>>;

    async fn generate_pitch(&self, resume: &str, job_description: &str) -> Result<String>;

    async fn generate_linkedin(
        &self,
        resume: &str,
        job_description: &str,
    ) -> Result<LinkedInGeneratorResult>;
}
