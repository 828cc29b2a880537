//! Session orchestration for the advisor operations.
//!
//! [`App`] owns the user's inputs and one state slot per operation. Every
//! operation checks its preconditions, enters `Pending`, makes a single call
//! through the [`AdvisorService`] seam and records the outcome in its slot.

use crate::api::{AdvisorService, ApiClient};
use crate::config::Config;
use crate::models::{Action, AnalysisResult, JobSuggestion, LinkedInGeneratorResult};
use crate::samples::{self, Sample};
use crate::state::{OperationSlot, OperationState, Phase};
use crate::{Error, Result};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

pub const MISSING_INPUTS_MESSAGE: &str = "Please provide both a job description and a resume.";
pub const TERMS_REQUIRED_MESSAGE: &str = "You must agree to the Terms of Service to proceed.";
pub const REWRITE_PRECONDITION_MESSAGE: &str =
    "Cannot rewrite without a resume, job description, and a completed analysis.";
pub const FIND_JOBS_PRECONDITION_MESSAGE: &str = "A resume is required to find job suggestions.";
pub const PITCH_PRECONDITION_MESSAGE: &str =
    "A resume and job description are required to generate a pitch.";
pub const LINKEDIN_PRECONDITION_MESSAGE: &str =
    "A resume and job description are required to generate LinkedIn profile content.";

/// The texts the user has entered, plus the terms acknowledgment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub job_description: String,
    pub resume: String,
    pub terms_accepted: bool,
}

impl Inputs {
    fn has_job_description(&self) -> bool {
        !self.job_description.trim().is_empty()
    }

    fn has_resume(&self) -> bool {
        !self.resume.trim().is_empty()
    }
}

/// Coordinates the five operations for one user session.
pub struct App {
    advisor: Box<dyn AdvisorService>,
    inputs: Mutex<Inputs>,
    analysis: OperationSlot<AnalysisResult>,
    rewrite: OperationSlot<String>,
    job_suggestions: OperationSlot<Vec<JobSuggestion>>,
    pitch: OperationSlot<String>,
    linkedin: OperationSlot<LinkedInGeneratorResult>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub advisor: Box<dyn AdvisorService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            advisor: services.advisor,
            inputs: Mutex::new(Inputs::default()),
            analysis: OperationSlot::new(Action::Analyze),
            rewrite: OperationSlot::new(Action::Rewrite),
            job_suggestions: OperationSlot::new(Action::FindJobs),
            pitch: OperationSlot::new(Action::GeneratePitch),
            linkedin: OperationSlot::new(Action::GenerateLinkedin),
        }
    }

    /// Construct an app that talks to the configured backend proxy.
    pub fn new(config: &Config) -> Self {
        let advisor = ApiClient::new(config.endpoint.clone(), config.timeout);
        info!(
            "Advisor endpoint: {} (timeout {}s)",
            advisor.endpoint(),
            config.timeout.as_secs()
        );
        Self::with_services(AppServices {
            advisor: Box::new(advisor),
        })
    }

    fn lock_inputs(&self) -> MutexGuard<'_, Inputs> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn inputs(&self) -> Inputs {
        self.lock_inputs().clone()
    }

    pub fn set_job_description(&self, text: impl Into<String>) {
        self.lock_inputs().job_description = text.into();
    }

    pub fn set_resume(&self, text: impl Into<String>) {
        self.lock_inputs().resume = text.into();
    }

    pub fn set_terms_accepted(&self, accepted: bool) {
        self.lock_inputs().terms_accepted = accepted;
    }

    /// Load a random bundled sample that differs from the current inputs.
    /// The terms are pre-accepted and any previous analysis is cleared.
    pub fn load_sample(&self) -> Result<Sample> {
        let samples = samples::bundled()?;
        let sample = {
            let mut inputs = self.lock_inputs();
            let picked = samples::pick_sample(
                &samples,
                Some(inputs.job_description.as_str()),
                &mut rand::thread_rng(),
            )
            .cloned()
            .ok_or_else(|| Error::Unknown("No bundled samples available".to_string()))?;

            inputs.job_description = picked.job_description.clone();
            inputs.resume = picked.resume.clone();
            inputs.terms_accepted = true;
            picked
        };

        self.analysis.reset();
        info!("Loaded sample: {}", sample.name);
        Ok(sample)
    }

    /// Return every operation to `Idle`, keeping the input texts.
    pub fn start_over(&self) {
        self.analysis.reset();
        self.rewrite.reset();
        self.job_suggestions.reset();
        self.pitch.reset();
        self.linkedin.reset();
        info!("Session state cleared");
    }

    /// Clear the input texts and the terms acknowledgment.
    pub fn clear_inputs(&self) {
        *self.lock_inputs() = Inputs::default();
    }

    pub fn analysis(&self) -> OperationState<AnalysisResult> {
        self.analysis.snapshot()
    }

    pub fn rewrite_state(&self) -> OperationState<String> {
        self.rewrite.snapshot()
    }

    pub fn job_suggestions(&self) -> OperationState<Vec<JobSuggestion>> {
        self.job_suggestions.snapshot()
    }

    pub fn pitch(&self) -> OperationState<String> {
        self.pitch.snapshot()
    }

    pub fn linkedin(&self) -> OperationState<LinkedInGeneratorResult> {
        self.linkedin.snapshot()
    }

    async fn run<T, F, Fut>(
        &self,
        slot: &OperationSlot<T>,
        precondition: Result<()>,
        call: F,
    ) -> Result<T>
    where
        T: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let ticket = slot.begin(precondition)?;
        info!("{} started", slot.action());
        let outcome = call().await;
        slot.finish(ticket, outcome)
    }

    /// Analyze the resume against the job description.
    pub async fn analyze(&self) -> Result<AnalysisResult> {
        let inputs = self.inputs();
        let precondition = if !inputs.has_job_description() || !inputs.has_resume() {
            Err(Error::invalid_input(MISSING_INPUTS_MESSAGE))
        } else if !inputs.terms_accepted {
            Err(Error::invalid_input(TERMS_REQUIRED_MESSAGE))
        } else {
            Ok(())
        };

        self.run(&self.analysis, precondition, || {
            self.advisor
                .analyze(&inputs.job_description, &inputs.resume)
        })
        .await
    }

    /// Rewrite the resume, applying the modernization suggestions from the
    /// last successful analysis.
    ///
    /// The analysis slot must be `Succeeded`. A result still shown from an
    /// earlier run while a re-analysis is pending or after it failed does not
    /// count.
    pub async fn rewrite(&self) -> Result<String> {
        let inputs = self.inputs();
        let analysis = self.analysis.snapshot();
        let analyzed = analysis.phase == Phase::Succeeded && analysis.result.is_some();
        let precondition = if analyzed && inputs.has_resume() && inputs.has_job_description() {
            Ok(())
        } else {
            Err(Error::invalid_input(REWRITE_PRECONDITION_MESSAGE))
        };
        let suggestions = analysis
            .result
            .map(|analysis| analysis.modernization_suggestions)
            .unwrap_or_default();

        self.run(&self.rewrite, precondition, || {
            self.advisor
                .rewrite(&inputs.resume, &inputs.job_description, &suggestions)
        })
        .await
    }

    /// Suggest alternative roles based on the resume alone.
    pub async fn find_jobs(&self) -> Result<Vec<JobSuggestion>> {
        let inputs = self.inputs();
        let precondition = if inputs.has_resume() {
            Ok(())
        } else {
            Err(Error::invalid_input(FIND_JOBS_PRECONDITION_MESSAGE))
        };

        self.run(&self.job_suggestions, precondition, || {
            self.advisor.find_jobs(&inputs.resume)
        })
        .await
    }

    pub async fn generate_pitch(&self) -> Result<String> {
        let inputs = self.inputs();
        let precondition = if inputs.has_resume() && inputs.has_job_description() {
            Ok(())
        } else {
            Err(Error::invalid_input(PITCH_PRECONDITION_MESSAGE))
        };

        self.run(&self.pitch, precondition, || {
            self.advisor
                .generate_pitch(&inputs.resume, &inputs.job_description)
        })
        .await
    }

    pub async fn generate_linkedin(&self) -> Result<LinkedInGeneratorResult> {
        let inputs = self.inputs();
        let precondition = if inputs.has_resume() && inputs.has_job_description() {
            Ok(())
        } else {
            Err(Error::invalid_input(LINKEDIN_PRECONDITION_MESSAGE))
        };

        self.run(&self.linkedin, precondition, || {
            self.advisor
                .generate_linkedin(&inputs.resume, &inputs.job_description)
        })
        .await
    }
}
