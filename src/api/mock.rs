use super::AdvisorService;
use crate::error::OperationError;
use crate::models::{
    Action, AnalysisResult, AnalyzePayload, FindJobsPayload, JobSuggestion,
    LinkedInGeneratorResult, ModernizationSuggestion, OperationRequest, ProfilePayload,
    RewritePayload,
};
use crate::{Error, ErrorKind, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type MockReply<T> = std::result::Result<T, OperationError>;

#[derive(Default)]
struct MockState {
    analyses: Vec<MockReply<AnalysisResult>>,
    rewrites: Vec<MockReply<String>>,
    job_suggestions: Vec<MockReply<Vec<JobSuggestion>>>,
    pitches: Vec<MockReply<String>>,
    linkedin: Vec<MockReply<LinkedInGeneratorResult>>,
    gates: HashMap<Action, Arc<Notify>>,
    requests: Vec<OperationRequest>,
}

/// In-memory [`AdvisorService`] with canned replies.
///
/// Replies for an action cycle in the order they were added. A gated action
/// parks every call until the gate is notified, which lets tests hold an
/// operation in its pending state.
#[derive(Clone, Default)]
pub struct MockAdvisorClient {
    state: Arc<Mutex<MockState>>,
}

impl MockAdvisorClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analysis_response(self, response: AnalysisResult) -> Self {
        self.state.lock().unwrap().analyses.push(Ok(response));
        self
    }

    pub fn with_rewrite_response(self, response: String) -> Self {
        self.state.lock().unwrap().rewrites.push(Ok(response));
        self
    }

    pub fn with_job_suggestions_response(self, response: Vec<JobSuggestion>) -> Self {
        self.state.lock().unwrap().job_suggestions.push(Ok(response));
        self
    }

    pub fn with_pitch_response(self, response: String) -> Self {
        self.state.lock().unwrap().pitches.push(Ok(response));
        self
    }

    pub fn with_linkedin_response(self, response: LinkedInGeneratorResult) -> Self {
        self.state.lock().unwrap().linkedin.push(Ok(response));
        self
    }

    /// Queue a failure for `action`, interleaved with its other replies.
    pub fn with_error(self, action: Action, error: OperationError) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            match action {
                Action::Analyze => state.analyses.push(Err(error)),
                Action::Rewrite => state.rewrites.push(Err(error)),
                Action::FindJobs => state.job_suggestions.push(Err(error)),
                Action::GeneratePitch => state.pitches.push(Err(error)),
                Action::GenerateLinkedin => state.linkedin.push(Err(error)),
            }
        }
        self
    }

    pub fn with_gate(self, action: Action, gate: Arc<Notify>) -> Self {
        self.state.lock().unwrap().gates.insert(action, gate);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn get_call_count_for(&self, action: Action) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|request| request.action() == action)
            .count()
    }

    /// Every request received so far, in arrival order.
    pub fn get_requests(&self) -> Vec<OperationRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    async fn respond<T: Clone + Send>(
        &self,
        request: OperationRequest,
        replies: fn(&MockState) -> &[MockReply<T>],
        default: impl FnOnce() -> MockReply<T> + Send,
    ) -> Result<T> {
        let action = request.action();
        let (index, gate) = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            let calls = state
                .requests
                .iter()
                .filter(|request| request.action() == action)
                .count();
            (calls - 1, state.gates.get(&action).cloned())
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let reply = {
            let state = self.state.lock().unwrap();
            let queued = replies(&*state);
            if queued.is_empty() {
                None
            } else {
                Some(queued[index % queued.len()].clone())
            }
        };

        reply.unwrap_or_else(default).map_err(Error::from)
    }
}

#[async_trait]
impl AdvisorService for MockAdvisorClient {
    async fn analyze(&self, job_description: &str, resume: &str) -> Result<AnalysisResult> {
        let request = OperationRequest::Analyze(AnalyzePayload {
            job_description: job_description.to_string(),
            resume: resume.to_string(),
        });
        self.respond(
            request,
            |state| state.analyses.as_slice(),
            || {
                Err(OperationError::new(
                    ErrorKind::Unknown,
                    "No mock analysis configured",
                ))
            },
        )
        .await
    }

    async fn rewrite(
        &self,
        original_resume: &str,
        job_description: &str,
        modernization_suggestions: &[ModernizationSuggestion],
    ) -> Result<String> {
        let default = format!("Rewritten resume:\n{}", original_resume);
        let request = OperationRequest::Rewrite(RewritePayload {
            original_resume: original_resume.to_string(),
            job_description: job_description.to_string(),
            modernization_suggestions: modernization_suggestions.to_vec(),
        });
        self.respond(request, |state| state.rewrites.as_slice(), || Ok(default))
            .await
    }

    async fn find_jobs(&self, resume: &str) -> Result<Vec<JobSuggestion>> {
        let request = OperationRequest::FindJobs(FindJobsPayload {
            resume: resume.to_string(),
        });
        self.respond(
            request,
            |state| state.job_suggestions.as_slice(),
            || Ok(Vec::new()),
        )
        .await
    }

    async fn generate_pitch(&self, resume: &str, job_description: &str) -> Result<String> {
        let request = OperationRequest::GeneratePitch(ProfilePayload {
            resume: resume.to_string(),
            job_description: job_description.to_string(),
        });
        self.respond(
            request,
            |state| state.pitches.as_slice(),
            || Ok("A mock elevator pitch".to_string()),
        )
        .await
    }

    async fn generate_linkedin(
        &self,
        resume: &str,
        job_description: &str,
    ) -> Result<LinkedInGeneratorResult> {
        let request = OperationRequest::GenerateLinkedin(ProfilePayload {
            resume: resume.to_string(),
            job_description: job_description.to_string(),
        });
        self.respond(
            request,
            |state| state.linkedin.as_slice(),
            || {
                Ok(LinkedInGeneratorResult {
                    suggested_headlines: vec!["Mock Headline".to_string()],
                    generated_about_section: "Mock about section".to_string(),
                    reasoning: Vec::new(),
                })
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_cycles_pitch_responses() {
        let client = MockAdvisorClient::new()
            .with_pitch_response("Pitch 1".to_string())
            .with_pitch_response("Pitch 2".to_string());

        assert_eq!(client.generate_pitch("r", "j").await.unwrap(), "Pitch 1");
        assert_eq!(client.generate_pitch("r", "j").await.unwrap(), "Pitch 2");
        // Should cycle back
        assert_eq!(client.generate_pitch("r", "j").await.unwrap(), "Pitch 1");
    }

    #[tokio::test]
    async fn test_mock_replays_errors_with_kind() {
        let client = MockAdvisorClient::new().with_error(
            Action::FindJobs,
            OperationError::new(ErrorKind::ServerError, "quota exceeded"),
        );

        let err = client.find_jobs("resume").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[tokio::test]
    async fn test_mock_defaults() {
        let client = MockAdvisorClient::new();

        assert!(client.find_jobs("r").await.unwrap().is_empty());
        assert!(client.rewrite("old", "jd", &[]).await.unwrap().contains("old"));
        let err = client.analyze("jd", "r").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_mock_call_count_and_requests() {
        let client = MockAdvisorClient::new();

        assert_eq!(client.get_call_count(), 0);

        client.find_jobs("resume").await.unwrap();
        client.generate_pitch("resume", "jd").await.unwrap();
        assert_eq!(client.get_call_count(), 2);
        assert_eq!(client.get_call_count_for(Action::FindJobs), 1);
        assert_eq!(client.get_call_count_for(Action::Analyze), 0);

        let requests = client.get_requests();
        assert_eq!(requests[0].action(), Action::FindJobs);
        assert_eq!(requests[1].action(), Action::GeneratePitch);
    }

    #[tokio::test]
    async fn test_mock_gate_holds_call_until_notified() {
        let gate = Arc::new(Notify::new());
        let client = MockAdvisorClient::new()
            .with_pitch_response("released".to_string())
            .with_gate(Action::GeneratePitch, gate.clone());

        let pending = tokio::spawn({
            let client = client.clone();
            async move { client.generate_pitch("r", "j").await }
        });

        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        gate.notify_one();
        assert_eq!(pending.await.unwrap().unwrap(), "released");
    }
}
