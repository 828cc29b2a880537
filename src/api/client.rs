use super::AdvisorService;
use crate::models::{
    AnalysisResult, AnalyzePayload, ErrorBody, FindJobsPayload, JobSuggestion,
    LinkedInGeneratorResult, ModernizationSuggestion, OperationRequest, ProfilePayload,
    RewritePayload,
};
use crate::{schema, Error, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use uuid::Uuid;

/// Upper bound on a single backend call; model calls can stall indefinitely.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the backend proxy. All five operations go through
/// [`ApiClient::invoke`].
pub struct ApiClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        Self::new_with_client(endpoint, timeout, Client::new())
    }

    pub fn new_with_client(endpoint: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one `{action, payload}` envelope and decode the success body with
    /// `parse`. Either the whole typed result comes back or a classified error
    /// does; nothing in between.
    pub async fn invoke<T>(
        &self,
        request: &OperationRequest,
        parse: fn(&str) -> Result<T>,
    ) -> Result<T> {
        let body = self.send(request).await?;
        parse(&body)
    }

    async fn send(&self, request: &OperationRequest) -> Result<String> {
        let action = request.action().as_str();
        let request_id = Uuid::new_v4();
        tracing::debug!(
            "[{}] Sending `{}` request to {}",
            request_id,
            action,
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("[{}] Failed to send `{}` request: {}", request_id, action, e);
                Error::network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "[{}] Backend error for `{}` (status {}): {}",
                request_id,
                action,
                status,
                body
            );
            return Err(Error::Server {
                status: status.as_u16(),
                message: server_error_message(status.as_u16(), &body),
            });
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!(
                "[{}] Failed to read `{}` response body: {}",
                request_id,
                action,
                e
            );
            Error::network(e)
        })?;
        tracing::debug!(
            "[{}] `{}` succeeded ({} bytes)",
            request_id,
            action,
            body.len()
        );
        Ok(body)
    }
}

/// Message for a non-success response: the backend's `{error}` text when it
/// sent one, otherwise a generic line naming the status.
pub fn server_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error.trim().to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

#[async_trait]
impl AdvisorService for ApiClient {
    async fn analyze(&self, job_description: &str, resume: &str) -> Result<AnalysisResult> {
        let request = OperationRequest::Analyze(AnalyzePayload {
            job_description: job_description.to_string(),
            resume: resume.to_string(),
        });
        self.invoke(&request, schema::parse_analysis).await
    }

    async fn rewrite(
        &self,
        original_resume: &str,
        job_description: &str,
        modernization_suggestions: &[ModernizationSuggestion],
    ) -> Result<String> {
        let request = OperationRequest::Rewrite(RewritePayload {
            original_resume: original_resume.to_string(),
            job_description: job_description.to_string(),
            modernization_suggestions: modernization_suggestions.to_vec(),
        });
        self.invoke(&request, schema::parse_rewrite).await
    }

    async fn find_jobs(&self, resume: &str) -> Result<Vec<JobSuggestion>> {
        let request = OperationRequest::FindJobs(FindJobsPayload {
            resume: resume.to_string(),
        });
        self.invoke(&request, schema::parse_job_suggestions).await
    }

    async fn generate_pitch(&self, resume: &str, job_description: &str) -> Result<String> {
        let request = OperationRequest::GeneratePitch(ProfilePayload {
            resume: resume.to_string(),
            job_description: job_description.to_string(),
        });
        self.invoke(&request, schema::parse_pitch).await
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
        self.invoke(&request, schema::parse_linkedin).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{INVALID_RESPONSE_MESSAGE, TIMEOUT_MESSAGE};
    use crate::models::{ModernizationCategory, ModernizationSuggestion};
    use crate::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT_PATH: &str = "/api/advisor";
    const ANALYSIS_FIXTURE: &str = include_str!("../../tests/fixtures/analysis_response.json");

    fn make_client(server: &MockServer) -> ApiClient {
        ApiClient::new(format!("{}{}", server.uri(), ENDPOINT_PATH), DEFAULT_TIMEOUT)
    }

    async fn respond_with(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_analyze_sends_envelope_and_parses_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({
                "action": "analyze",
                "payload": {
                    "jobDescription": "Need Python and SQL",
                    "resume": "5 years Python, no SQL"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(ANALYSIS_FIXTURE))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        let result = client
            .analyze("Need Python and SQL", "5 years Python, no SQL")
            .await
            .unwrap();

        assert_eq!(result.score, 6.5);
        assert_eq!(result.keyword_gaps[0].keyword, "SQL");
    }

    #[tokio::test]
    async fn test_server_error_uses_backend_message() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(500).set_body_json(json!({ "error": "quota exceeded" })),
        )
        .await;

        let err = make_client(&server).find_jobs("resume").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.to_string(), "quota exceeded");
        assert!(matches!(err, Error::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_server_error_with_empty_body_gets_generic_message() {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(502).set_body_string("")).await;

        let err = make_client(&server)
            .generate_pitch("resume", "jd")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[tokio::test]
    async fn test_server_error_with_html_body_gets_generic_message() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"),
        )
        .await;

        let err = make_client(&server).analyze("jd", "resume").await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 404");
    }

    #[tokio::test]
    async fn test_missing_field_is_schema_violation() {
        let server = MockServer::start().await;
        let mut body: serde_json::Value = serde_json::from_str(ANALYSIS_FIXTURE).unwrap();
        body.as_object_mut().unwrap().remove("alignmentTable");
        respond_with(&server, ResponseTemplate::new(200).set_body_json(body)).await;

        let err = make_client(&server).analyze("jd", "resume").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert_eq!(err.to_string(), INVALID_RESPONSE_MESSAGE);
    }

    #[tokio::test]
    async fn test_rewrite_unwraps_wrapper_object() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .and(body_json(json!({
                "action": "rewrite",
                "payload": {
                    "originalResume": "old resume",
                    "jobDescription": "jd",
                    "modernizationSuggestions": [{
                        "item": "COBOL",
                        "category": "Outdated Skill",
                        "reason": "Rarely requested",
                        "suggestion": "Python"
                    }]
                }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "rewrittenResume": "Text A" })),
            )
            .mount(&server)
            .await;

        let suggestions = vec![ModernizationSuggestion {
            item: "COBOL".to_string(),
            category: ModernizationCategory::OutdatedSkill,
            reason: "Rarely requested".to_string(),
            suggestion: Some("Python".to_string()),
        }];
        let text = make_client(&server)
            .rewrite("old resume", "jd", &suggestions)
            .await
            .unwrap();
        assert_eq!(text, "Text A");
    }

    #[tokio::test]
    async fn test_pitch_and_linkedin_parse() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .and(body_json(json!({
                "action": "generate_pitch",
                "payload": { "resume": "r", "jobDescription": "j" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pitch": "Hello!" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .and(body_json(json!({
                "action": "generate_linkedin",
                "payload": { "resume": "r", "jobDescription": "j" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "suggestedHeadlines": ["Backend Engineer | Python"],
                "generatedAboutSection": "I build services.",
                "reasoning": ["Leads with the strongest skill."]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        assert_eq!(client.generate_pitch("r", "j").await.unwrap(), "Hello!");
        let linkedin = client.generate_linkedin("r", "j").await.unwrap();
        assert_eq!(linkedin.suggested_headlines.len(), 1);
        assert_eq!(linkedin.generated_about_section, "I build services.");
    }

    #[tokio::test]
    async fn test_find_jobs_accepts_empty_array() {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

        let jobs = make_client(&server).find_jobs("resume").await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_network_failure() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({ "pitch": "late" }))
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let client = ApiClient::new(
            format!("{}{}", server.uri(), ENDPOINT_PATH),
            Duration::from_millis(50),
        );
        let err = client.generate_pitch("r", "j").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkFailure);
        assert_eq!(err.to_string(), TIMEOUT_MESSAGE);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_failure() {
        let client = ApiClient::new(
            "http://127.0.0.1:1/api/advisor".to_string(),
            Duration::from_secs(5),
        );
        let err = client.find_jobs("resume").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkFailure);
        assert!(!err.to_string().contains("127.0.0.1"));
    }

    #[test]
    fn test_server_error_message_fallbacks() {
        assert_eq!(server_error_message(500, r#"{"error":"boom"}"#), "boom");
        assert_eq!(
            server_error_message(500, r#"{"error":"  "}"#),
            "Request failed with status 500"
        );
        assert_eq!(
            server_error_message(429, r#"{"message":"slow down"}"#),
            "Request failed with status 429"
        );
        assert_eq!(server_error_message(503, ""), "Request failed with status 503");
    }
}
