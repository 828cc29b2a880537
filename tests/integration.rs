use pretty_assertions::assert_eq;
use roleready::{
    api::{AdvisorService, ApiClient, DEFAULT_TIMEOUT},
    app::App,
    config::Config,
    proxy::{self, Dispatcher, MockModelClient},
    state::Phase,
    ErrorKind,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

const PROXY_PATH: &str = "/api/advisor";
const JOB_DESCRIPTION: &str = "Senior Python engineer. SQL required.";
const RESUME: &str = "Five years of production Python.";

fn analysis_fixture() -> Value {
    serde_json::from_str(include_str!("fixtures/analysis_response.json")).unwrap()
}

/// Start the reference proxy on an ephemeral port and return its endpoint.
async fn spawn_proxy(model: MockModelClient) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let dispatcher = Dispatcher::new(Arc::new(model));
    tokio::spawn(async move { proxy::serve(listener, dispatcher, PROXY_PATH).await });
    format!("http://{}{}", addr, PROXY_PATH)
}

fn app_for(endpoint: &str) -> App {
    let endpoint = endpoint.to_string();
    let config = Config::from_lookup(|key| match key {
        "ROLEREADY_ENDPOINT" => Some(endpoint.clone()),
        "ROLEREADY_TIMEOUT_SECS" => Some("10".to_string()),
        _ => None,
    })
    .unwrap();
    let app = App::new(&config);
    app.set_job_description(JOB_DESCRIPTION);
    app.set_resume(RESUME);
    app.set_terms_accepted(true);
    app
}

#[tokio::test]
async fn test_analyze_then_rewrite_through_proxy() {
    let model = MockModelClient::new()
        .with_json_response(analysis_fixture())
        .with_text_response("Rewritten: Python and SQL".to_string());
    let app = app_for(&spawn_proxy(model.clone()).await);

    let analysis = app.analyze().await.unwrap();
    assert_eq!(analysis.score, 6.5);
    assert_eq!(analysis.keyword_gaps[0].keyword, "SQL");
    assert_eq!(app.analysis().phase, Phase::Succeeded);

    let rewritten = app.rewrite().await.unwrap();
    assert_eq!(rewritten, "Rewritten: Python and SQL");

    let calls = model.get_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].schema.is_some());
    assert!(calls[0].prompt.contains(JOB_DESCRIPTION));
    assert!(calls[1].schema.is_none());
    assert!(calls[1].prompt.contains("Modernization Instructions"));
}

#[tokio::test]
async fn test_generation_tools_through_proxy() {
    let model = MockModelClient::new()
        .with_json_response(json!([
            { "title": "Data Engineer", "justification": "Production Python pipelines." }
        ]))
        .with_json_response(json!({
            "suggestedHeadlines": ["Python Engineer | Data Pipelines"],
            "generatedAboutSection": "I build reliable Python services.",
            "reasoning": ["Leads with the strongest skill."]
        }))
        .with_text_response("I ship Python that scales.".to_string());
    let app = app_for(&spawn_proxy(model).await);

    let jobs = app.find_jobs().await.unwrap();
    assert_eq!(jobs[0].title, "Data Engineer");

    let profile = app.generate_linkedin().await.unwrap();
    assert_eq!(
        profile.suggested_headlines,
        vec!["Python Engineer | Data Pipelines".to_string()]
    );

    let pitch = app.generate_pitch().await.unwrap();
    assert_eq!(pitch, "I ship Python that scales.");
    assert_eq!(app.pitch().result.as_deref(), Some("I ship Python that scales."));
}

#[tokio::test]
async fn test_model_failure_surfaces_as_server_error() {
    let model = MockModelClient::new().with_failure("upstream quota exhausted");
    let app = app_for(&spawn_proxy(model).await);

    let err = app.analyze().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerError);

    let state = app.analysis();
    assert_eq!(state.phase, Phase::Failed);
    let stored = state.error.unwrap();
    assert_eq!(stored.kind, ErrorKind::ServerError);
    assert!(!stored.message.is_empty());
    assert!(!stored.message.contains("quota"));
}

#[tokio::test]
async fn test_off_contract_model_output_is_schema_violation() {
    let mut body = analysis_fixture();
    body.as_object_mut().unwrap().remove("alignmentTable");
    let model = MockModelClient::new().with_json_response(body);
    let app = app_for(&spawn_proxy(model).await);

    let err = app.analyze().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    assert!(app.analysis().result.is_none());
}

#[tokio::test]
async fn test_proxy_input_validation_reaches_client_as_server_error() {
    let model = MockModelClient::new();
    let endpoint = spawn_proxy(model.clone()).await;
    let client = ApiClient::new(endpoint, DEFAULT_TIMEOUT);

    let err = client.find_jobs("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert_eq!(err.to_string(), "The resume must not be empty.");
    assert_eq!(model.get_call_count(), 0);
}
