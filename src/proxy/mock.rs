use super::ModelService;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One recorded model call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCall {
    pub system: String,
    pub prompt: String,
    pub schema: Option<Value>,
}

#[derive(Default)]
struct MockModelState {
    json_responses: Vec<Value>,
    text_responses: Vec<String>,
    failure: Option<String>,
    json_calls: usize,
    text_calls: usize,
    calls: Vec<ModelCall>,
}

/// Canned [`ModelService`] for exercising the proxy without a real model.
#[derive(Clone, Default)]
pub struct MockModelClient {
    state: Arc<Mutex<MockModelState>>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json_response(self, response: Value) -> Self {
        self.state.lock().unwrap().json_responses.push(response);
        self
    }

    pub fn with_text_response(self, response: String) -> Self {
        self.state.lock().unwrap().text_responses.push(response);
        self
    }

    /// Make every call fail with a provider error.
    pub fn with_failure(self, message: &str) -> Self {
        self.state.lock().unwrap().failure = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn get_calls(&self) -> Vec<ModelCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl ModelService for MockModelClient {
    async fn generate_json(&self, system: &str, prompt: &str, schema: &Value) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ModelCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            schema: Some(schema.clone()),
        });
        if let Some(message) = &state.failure {
            return Err(Error::AiProvider(message.clone()));
        }

        state.json_calls += 1;
        if state.json_responses.is_empty() {
            return Err(Error::AiProvider("No mock JSON configured".to_string()));
        }
        let index = (state.json_calls - 1) % state.json_responses.len();
        Ok(state.json_responses[index].clone())
    }

    async fn generate_text(&self, system: &str, prompt: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ModelCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            schema: None,
        });
        if let Some(message) = &state.failure {
            return Err(Error::AiProvider(message.clone()));
        }

        state.text_calls += 1;
        if state.text_responses.is_empty() {
            return Ok("Mock model text".to_string());
        }
        let index = (state.text_calls - 1) % state.text_responses.len();
        Ok(state.text_responses[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_cycles_and_records() {
        let model = MockModelClient::new()
            .with_json_response(json!({ "n": 1 }))
            .with_json_response(json!({ "n": 2 }));

        let schema = json!({ "type": "OBJECT" });
        assert_eq!(model.generate_json("s", "p1", &schema).await.unwrap()["n"], 1);
        assert_eq!(model.generate_json("s", "p2", &schema).await.unwrap()["n"], 2);
        assert_eq!(model.generate_json("s", "p3", &schema).await.unwrap()["n"], 1);
        assert_eq!(model.generate_text("s", "t").await.unwrap(), "Mock model text");

        let calls = model.get_calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[1].prompt, "p2");
        assert!(calls[3].schema.is_none());
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let model = MockModelClient::new().with_failure("quota exceeded");
        let err = model.generate_text("s", "p").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(ref m) if m == "quota exceeded"));
        assert_eq!(model.get_call_count(), 1);
    }
}
