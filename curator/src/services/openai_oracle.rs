//! OpenAI-compatible decision oracle
//!
//! Posts one chat completion with the offered tools and turns the returned
//! tool calls into proposed actions.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use shared::{service_debug, ServiceId};

use crate::config::CuratorConfig;
use crate::error::{CuratorError, CuratorResult, OracleFailure};
use crate::traits::{DecisionOracle, DecisionRequest, ProposedAction};

pub struct OpenAiOracle {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiOracle {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> CuratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CuratorError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &CuratorConfig) -> CuratorResult<Self> {
        Self::new(
            config.require_api_key()?,
            config.base_url.clone(),
            config.model.clone(),
            config.oracle_timeout,
        )
    }

    fn request_body(&self, request: &DecisionRequest) -> Value {
        let tools: Vec<Value> = request.tools.iter().map(|tool| tool.to_openai_tool()).collect();

        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user}
            ],
            "tools": tools,
            "tool_choice": "auto",
            "temperature": request.temperature,
            "max_tokens": request.max_tokens
        })
    }
}

/// Extract the tool calls of the first choice
fn parse_tool_calls(response: &Value) -> Result<Vec<ProposedAction>, OracleFailure> {
    let message = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| OracleFailure::InvalidResponse("No choices in response".to_string()))?;

    let Some(calls) = message.get("tool_calls").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    calls
        .iter()
        .map(|call| {
            let function = call
                .get("function")
                .ok_or_else(|| OracleFailure::InvalidResponse("Tool call without function".to_string()))?;
            let name = function
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| OracleFailure::InvalidResponse("Tool call without name".to_string()))?;
            let raw_arguments = function.get("arguments").and_then(Value::as_str).unwrap_or("{}");
            let arguments: Value = serde_json::from_str(raw_arguments)
                .map_err(|e| OracleFailure::InvalidResponse(format!("Arguments of {name} are not JSON: {e}")))?;

            Ok(ProposedAction::new(name, arguments))
        })
        .collect()
}

#[async_trait]
impl DecisionOracle for OpenAiOracle {
    async fn propose_actions(&self, request: &DecisionRequest) -> Result<Vec<ProposedAction>, OracleFailure> {
        let request_start = std::time::Instant::now();

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleFailure::Timeout
                } else {
                    OracleFailure::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return match response.status().as_u16() {
                401 => Err(OracleFailure::AuthenticationFailed),
                429 => Err(OracleFailure::RateLimitExceeded),
                503 => Err(OracleFailure::ServiceUnavailable),
                _ => Err(OracleFailure::ServerError(response.status().to_string())),
            };
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| OracleFailure::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let actions = parse_tool_calls(&response_json)?;
        service_debug!(
            ServiceId::current(),
            "🤖 Oracle proposed {} actions in {:?}",
            actions.len(),
            request_start.elapsed()
        );
        Ok(actions)
    }
}
