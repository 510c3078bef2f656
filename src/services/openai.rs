use crate::config::OpenAiSettings;
use crate::core::picks::{
    build_selection_prompt, picks_response_schema, validate_picks, PickViolation, PICKS_SCHEMA_NAME,
};
use crate::models::{Cafe, CafePicksResponse, Preference};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while asking the model for picks
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("selection request timed out after {0}s")]
    Timeout(u64),

    #[error("OpenAI API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed model output: {0}")]
    Malformed(String),

    #[error("model output broke the selection contract: {0}")]
    Contract(#[from] PickViolation),
}

/// OpenAI chat completions client used to pick the top cafes
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    pub fn new(settings: &OpenAiSettings) -> Result<Self, SelectionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            timeout_secs: settings.timeout_secs,
            client,
        })
    }

    /// Ask the model for up to five picks among `cafes`
    ///
    /// The answer is schema-constrained and then checked again with
    /// [`validate_picks`]; any violation fails the call.
    pub async fn select_picks(
        &self,
        cafes: &[Cafe],
        preference: Preference,
    ) -> Result<CafePicksResponse, SelectionError> {
        if cafes.is_empty() {
            return Ok(CafePicksResponse::default());
        }

        let prompt = build_selection_prompt(cafes, preference);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: &prompt.system },
                ChatMessage { role: "user", content: &prompt.user },
            ],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: PICKS_SCHEMA_NAME,
                    strict: true,
                    schema: picks_response_schema(&prompt.allowed_ids, prompt.expected_picks),
                },
            },
        };

        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(
            "Requesting {} picks from {} for preference {}",
            prompt.expected_picks,
            self.model,
            preference
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Pick selection failed: {} - {}", status, body);
            return Err(SelectionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                SelectionError::Malformed(format!("unreadable completion: {}", e))
            } else {
                self.classify(e)
            }
        })?;

        let picks = parse_picks(chat)?;

        if let Err(violation) =
            validate_picks(&picks, &prompt.allowed_ids, prompt.expected_picks)
        {
            tracing::warn!("Model picks rejected: {}", violation);
            return Err(violation.into());
        }

        Ok(picks)
    }

    fn classify(&self, err: reqwest::Error) -> SelectionError {
        if err.is_timeout() {
            tracing::warn!("Pick selection timed out after {}s", self.timeout_secs);
            SelectionError::Timeout(self.timeout_secs)
        } else {
            SelectionError::RequestError(err)
        }
    }
}

fn parse_picks(chat: ChatResponse) -> Result<CafePicksResponse, SelectionError> {
    let message = chat
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| SelectionError::Malformed("completion has no choices".into()))?;

    if let Some(refusal) = message.refusal {
        return Err(SelectionError::Malformed(format!("model refused: {}", refusal)));
    }

    let content = message
        .content
        .ok_or_else(|| SelectionError::Malformed("completion has no content".into()))?;

    serde_json::from_str(&content)
        .map_err(|e| SelectionError::Malformed(format!("picks JSON did not match schema: {}", e)))
}
