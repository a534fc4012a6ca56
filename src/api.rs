use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::de::Error as _;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::Config;

const REFINE_INSTRUCTION: &str =
    "Refine and enhance the following prompt for clarity and specificity, keeping the original intent";

#[derive(Debug, Deserialize, Clone)]
struct ErrorResponse {
    message: String,

    // Some providers send a number here, others a string
    code: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone)]
struct ErrorResponseContainer {
    error: ErrorResponse,
}

/// Why a refinement request produced no usable text.
#[derive(Debug, Error)]
pub enum RefineError {
    #[error("request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to parse JSON: {source}\nRaw JSON: {body}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },
}

/// The result of asking the service to refine a prompt.
#[derive(Debug)]
pub enum RefineOutcome {
    Refined(String),
    Failed(RefineError),
}

impl RefineOutcome {
    /// Resolves the outcome to the text that should be recorded, falling back
    /// to `original` when the request failed.
    pub fn into_text(self, original: &str) -> String {
        match self {
            RefineOutcome::Refined(text) => text,
            RefineOutcome::Failed(_) => original.to_string(),
        }
    }

    pub fn is_refined(&self) -> bool {
        matches!(self, RefineOutcome::Refined(_))
    }
}

/// Wraps the user's prompt in the instruction sent to the completion endpoint.
pub fn refinement_instruction(prompt: &str) -> String {
    format!("{REFINE_INSTRUCTION}: {prompt}")
}

/// `ApiClient` sends a single, non-streaming completion request to an OpenAI compatible
/// `/v1/completions` endpoint asking for a refined version of a prompt.
pub struct ApiClient {
    config: Config,
    http: Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self::with_http_client(config, http))
    }

    pub(crate) fn with_http_client(config: &Config, http: Client) -> Self {
        ApiClient {
            config: config.clone(),
            http,
        }
    }

    /// Asks the service to refine `prompt`.
    ///
    /// This never returns an error to the caller. Transport errors, non-2xx statuses and
    /// undecodable bodies are logged and reported as `RefineOutcome::Failed`. A response
    /// without a `text` field is treated as the service having nothing to add, so the
    /// original prompt comes back as the refined text.
    #[instrument(skip_all, fields(endpoint = %self.config.endpoint))]
    pub async fn refine(&self, prompt: &str, api_key: &str) -> RefineOutcome {
        match self.request_refinement(prompt, api_key).await {
            Ok(Some(text)) => {
                debug!(chars = text.len(), "received refined prompt");
                RefineOutcome::Refined(text)
            }
            Ok(None) => {
                debug!("response had no text field, keeping the original prompt");
                RefineOutcome::Refined(prompt.to_string())
            }
            Err(e) => {
                error!("Error calling LLM API: {e}");
                RefineOutcome::Failed(e)
            }
        }
    }

    /// Builds the JSON request body for a refinement of `prompt`.
    ///
    /// The body always carries the wrapped prompt, `max_tokens` and `temperature`;
    /// `model` is only included when one is configured.
    pub fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        let mut body = json!({
            "prompt": refinement_instruction(prompt),
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temp,
        });

        if let Some(model_id) = &self.config.model_id {
            body["model"] = json!(model_id);
        }

        body
    }

    async fn request_refinement(
        &self,
        prompt: &str,
        api_key: &str,
    ) -> Result<Option<String>, RefineError> {
        let body = self.build_request_body(prompt);

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(RefineError::Status {
                status,
                message: error_message(&body),
            });
        }

        let response_text = response.text().await?;
        parse_completion(&response_text)
    }
}

/// Pulls the `text` field out of a successful response body.
///
/// The body has to be a JSON object. A missing or `null` `text` means the service had
/// nothing to add; a `text` of any other non-string type is a decode failure.
fn parse_completion(response_text: &str) -> Result<Option<String>, RefineError> {
    let decode_error = |source: serde_json::Error| RefineError::Decode {
        source,
        body: response_text.to_string(),
    };

    let mut fields = match serde_json::from_str::<Value>(response_text).map_err(decode_error)? {
        Value::Object(fields) => fields,
        other => {
            return Err(decode_error(serde_json::Error::custom(format!(
                "expected a JSON object, found {other}"
            ))))
        }
    };

    // Everything besides `text` is ignored
    match fields.remove("text") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => Err(decode_error(serde_json::Error::custom(format!(
            "expected `text` to be a string, found {other}"
        )))),
    }
}

/// Uses the provider's error message when the body is an error container,
/// otherwise the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponseContainer>(body) {
        Ok(container) => match container.error.code {
            Some(code) => format!("{} (code {})", container.error.message, code),
            None => container.error.message,
        },
        Err(_) => body.to_string(),
    }
}
