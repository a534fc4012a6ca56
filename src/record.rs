use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The fixed metadata attached to every prompt record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub source: String,
    pub format: String,
    pub processed_by: String,
    pub processed: bool,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            source: "user_input".to_string(),
            format: "text".to_string(),
            processed_by: "LLM".to_string(),
            processed: true,
        }
    }
}

/// The document this tool produces: the prompt as typed, the prompt as refined,
/// and metadata describing how it got here.
///
/// Field order here is the order of the keys in the rendered JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub original_prompt: String,
    pub processed_prompt: String,
    pub metadata: Metadata,
}

impl PromptRecord {
    pub fn new(original: impl Into<String>, processed: impl Into<String>) -> Self {
        PromptRecord {
            original_prompt: original.into(),
            processed_prompt: processed.into(),
            metadata: Metadata::default(),
        }
    }

    /// Renders the record as JSON indented by two spaces.
    pub fn render(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize the prompt record")
    }

    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse a prompt record")
    }

    /// Whether the refined text differs from what the user typed.
    pub fn was_refined(&self) -> bool {
        self.original_prompt != self.processed_prompt
    }
}
