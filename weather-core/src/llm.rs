use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::tool::ToolDeclaration;

pub mod openai;

/// One call to a hosted language model.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub instructions: String,
    pub input: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclaration>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ModelResponse {
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

impl ModelResponse {
    /// All text the model produced, concatenated in output order.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                _ => None,
            })
            .flatten()
            .filter_map(|part| match part {
                ContentPart::OutputText { text } => Some(text.as_str()),
                ContentPart::Other => None,
            })
            .collect()
    }

    /// Convenience for a response holding nothing but text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            output: vec![OutputItem::Message {
                content: vec![ContentPart::OutputText { text: text.into() }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    FunctionCall {
        name: String,
        arguments: String,
        #[serde(default)]
        call_id: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    async fn respond(&self, request: &ModelRequest) -> anyhow::Result<ModelResponse>;
}
