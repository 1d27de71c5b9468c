use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{error::AgentError, llm::OutputItem};

pub const WEATHER_TOOL_NAME: &str = "get_current_weather";

/// A function the model may ask to have invoked.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolDeclaration {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
    pub strict: bool,
}

/// The single tool the agent declares.
pub fn weather_tool() -> ToolDeclaration {
    ToolDeclaration {
        kind: "function",
        name: WEATHER_TOOL_NAME,
        description: "Get the current weather conditions for a specific location",
        parameters: json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "Only the city name, e.g. \"Cincinnati\" instead of \"Cincinnati, OH\""
                }
            },
            "required": ["location"],
            "additionalProperties": false
        }),
        strict: false,
    }
}

/// A function-call item the model emitted for a declared tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocationRequest {
    pub tool_name: String,
    pub arguments_json: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherToolArgs {
    pub location: String,
}

impl ToolInvocationRequest {
    /// First function-call item naming `tool_name`; later ones are ignored.
    pub fn first_matching(output: &[OutputItem], tool_name: &str) -> Option<Self> {
        output.iter().find_map(|item| match item {
            OutputItem::FunctionCall {
                name, arguments, ..
            } if name == tool_name => Some(Self {
                tool_name: name.clone(),
                arguments_json: arguments.clone(),
            }),
            _ => None,
        })
    }

    pub fn weather_args(&self) -> Result<WeatherToolArgs, AgentError> {
        serde_json::from_str(&self.arguments_json)
            .map_err(|e| AgentError::MalformedToolArguments(e.to_string()))
    }
}
