//! Query orchestration: model decision, optional weather lookup, final phrasing.
//!
//! Each query walks a small state machine. Every transition that touches the
//! network is a single awaited call; nothing runs concurrently.

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    Config, WeatherReading,
    error::AgentError,
    llm::{LanguageModel, ModelRequest, openai::OpenAiResponsesClient},
    provider::{WeatherProvider, provider_from_config},
    tool::{ToolInvocationRequest, WEATHER_TOOL_NAME, weather_tool},
};

pub const DECISION_INSTRUCTIONS: &str = "You are a helpful weather assistant. You can provide weather information for any location when asked. \
Be conversational and friendly. If the user asks about weather, use the weather tool to get current data. \
When calling the weather tool, use simple city names (e.g., \"Cincinnati\" instead of \"Cincinnati, OH\") for better results. \
If the user asks about something not weather-related, respond helpfully but mention you specialize in weather information.";

pub const PHRASING_INSTRUCTIONS: &str = "You received weather data. Format it in a natural, conversational way for the user. \
Include temperature, description, humidity, wind speed, and feels-like temperature.";

pub const NO_TEXT_FALLBACK: &str = "I apologize, but I had trouble processing your request.";

pub const PHRASING_FALLBACK: &str =
    "I received the weather data but had trouble formatting the response.";

#[derive(Debug)]
enum AgentState {
    AwaitingModelDecision,
    AwaitingToolResult(ToolInvocationRequest),
    AwaitingFinalPhrasing(WeatherReading),
    Done(String),
}

/// Answers one natural-language query, fetching weather when the model asks for it.
#[derive(Debug, Clone)]
pub struct WeatherAgent {
    model: Arc<dyn LanguageModel>,
    weather: Arc<dyn WeatherProvider>,
    model_id: String,
}

impl WeatherAgent {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        weather: Arc<dyn WeatherProvider>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            model,
            weather,
            model_id: model_id.into(),
        }
    }

    /// Wire the OpenAI client and weather provider described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let model = OpenAiResponsesClient::new(
            config.credentials.openai_api_key.clone(),
            &config.settings.openai_base_url,
        );
        Self::new(
            Arc::new(model),
            Arc::from(provider_from_config(config)),
            config.settings.model.clone(),
        )
    }

    /// Answer a query. Failures come back as a user-facing apology, never as an error.
    pub async fn answer(&self, user_text: &str) -> String {
        match self.try_answer(user_text).await {
            Ok(text) => text,
            Err(err) => {
                error!("Error processing query: {err}");
                err.user_message().to_string()
            }
        }
    }

    /// Same as [`answer`](Self::answer) but keeps the failure kind.
    pub async fn try_answer(&self, user_text: &str) -> Result<String, AgentError> {
        info!("Starting Agentic Process...");

        let mut state = AgentState::AwaitingModelDecision;
        loop {
            state = match state {
                AgentState::AwaitingModelDecision => self.decide(user_text).await?,
                AgentState::AwaitingToolResult(call) => self.look_up(call).await?,
                AgentState::AwaitingFinalPhrasing(reading) => {
                    self.phrase(user_text, &reading).await?
                }
                AgentState::Done(text) => return Ok(text),
            };
        }
    }

    async fn decide(&self, user_text: &str) -> Result<AgentState, AgentError> {
        info!("Step 1: User Query -> LLM");
        let response = self
            .model
            .respond(&self.decision_request(user_text))
            .await
            .map_err(AgentError::Model)?;

        match ToolInvocationRequest::first_matching(&response.output, WEATHER_TOOL_NAME) {
            Some(call) => Ok(AgentState::AwaitingToolResult(call)),
            None => {
                info!("Step 2: LLM -> Final Response");
                Ok(AgentState::Done(or_fallback(
                    response.output_text(),
                    NO_TEXT_FALLBACK,
                )))
            }
        }
    }

    async fn look_up(&self, call: ToolInvocationRequest) -> Result<AgentState, AgentError> {
        let args = call.weather_args()?;
        info!("Step 2: LLM -> Tool");
        let reading = self.weather.current_weather(&args.location).await?;
        Ok(AgentState::AwaitingFinalPhrasing(reading))
    }

    async fn phrase(
        &self,
        user_text: &str,
        reading: &WeatherReading,
    ) -> Result<AgentState, AgentError> {
        info!("Step 3: Tool -> LLM");
        let request = self.phrasing_request(user_text, reading)?;
        let response = self
            .model
            .respond(&request)
            .await
            .map_err(AgentError::Model)?;

        info!("Step 4: LLM -> Final Response");
        Ok(AgentState::Done(or_fallback(
            response.output_text(),
            PHRASING_FALLBACK,
        )))
    }

    fn decision_request(&self, user_text: &str) -> ModelRequest {
        ModelRequest {
            model: self.model_id.clone(),
            instructions: DECISION_INSTRUCTIONS.to_string(),
            input: user_text.to_string(),
            tools: vec![weather_tool()],
        }
    }

    fn phrasing_request(
        &self,
        user_text: &str,
        reading: &WeatherReading,
    ) -> Result<ModelRequest, AgentError> {
        let data = serde_json::to_string(reading).map_err(|e| AgentError::Model(e.into()))?;

        Ok(ModelRequest {
            model: self.model_id.clone(),
            instructions: PHRASING_INSTRUCTIONS.to_string(),
            input: format!("The user asked: \"{user_text}\". Here's the weather data: {data}"),
            tools: Vec::new(),
        })
    }
}

fn or_fallback(text: String, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}
