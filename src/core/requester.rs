use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::{
    config::{PlannerConfig, PromptStrategy},
    error::{PlannerError, Result},
    services::{
        openai_client::{ChatCompletionRequest, OpenAIClient, RawCompletion},
        prompt::{self, PromptPair},
    },
    types::{response, response::DecodedPlan, trip_spec::TripSpec},
};

/// One way of asking the model for an itinerary and reading its answer.
#[async_trait]
pub trait PlanRequester: Send + Sync + fmt::Debug {
    fn strategy(&self) -> PromptStrategy;

    /// Build the system and user messages for a trip
    fn compose(&self, spec: &TripSpec, language: Option<&str>) -> Result<PromptPair>;

    /// Send the messages and return the assistant text. Single attempt.
    async fn invoke(&self, prompt: &PromptPair) -> Result<RawCompletion>;

    /// Turn the assistant text into a plan
    fn decode(&self, raw: &str) -> Result<DecodedPlan>;
}

/// Model call parameters shared by both strategies
#[derive(Clone, Debug)]
pub struct ChatSettings {
    client: OpenAIClient,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl ChatSettings {
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self {
            client: OpenAIClient::new(api_key, config.base_url()),
            model: config.model().to_string(),
            temperature: config.temperature(),
            timeout: config.timeout(),
        })
    }

    async fn send(&self, request: ChatCompletionRequest) -> Result<RawCompletion> {
        let body = request.into_value();
        debug!(
            target: "trip_planner::requester",
            model = %self.model,
            temperature = self.temperature,
            "requesting itinerary"
        );

        let response = timeout(self.timeout, self.client.chat_completion(&body, self.timeout))
            .await
            .map_err(|_| {
                PlannerError::Timeout(format!(
                    "model call exceeded {}s",
                    self.timeout.as_secs_f64()
                ))
            })??;

        let completion = RawCompletion::from_response(&response)?;
        if let Some(usage) = &completion.usage {
            debug!(
                target: "trip_planner::requester",
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion received"
            );
        }
        Ok(completion)
    }

    fn request(&self, prompt: &PromptPair) -> ChatCompletionRequest {
        ChatCompletionRequest::from_prompt(self.model.clone(), &prompt.system, &prompt.user)
            .with_temperature(self.temperature)
    }
}

/// Field list with format instructions; the answer may come wrapped in prose or a code fence.
#[cfg(feature = "structured-output")]
#[derive(Clone, Debug)]
pub struct StructuredOutputRequester {
    chat: ChatSettings,
}

#[cfg(feature = "structured-output")]
impl StructuredOutputRequester {
    pub fn new(chat: ChatSettings) -> Self {
        Self { chat }
    }
}

#[cfg(feature = "structured-output")]
#[async_trait]
impl PlanRequester for StructuredOutputRequester {
    fn strategy(&self) -> PromptStrategy {
        PromptStrategy::StructuredOutput
    }

    fn compose(&self, spec: &TripSpec, language: Option<&str>) -> Result<PromptPair> {
        prompt::compose_structured(spec, language)
    }

    async fn invoke(&self, prompt: &PromptPair) -> Result<RawCompletion> {
        self.chat.send(self.chat.request(prompt)).await
    }

    fn decode(&self, raw: &str) -> Result<DecodedPlan> {
        response::decode_structured_output(raw)
    }
}

/// Literal JSON template with the provider's JSON object mode; the answer must be bare JSON.
#[cfg(feature = "json-mode")]
#[derive(Clone, Debug)]
pub struct JsonModeRequester {
    chat: ChatSettings,
}

#[cfg(feature = "json-mode")]
impl JsonModeRequester {
    pub fn new(chat: ChatSettings) -> Self {
        Self { chat }
    }
}

#[cfg(feature = "json-mode")]
#[async_trait]
impl PlanRequester for JsonModeRequester {
    fn strategy(&self) -> PromptStrategy {
        PromptStrategy::JsonMode
    }

    fn compose(&self, spec: &TripSpec, language: Option<&str>) -> Result<PromptPair> {
        prompt::compose_json_template(spec, language)
    }

    async fn invoke(&self, prompt: &PromptPair) -> Result<RawCompletion> {
        let request = self.chat.request(prompt).with_json_object_mode();
        self.chat.send(request).await
    }

    fn decode(&self, raw: &str) -> Result<DecodedPlan> {
        response::decode_itinerary(raw)
    }
}

/// Pick the requester for the configured strategy.
///
/// Fails with `MissingCredential` before anything else, and with
/// `ProviderUnavailable` when the strategy was compiled out.
pub fn build_requester(config: &PlannerConfig) -> Result<Box<dyn PlanRequester>> {
    let chat = ChatSettings::from_config(config)?;

    match config.strategy() {
        #[cfg(feature = "structured-output")]
        PromptStrategy::StructuredOutput => Ok(Box::new(StructuredOutputRequester::new(chat))),
        #[cfg(feature = "json-mode")]
        PromptStrategy::JsonMode => Ok(Box::new(JsonModeRequester::new(chat))),
        #[allow(unreachable_patterns)]
        other => Err(PlannerError::ProviderUnavailable(format!(
            "the `{}` strategy is not available in this build (cargo feature disabled)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requester_needs_credential() {
        let err = build_requester(&PlannerConfig::new()).unwrap_err();
        assert!(matches!(err, PlannerError::MissingCredential));
    }

    #[cfg(all(feature = "structured-output", feature = "json-mode"))]
    #[test]
    fn test_requester_follows_strategy() {
        let config = PlannerConfig::new().with_api_key("sk-test");
        let requester = build_requester(&config).unwrap();
        assert_eq!(requester.strategy(), PromptStrategy::StructuredOutput);

        let config = config.with_strategy(PromptStrategy::JsonMode);
        let requester = build_requester(&config).unwrap();
        assert_eq!(requester.strategy(), PromptStrategy::JsonMode);
    }

    #[cfg(feature = "json-mode")]
    #[test]
    fn test_json_mode_rejects_fenced_answer() {
        let config = PlannerConfig::new()
            .with_api_key("sk-test")
            .with_strategy(PromptStrategy::JsonMode);
        let requester = build_requester(&config).unwrap();
        assert!(requester.decode("```json\n{}\n```").is_err());
        assert!(requester.decode("{}").is_ok());
    }
}
