//! Session-level settings, resolved once at startup and handed to the requester.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PlannerError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_DAYS: u32 = 30;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Models offered by the settings panel. Any other identifier is passed through.
pub const SUGGESTED_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-5"];

/// How the schema is described to the model and how its answer is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStrategy {
    /// Natural-language field list plus format instructions, lenient decoder
    #[default]
    StructuredOutput,
    /// Literal JSON template plus the provider's JSON object mode
    JsonMode,
}

impl PromptStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            PromptStrategy::StructuredOutput => "structured",
            PromptStrategy::JsonMode => "json-mode",
        }
    }
}

impl fmt::Display for PromptStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PromptStrategy {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "structured" | "structured-output" => Ok(PromptStrategy::StructuredOutput),
            "json" | "json-mode" | "json-template" => Ok(PromptStrategy::JsonMode),
            other => Err(PlannerError::ProviderUnavailable(format!(
                "unknown prompt strategy `{}` (expected `structured` or `json-mode`)",
                other
            ))),
        }
    }
}

/// Value ranges the input layer enforces before a form becomes a `TripSpec`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputBounds {
    pub max_days: u32,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            max_days: DEFAULT_MAX_DAYS,
        }
    }
}

impl InputBounds {
    pub const MIN_DAYS: u32 = 1;
    pub const MIN_TEMPERATURE: f32 = 0.0;
    pub const MAX_TEMPERATURE: f32 = 1.0;

    pub fn check_duration(&self, days: u32) -> Result<()> {
        if (Self::MIN_DAYS..=self.max_days).contains(&days) {
            Ok(())
        } else {
            Err(PlannerError::InvalidInput(format!(
                "trip duration must be between {} and {} days, got {}",
                Self::MIN_DAYS,
                self.max_days,
                days
            )))
        }
    }

    pub fn check_temperature(temperature: f32) -> Result<()> {
        if (Self::MIN_TEMPERATURE..=Self::MAX_TEMPERATURE).contains(&temperature) {
            Ok(())
        } else {
            Err(PlannerError::InvalidInput(format!(
                "temperature must be between {:.1} and {:.1}, got {}",
                Self::MIN_TEMPERATURE,
                Self::MAX_TEMPERATURE,
                temperature
            )))
        }
    }
}

/// Resolved planner settings
#[derive(Clone)]
pub struct PlannerConfig {
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    language: Option<String>,
    strategy: PromptStrategy,
    bounds: InputBounds,
    timeout: Duration,
}

impl fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("language", &self.language)
            .field("strategy", &self.strategy)
            .field("bounds", &self.bounds)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            language: None,
            strategy: PromptStrategy::default(),
            bounds: InputBounds::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings from the environment (and `.env`), with defaults for everything unset.
    ///
    /// The credential fallback to `OPENAI_API_KEY` happens here and nowhere else.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        config.api_key = non_empty_var("OPENAI_API_KEY");
        if let Some(base_url) =
            non_empty_var("OPENAI_BASE_URL").or_else(|| non_empty_var("OPENROUTER_BASE_URL"))
        {
            config.base_url = base_url;
        }
        if let Some(model) = non_empty_var("TRIP_PLANNER_MODEL") {
            config.model = model;
        }
        config.language = non_empty_var("TRIP_PLANNER_LANGUAGE");
        if let Some(strategy) = non_empty_var("TRIP_PLANNER_STRATEGY") {
            config.strategy = strategy.parse()?;
        }
        Ok(config)
    }

    /// An explicit credential wins over whatever the environment provided
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        if !api_key.trim().is_empty() {
            self.api_key = Some(api_key.trim().to_string());
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Result<Self> {
        InputBounds::check_temperature(temperature)?;
        self.temperature = temperature;
        Ok(self)
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        let trimmed = language.trim();
        self.language = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_strategy(mut self, strategy: PromptStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_days(mut self, max_days: u32) -> Result<Self> {
        if max_days < InputBounds::MIN_DAYS {
            return Err(PlannerError::Config(format!(
                "max days must be at least {}",
                InputBounds::MIN_DAYS
            )));
        }
        self.bounds.max_days = max_days;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The credential, or `MissingCredential` when neither source supplied one
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().ok_or(PlannerError::MissingCredential)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn strategy(&self) -> PromptStrategy {
        self.strategy
    }

    pub fn bounds(&self) -> &InputBounds {
        &self.bounds
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
