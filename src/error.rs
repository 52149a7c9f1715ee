use thiserror::Error;

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Please enter a destination.")]
    MissingDestination,

    #[error("Missing API key. Pass --api-key or set OPENAI_API_KEY.")]
    MissingCredential,

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Could not decode itinerary response: {0}")]
    ResponseDecode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::MissingDestination => "MISSING_DESTINATION",
            PlannerError::MissingCredential => "MISSING_CREDENTIAL",
            PlannerError::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            PlannerError::ResponseDecode(_) => "RESPONSE_DECODE_ERROR",
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::InvalidInput(_) => "INVALID_INPUT",
            PlannerError::Provider(_) => "PROVIDER_ERROR",
            PlannerError::Timeout(_) => "TIMEOUT_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True for failures detected on the form itself, before any request is built
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            PlannerError::MissingDestination | PlannerError::InvalidInput(_)
        )
    }

    /// The single message shown to the user when a submission fails
    pub fn user_message(&self) -> String {
        if self.is_field_error() {
            self.to_string()
        } else {
            format!("Failed to generate itinerary: {}", self)
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "field_error": self.is_field_error()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_are_shown_verbatim() {
        let err = PlannerError::MissingDestination;
        assert_eq!(err.user_message(), "Please enter a destination.");
        assert_eq!(err.error_code(), "MISSING_DESTINATION");
    }

    #[test]
    fn test_pipeline_errors_are_prefixed() {
        let err = PlannerError::ResponseDecode("expected a JSON object".to_string());
        assert_eq!(
            err.user_message(),
            "Failed to generate itinerary: Could not decode itinerary response: expected a JSON object"
        );

        let payload = err.to_error_payload();
        assert_eq!(payload["error"]["code"], "RESPONSE_DECODE_ERROR");
        assert_eq!(payload["error"]["field_error"], false);
    }
}
