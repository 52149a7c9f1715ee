pub mod openai_client;
pub mod prompt;

pub use openai_client::{ChatCompletionRequest, OpenAIClient, RawCompletion, TokenUsage};
pub use prompt::PromptPair;
