pub mod chat;
pub mod prompt;
pub mod provider;
pub mod providers;

pub use chat::{ChatDriver, TurnError};
pub use prompt::{PromptTemplate, PROMPT_VERSION};
pub use provider::{LlmError, LlmProvider};
pub use providers::gemini::GeminiProvider;
