use chef_core::{ConversationTurn, Session, TurnState};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::prompt::PromptTemplate;
use crate::provider::{LlmError, LlmProvider};

/// Why a chat turn produced no reply.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("no API key configured")]
    MissingCredential,
    #[error("no cookbook text loaded")]
    MissingCorpus,
    #[error(transparent)]
    ExternalService(#[from] LlmError),
}

/// Runs chat turns against the generation service.
///
/// The provider is optional because the API key may only arrive after
/// startup; until one is installed every turn fails with
/// [`TurnError::MissingCredential`].
pub struct ChatDriver {
    provider: Option<Box<dyn LlmProvider>>,
    template: PromptTemplate,
    temperature: f32,
    max_tokens: u32,
}

impl ChatDriver {
    pub fn new(template: PromptTemplate, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider: None,
            template,
            temperature,
            max_tokens,
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Install or replace the credentialed provider.
    pub fn set_provider(&mut self, provider: Box<dyn LlmProvider>) {
        self.provider = Some(provider);
    }

    pub fn has_credential(&self) -> bool {
        self.provider.is_some()
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Run one turn: check preconditions, record the user's message, call
    /// the service once and record the reply.
    ///
    /// Precondition failures leave the log untouched. If the call itself
    /// fails, the user's turn stays in the log without a reply.
    pub async fn submit(&self, session: &mut Session, message: &str) -> Result<String, TurnError> {
        session.advance(TurnState::Submitted);

        let Some(provider) = self.provider.as_ref() else {
            session.advance(TurnState::Errored);
            return Err(TurnError::MissingCredential);
        };
        if session.corpus().is_empty() {
            session.advance(TurnState::Errored);
            return Err(TurnError::MissingCorpus);
        }

        let prompt = self
            .template
            .compose(session.corpus().as_str(), session.log().turns(), message);
        session.log_mut().push(ConversationTurn::user(message));

        debug!(
            session = %session.id,
            prompt_version = self.template.version(),
            prompt_chars = prompt.len(),
            history = session.log().len() - 1,
            "Sending chat turn"
        );
        session.advance(TurnState::CallingExternalService);

        match provider.complete(&prompt, self.temperature, self.max_tokens).await {
            Ok(reply) => {
                session.log_mut().push(ConversationTurn::assistant(reply.clone()));
                session.advance(TurnState::Rendered);
                info!(session = %session.id, turns = session.log().len(), "Chat turn rendered");
                Ok(reply)
            }
            Err(e) => {
                warn!(session = %session.id, error = %e, "Generation call failed");
                session.advance(TurnState::Errored);
                Err(TurnError::ExternalService(e))
            }
        }
    }
}
