use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::conversation::ConversationLog;
use crate::corpus::DocumentCorpus;

/// Where the most recent chat turn stands.
///
/// `AwaitingInput → Submitted → CallingExternalService → {Rendered | Errored}`.
/// A turn that fails its preconditions goes straight from `Submitted` to
/// `Errored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    AwaitingInput,
    Submitted,
    CallingExternalService,
    Rendered,
    Errored,
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Rendered | TurnState::Errored)
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnState::AwaitingInput => "awaiting_input",
            TurnState::Submitted => "submitted",
            TurnState::CallingExternalService => "calling_external_service",
            TurnState::Rendered => "rendered",
            TurnState::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// In-memory state for one chat session: the conversation log and the
/// cookbook corpus. Nothing here outlives the process.
#[derive(Debug, Clone)]
pub struct Session {
    /// Timestamp-derived identifier, e.g. `20261018-093012`.
    pub id: String,
    pub created_at: DateTime<Utc>,
    log: ConversationLog,
    corpus: DocumentCorpus,
    turn_state: TurnState,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: now.format("%Y%m%d-%H%M%S").to_string(),
            created_at: now,
            log: ConversationLog::new(),
            corpus: DocumentCorpus::new(),
            turn_state: TurnState::AwaitingInput,
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ConversationLog {
        &mut self.log
    }

    pub fn corpus(&self) -> &DocumentCorpus {
        &self.corpus
    }

    pub fn corpus_mut(&mut self) -> &mut DocumentCorpus {
        &mut self.corpus
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn_state
    }

    pub fn advance(&mut self, state: TurnState) {
        debug!(session = %self.id, from = %self.turn_state, to = %state, "Turn state");
        self.turn_state = state;
    }

    /// Start a new conversation: drop every turn and the corpus.
    pub fn reset(&mut self) {
        self.log.clear();
        self.corpus.clear();
        self.turn_state = TurnState::AwaitingInput;
        debug!(session = %self.id, "Session reset");
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
