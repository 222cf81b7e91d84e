pub mod config;
pub mod conversation;
pub mod corpus;
pub mod session;

pub use config::Config;
pub use conversation::{ConversationLog, ConversationTurn, Role};
pub use corpus::{truncate_chars, DocumentCorpus};
pub use session::{Session, TurnState};
