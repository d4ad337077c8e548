// src/core/mod.rs - Conversation orchestration engine

pub mod context;
pub mod intent;
pub mod knowledge;
pub mod orchestrator;
pub mod picker;
pub mod session;
pub mod suggestions;
pub mod types;

pub use orchestrator::ConversationOrchestrator;
pub use session::{SessionHandle, SessionStore};
pub use types::{IntentCategory, Message, ProcessResult, ReplyRoute, Sender, Session};
