// src/core/context.rs - Recent-turn context window for generation

use super::types::{Message, Session};

/// Number of trailing messages rendered into the context.
pub const CONTEXT_WINDOW: usize = 4;

/// Render the last few turns as `sender: text` lines.
///
/// Returns an empty string until the session holds more than one full
/// exchange (two messages). Older turns are dropped, not summarized.
pub fn build_context(session: &Session) -> String {
    render_window(&session.messages)
}

fn render_window(messages: &[Message]) -> String {
    if messages.len() <= 2 {
        return String::new();
    }
    let start = messages.len().saturating_sub(CONTEXT_WINDOW);
    messages[start..]
        .iter()
        .map(|m| format!("{}: {}", m.sender, m.text))
        .collect::<Vec<_>>()
        .join("\n")
}
