// src/cli/chat.rs - Interactive REPL

use std::sync::Arc;

use crate::core::ProcessResult;
use crate::infra::config::Config;
use crate::provider::{GeminiGateway, GenerationGateway, OfflineGateway};

/// Run the interactive chat REPL against an in-process orchestrator.
pub async fn run_chat(config: &Config, session: Option<String>, offline: bool) -> anyhow::Result<()> {
    let gateway: Arc<dyn GenerationGateway> = if offline {
        Arc::new(OfflineGateway)
    } else {
        Arc::new(GeminiGateway::from_config(&config.gateway)?)
    };

    let orchestrator = super::build_orchestrator(config, super::build_store(config), gateway);

    eprintln!(
        "unibot v{} | {} | /session shows the id, /quit exits\n",
        env!("CARGO_PKG_VERSION"),
        orchestrator.gateway_id(),
    );

    let mut session_id = session;

    loop {
        let input = match inquire::Text::new(">").prompt_skippable() {
            Ok(Some(line)) => line,
            // Esc, Ctrl-C, or a closed stdin
            Ok(None) | Err(_) => break,
        };
        let trimmed = input.trim();

        match trimmed {
            "" => continue,
            "/quit" | "/exit" => break,
            "/session" => {
                match session_id.as_deref() {
                    Some(id) => println!("session: {id}"),
                    None => println!("session: (none yet)"),
                }
                continue;
            }
            _ if trimmed.starts_with('/') => {
                println!("Unknown command: {trimmed}");
                continue;
            }
            _ => {}
        }

        let result = orchestrator.process(trimmed, session_id.as_deref()).await;
        print_reply(&result);
        session_id = Some(result.session_id);
    }

    Ok(())
}

fn print_reply(result: &ProcessResult) {
    println!("{}", result.message.text);
    let suggestions = result.message.suggestions();
    if !suggestions.is_empty() {
        println!("  [{}]", suggestions.join(" | "));
    }
    println!();
}
