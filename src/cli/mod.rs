// src/cli/mod.rs - CLI definition (clap derive)

pub mod chat;
pub mod serve;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::core::{ConversationOrchestrator, SessionStore};
use crate::infra::config::Config;
use crate::provider::GenerationGateway;

#[derive(Parser)]
#[command(
    name = "unibot",
    about = "University chat assistant: intent replies with a generative fallback",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP/WebSocket server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat in the terminal against the same engine
    Chat {
        /// Resume or name a session id
        #[arg(short, long)]
        session: Option<String>,
        /// Skip the generation backend; unknown messages get the fallback reply
        #[arg(long)]
        offline: bool,
    },
}

/// Wire an orchestrator from config around the given store and gateway.
pub fn build_orchestrator(
    config: &Config,
    store: Arc<SessionStore>,
    gateway: Arc<dyn GenerationGateway>,
) -> ConversationOrchestrator {
    ConversationOrchestrator::new(store, gateway)
        .with_knowledge(Default::default(), config.intents.threshold)
        .with_gateway_timeout(Duration::from_secs(config.gateway.timeout_seconds))
}

/// Session store honoring the configured history cap.
pub fn build_store(config: &Config) -> Arc<SessionStore> {
    Arc::new(SessionStore::new().with_max_messages(config.sessions.max_messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["unibot", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Serve { port } => assert_eq!(port, Some(8080)),
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_chat_with_global_config() {
        let cli = Cli::try_parse_from([
            "unibot", "chat", "--session", "abc", "--offline", "--config", "x.toml",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
        match cli.command {
            Commands::Chat { session, offline } => {
                assert_eq!(session.as_deref(), Some("abc"));
                assert!(offline);
            }
            _ => panic!("expected chat"),
        }
    }
}
