// src/provider/mod.rs - Generation gateway layer

pub mod google;
pub mod prompt;

use async_trait::async_trait;

use crate::infra::errors::GatewayError;

pub use google::GeminiGateway;
pub use prompt::PersonaPrompt;

/// Remote text generation. Given the raw user message and a rendered
/// context window, returns reply text or fails.
///
/// Implementations make a single attempt; callers decide what a failure
/// means.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    fn id(&self) -> &str;

    async fn generate(&self, user_message: &str, context: &str) -> Result<String, GatewayError>;
}

/// Gateway that always fails. Used when no backend is configured so the
/// bot still answers with the fallback reply.
pub struct OfflineGateway;

#[async_trait]
impl GenerationGateway for OfflineGateway {
    fn id(&self) -> &str {
        "offline"
    }

    async fn generate(&self, _user_message: &str, _context: &str) -> Result<String, GatewayError> {
        Err(GatewayError::Unavailable {
            gateway: "offline".into(),
            message: "no generation backend configured".into(),
        })
    }
}
