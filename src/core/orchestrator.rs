// src/core/orchestrator.rs - Conversation orchestration

use std::sync::Arc;
use std::time::Duration;

use super::context::build_context;
use super::intent::{IntentMatcher, KeywordMatcher};
use super::knowledge::{KnowledgeBase, FALLBACK_REPLY};
use super::picker::{choose, RandomPicker, ResponsePicker};
use super::session::{lock, SessionStore};
use super::suggestions;
use super::types::{Classification, Message, ProcessResult, ReplyRoute};
use crate::infra::clock::{Clock, SystemClock};
use crate::infra::errors::GatewayError;
use crate::provider::GenerationGateway;

/// Upper bound on a single gateway call.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Text and suggestions chosen for a bot reply.
struct Reply {
    text: String,
    suggestions: Vec<String>,
    route: ReplyRoute,
}

/// Routes each user message to a canned intent reply or to the generation
/// gateway, and records both sides of the exchange in the session.
///
/// `process` never fails: gateway errors and timeouts become the fallback
/// reply.
pub struct ConversationOrchestrator {
    store: Arc<SessionStore>,
    knowledge: Arc<KnowledgeBase>,
    matcher: Arc<dyn IntentMatcher>,
    gateway: Arc<dyn GenerationGateway>,
    picker: Arc<dyn ResponsePicker>,
    clock: Arc<dyn Clock>,
    gateway_timeout: Duration,
    /// Set by `with_matcher`; `with_knowledge` then leaves the matcher alone.
    custom_matcher: bool,
}

impl ConversationOrchestrator {
    /// Orchestrator with the default catalog, keyword matcher, random
    /// picker, and wall clock.
    pub fn new(store: Arc<SessionStore>, gateway: Arc<dyn GenerationGateway>) -> Self {
        let knowledge = Arc::new(KnowledgeBase::default());
        let matcher = Arc::new(KeywordMatcher::new(&knowledge));
        Self {
            store,
            knowledge,
            matcher,
            gateway,
            picker: Arc::new(RandomPicker),
            clock: Arc::new(SystemClock),
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
            custom_matcher: false,
        }
    }

    /// Replace the catalog. Rebuilds the keyword matcher from it unless a
    /// matcher was supplied with `with_matcher`, in either call order.
    pub fn with_knowledge(mut self, knowledge: KnowledgeBase, threshold: f64) -> Self {
        if !self.custom_matcher {
            self.matcher = Arc::new(KeywordMatcher::with_threshold(&knowledge, threshold));
        }
        self.knowledge = Arc::new(knowledge);
        self
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn IntentMatcher>) -> Self {
        self.matcher = matcher;
        self.custom_matcher = true;
        self
    }

    pub fn with_picker(mut self, picker: Arc<dyn ResponsePicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn gateway_id(&self) -> &str {
        self.gateway.id()
    }

    /// Handle one user message. A missing or unknown `session_id` starts a
    /// new session.
    pub async fn process(&self, message: &str, session_id: Option<&str>) -> ProcessResult {
        let session = self.store.get_or_create(session_id);
        let session_id = lock(&session).id.clone();

        self.store
            .append(&session, Message::user(message, self.clock.now()));

        let classification = self.matcher.classify(message);
        tracing::debug!(
            session_id = %session_id,
            category = %classification.category,
            score = classification.score,
            "Message classified"
        );

        let reply = match self.local_reply(&classification) {
            Some(reply) => reply,
            None => {
                // Lock released before the await below.
                let context = build_context(&lock(&session));
                self.remote_reply(message, &context).await
            }
        };

        let bot = Message::bot(reply.text, reply.suggestions, self.clock.now());
        self.store.append(&session, bot.clone());

        tracing::info!(
            session_id = %session_id,
            route = ?reply.route,
            "Reply recorded"
        );

        let context = lock(&session).context.clone();
        ProcessResult {
            session_id,
            message: bot,
            context,
            route: reply.route,
        }
    }

    /// Canned reply for a recognised intent. `None` sends the message to
    /// the gateway.
    fn local_reply(&self, classification: &Classification) -> Option<Reply> {
        if !classification.category.is_known() {
            return None;
        }
        let responses = self.knowledge.responses(classification.category);
        let text = choose(self.picker.as_ref(), responses)?;
        Some(Reply {
            text: text.clone(),
            suggestions: suggestions::for_intent(classification.category),
            route: ReplyRoute::Local(classification.category),
        })
    }

    async fn remote_reply(&self, message: &str, context: &str) -> Reply {
        match self.generate(message, context).await {
            Ok(text) => Reply {
                text,
                suggestions: suggestions::for_message(message),
                route: ReplyRoute::Remote,
            },
            Err(e) => {
                tracing::warn!(gateway = %self.gateway.id(), "Generation failed, using fallback: {}", e);
                Reply {
                    text: FALLBACK_REPLY.to_string(),
                    suggestions: suggestions::default_suggestions(),
                    route: ReplyRoute::Fallback,
                }
            }
        }
    }

    /// Single gateway attempt bounded by the configured timeout.
    async fn generate(&self, message: &str, context: &str) -> Result<String, GatewayError> {
        match tokio::time::timeout(self.gateway_timeout, self.gateway.generate(message, context))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(self.gateway_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::picker::MockResponsePicker;
    use crate::core::types::IntentCategory;
    use crate::provider::OfflineGateway;
    use async_trait::async_trait;

    struct EchoGateway;

    #[async_trait]
    impl GenerationGateway for EchoGateway {
        fn id(&self) -> &str {
            "echo"
        }

        async fn generate(&self, user_message: &str, _context: &str) -> Result<String, GatewayError> {
            Ok(format!("echo: {user_message}"))
        }
    }

    fn orchestrator(gateway: Arc<dyn GenerationGateway>) -> ConversationOrchestrator {
        ConversationOrchestrator::new(Arc::new(SessionStore::new()), gateway)
    }

    #[tokio::test]
    async fn test_local_reply_uses_picker() {
        let mut picker = MockResponsePicker::new();
        picker.expect_pick().withf(|len| *len == 3).return_const(2usize);
        let orch = orchestrator(Arc::new(OfflineGateway)).with_picker(Arc::new(picker));

        let result = orch.process("merhaba", None).await;
        let kb = KnowledgeBase::default();
        assert_eq!(result.message.text, kb.responses(IntentCategory::Greetings)[2]);
        assert_eq!(result.route, ReplyRoute::Local(IntentCategory::Greetings));
    }

    #[tokio::test]
    async fn test_unknown_goes_remote() {
        let orch = orchestrator(Arc::new(EchoGateway));
        let result = orch.process("ders programı nerede", None).await;
        assert_eq!(result.route, ReplyRoute::Remote);
        assert_eq!(result.message.text, "echo: ders programı nerede");
        assert_eq!(
            result.message.suggestions(),
            ["Ders Programı", "Sınav Takvimi", "Öğrenci İşleri"]
        );
    }

    #[tokio::test]
    async fn test_gateway_failure_falls_back() {
        let orch = orchestrator(Arc::new(OfflineGateway));
        let result = orch.process("xyz123", None).await;
        assert_eq!(result.route, ReplyRoute::Fallback);
        assert_eq!(result.message.text, FALLBACK_REPLY);
        assert_eq!(result.message.suggestions(), suggestions::DEFAULT_SUGGESTIONS);
    }

    #[tokio::test]
    async fn test_custom_knowledge_threshold() {
        let orch = orchestrator(Arc::new(EchoGateway)).with_knowledge(KnowledgeBase::default(), 0.9);
        let result = orch.process("merhaba nasılsın", None).await;
        assert_eq!(result.route, ReplyRoute::Remote);
    }

    /// Calls everything `thanks`, whatever the text.
    struct ThanksMatcher;

    impl IntentMatcher for ThanksMatcher {
        fn classify(&self, _text: &str) -> Classification {
            Classification {
                category: IntentCategory::Thanks,
                score: 1.0,
            }
        }
    }

    #[tokio::test]
    async fn test_custom_matcher_survives_knowledge_in_either_order() {
        let before = orchestrator(Arc::new(EchoGateway))
            .with_matcher(Arc::new(ThanksMatcher))
            .with_knowledge(KnowledgeBase::default(), 0.3);
        let after = orchestrator(Arc::new(EchoGateway))
            .with_knowledge(KnowledgeBase::default(), 0.3)
            .with_matcher(Arc::new(ThanksMatcher));

        for orch in [before, after] {
            let result = orch.process("ders programı nerede", None).await;
            assert_eq!(result.route, ReplyRoute::Local(IntentCategory::Thanks));
        }
    }

    #[tokio::test]
    async fn test_same_session_reused() {
        let orch = orchestrator(Arc::new(EchoGateway));
        let first = orch.process("merhaba", None).await;
        let second = orch.process("hello", Some(first.session_id.as_str())).await;
        assert_eq!(first.session_id, second.session_id);
        assert_eq!(orch.store().len(), 1);
        let session = orch.store().get(&first.session_id).unwrap();
        assert_eq!(lock(&session).message_count(), 4);
    }
}
