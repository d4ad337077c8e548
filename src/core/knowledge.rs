// src/core/knowledge.rs - Static intent catalog and canned replies

use super::types::IntentCategory;

/// Shown when the generation gateway cannot produce a reply.
pub const FALLBACK_REPLY: &str =
    "Üzgünüm, şu anda AI servisi kullanılamıyor. Size nasıl yardımcı olabilirim?";

/// One intent category: trigger substrings plus candidate replies.
#[derive(Debug, Clone)]
pub struct IntentEntry {
    pub category: IntentCategory,
    /// Lowercase trigger substrings.
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
}

/// Read-only intent catalog. Enumeration order is significant: it decides
/// ties in classification.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<IntentEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<IntentEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[IntentEntry] {
        &self.entries
    }

    pub fn get(&self, category: IntentCategory) -> Option<&IntentEntry> {
        self.entries.iter().find(|e| e.category == category)
    }

    /// Candidate replies for a category; empty for `Unknown` or a category
    /// missing from the catalog.
    pub fn responses(&self, category: IntentCategory) -> &[String] {
        self.get(category)
            .map(|e| e.responses.as_slice())
            .unwrap_or(&[])
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new(vec![
            IntentEntry {
                category: IntentCategory::Greetings,
                patterns: strings(&[
                    "merhaba",
                    "selam",
                    "hey",
                    "hi",
                    "hello",
                    "günaydın",
                    "iyi günler",
                ]),
                responses: strings(&[
                    "Merhaba! Ben Yaşar Üniversitesi Yapay Zeka Asistanı. Size nasıl yardımcı olabilirim? 😊",
                    "Selam! Yaşar Üniversitesi Yapay Zeka Asistanı buradayım. Bugün size nasıl yardımcı olabilirim?",
                    "Merhaba! Hoş geldiniz, Yaşar Üniversitesi Yapay Zeka Asistanı olarak size hizmet veriyorum.",
                ]),
            },
            IntentEntry {
                category: IntentCategory::Thanks,
                patterns: strings(&["teşekkür", "sağol", "thanks", "thank you", "teşekkürler"]),
                responses: strings(&[
                    "Rica ederim! Başka bir konuda yardıma ihtiyacınız olursa buradayım. 😊",
                    "Ne demek! Size yardımcı olabildiysem ne mutlu bana.",
                    "Rica ederim! Başka sorularınız varsa sormaktan çekinmeyin.",
                ]),
            },
            IntentEntry {
                category: IntentCategory::Goodbye,
                patterns: strings(&["görüşürüz", "hoşça kal", "bye", "goodbye", "çıkış", "kapat"]),
                responses: strings(&[
                    "Görüşmek üzere! İyi günler dilerim. 👋",
                    "Hoşça kalın! Tekrar görüşmek üzere.",
                    "İyi günler! Başka bir zaman tekrar bekleriz.",
                ]),
            },
        ])
    }
}
