// src/core/suggestions.rs - Quick-reply suggestion sets

use super::types::IntentCategory;

pub const DEFAULT_SUGGESTIONS: [&str; 3] = ["Üniversite Bilgileri", "Akademik Destek", "İletişim"];

const THANKS_SUGGESTIONS: [&str; 2] = ["Başka soru", "Yardım al"];
const GOODBYE_SUGGESTIONS: [&str; 1] = ["Tekrar görüşürüz"];

/// Keyword groups checked against the user's message, in precedence order.
const KEYWORD_GROUPS: [(&[&str], [&str; 3]); 3] = [
    (
        &["üniversite", "yaşar"],
        ["Kampüs Bilgileri", "Bölümler", "Öğrenci Hayatı"],
    ),
    (
        &["akademik", "ders", "sınav"],
        ["Ders Programı", "Sınav Takvimi", "Öğrenci İşleri"],
    ),
    (&["iletişim", "telefon", "email"], ["Telefon", "Email", "Adres"]),
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The default suggestion triple.
pub fn default_suggestions() -> Vec<String> {
    owned(&DEFAULT_SUGGESTIONS)
}

/// Fixed suggestions for a matched intent.
pub fn for_intent(category: IntentCategory) -> Vec<String> {
    match category {
        IntentCategory::Thanks => owned(&THANKS_SUGGESTIONS),
        IntentCategory::Goodbye => owned(&GOODBYE_SUGGESTIONS),
        IntentCategory::Greetings | IntentCategory::Unknown => default_suggestions(),
    }
}

/// Suggestions inferred from keywords in the user's message. The first
/// matching group wins.
pub fn for_message(message: &str) -> Vec<String> {
    let lowered = message.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, labels)| owned(labels))
        .unwrap_or_else(default_suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greetings_get_default_triple() {
        assert_eq!(
            for_intent(IntentCategory::Greetings),
            vec!["Üniversite Bilgileri", "Akademik Destek", "İletişim"]
        );
    }

    #[test]
    fn test_thanks_and_goodbye() {
        assert_eq!(for_intent(IntentCategory::Thanks), vec!["Başka soru", "Yardım al"]);
        assert_eq!(for_intent(IntentCategory::Goodbye), vec!["Tekrar görüşürüz"]);
    }

    #[test]
    fn test_unknown_intent_gets_default() {
        assert_eq!(for_intent(IntentCategory::Unknown), default_suggestions());
    }

    #[test]
    fn test_university_keywords() {
        assert_eq!(
            for_message("Yaşar hakkında bilgi"),
            vec!["Kampüs Bilgileri", "Bölümler", "Öğrenci Hayatı"]
        );
    }

    #[test]
    fn test_academic_keywords() {
        assert_eq!(
            for_message("sınav ne zaman?"),
            vec!["Ders Programı", "Sınav Takvimi", "Öğrenci İşleri"]
        );
    }

    #[test]
    fn test_contact_keywords() {
        assert_eq!(for_message("email adresi"), vec!["Telefon", "Email", "Adres"]);
    }

    #[test]
    fn test_group_precedence() {
        // Mentions both the university and an exam: first group wins.
        assert_eq!(
            for_message("üniversite sınav takvimi"),
            vec!["Kampüs Bilgileri", "Bölümler", "Öğrenci Hayatı"]
        );
    }

    #[test]
    fn test_no_keywords_falls_back_to_default() {
        assert_eq!(for_message("tell me something obscure"), default_suggestions());
    }
}
