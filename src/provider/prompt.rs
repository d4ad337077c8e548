// src/provider/prompt.rs - Persona prompt template

use minijinja::{context, Environment};

use crate::infra::errors::GatewayError;

/// Default persona: Turkish-speaking assistant for Yaşar University.
pub const DEFAULT_PERSONA: &str = r#"Sen Yaşar Üniversitesi'nin yapay zeka asistanısın.

Görevin:
- Öğrencilere ve personel üyelerine Yaşar Üniversitesi hakkında bilgi vermek
- Akademik konularda yardım etmek
- Üniversite süreçleri hakkında rehberlik yapmak
- Türkçe olarak nazik ve profesyonel cevaplar vermek
- Kısa, net ve yararlı bilgiler sunmak

Yaşar Üniversitesi Bilgileri:
- Adres: Üniversite Caddesi, No: 37-39, Bornova, İzmir
- Telefon: 0232 411 50 00
- Email: info@yasar.edu.tr
- Web: www.yasar.edu.tr

Kurallar:
- Her zaman nazik ve yardımsever ol
- Türkçe cevap ver
- Kısa ve öz tut (maksimum 3-4 cümle)
- Emoji kullan (😊, 📚, 🎓, 📞, 📧)
- Yaşar Üniversitesi odaklı kal
- Öğrenci dostu dil kullan

Kullanıcı mesajı: {{ user_message }}
{% if context %}
Önceki konuşma bağlamı: {{ context }}
{% endif %}
Lütfen uygun bir cevap ver:"#;

/// Renders the generation prompt from a persona template.
///
/// The template sees two variables: `user_message` and `context` (empty
/// when the conversation has just started).
#[derive(Debug, Clone)]
pub struct PersonaPrompt {
    template: String,
}

impl Default for PersonaPrompt {
    fn default() -> Self {
        Self {
            template: DEFAULT_PERSONA.to_string(),
        }
    }
}

impl PersonaPrompt {
    /// Build from a custom template, checking that it renders.
    pub fn new(template: impl Into<String>) -> Result<Self, GatewayError> {
        let prompt = Self {
            template: template.into(),
        };
        prompt.render("", "").map_err(|e| GatewayError::Misconfigured {
            gateway: "prompt".into(),
            message: format!("invalid persona template: {e}"),
        })?;
        Ok(prompt)
    }

    pub fn render(&self, user_message: &str, context: &str) -> Result<String, minijinja::Error> {
        let env = Environment::new();
        env.render_str(
            &self.template,
            context! {
                user_message => user_message,
                context => context,
            },
        )
    }
}
