// src/api/validation.rs - Inbound chat payload checks

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Rejections, worded for the end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Geçersiz mesaj formatı")]
    InvalidFormat,

    #[error("Mesaj boş olamaz")]
    Empty,

    #[error("Mesaj çok uzun (maksimum {0} karakter)")]
    TooLong(usize),

    #[error("Geçersiz içerik tespit edildi")]
    HarmfulContent,

    #[error("Geçersiz session ID")]
    InvalidSession,
}

/// A payload that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedChat {
    pub message: String,
    pub session_id: Option<String>,
}

pub struct MessageValidator {
    max_chars: usize,
    harmful: Vec<Regex>,
}

impl MessageValidator {
    pub fn new(max_chars: usize) -> Self {
        // Constant patterns; test_all_patterns_compile keeps them valid.
        let harmful = [
            r"(?is)<script\b.*?</script>",
            r"(?i)javascript:",
            r"(?i)on\w+\s*=",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect();
        Self { max_chars, harmful }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Check the message text alone.
    pub fn validate_message(&self, message: &Value) -> Result<String, ValidationError> {
        let text = match message {
            Value::String(s) if !s.is_empty() => s,
            _ => return Err(ValidationError::InvalidFormat),
        };
        if text.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        if text.chars().count() > self.max_chars {
            return Err(ValidationError::TooLong(self.max_chars));
        }
        if self.harmful.iter().any(|re| re.is_match(text)) {
            return Err(ValidationError::HarmfulContent);
        }
        Ok(text.clone())
    }

    /// `null`, absent, or empty ids mean "start a new session".
    pub fn validate_session(&self, session_id: &Value) -> Result<Option<String>, ValidationError> {
        match session_id {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            _ => Err(ValidationError::InvalidSession),
        }
    }

    pub fn validate(&self, message: &Value, session_id: &Value) -> Result<ValidatedChat, ValidationError> {
        let message = self.validate_message(message)?;
        let session_id = self.validate_session(session_id)?;
        Ok(ValidatedChat {
            message,
            session_id,
        })
    }
}
