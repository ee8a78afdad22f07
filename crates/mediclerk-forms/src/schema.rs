use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// How a field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum InputKind {
    /// Single-line input.
    Text,
    /// Multi-line input with a row-count hint.
    TextArea { rows: u16 },
}

/// A rule checked by the form engine on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "rule", rename_all = "snake_case")]
#[ts(export)]
pub enum ValidationRule {
    /// Value must contain something other than whitespace.
    Required { message: String },
    /// At least `min` characters once trimmed. Empty values are left to `Required`.
    MinLength { min: usize, message: String },
    /// At most `max` characters once trimmed.
    MaxLength { max: usize, message: String },
}

impl ValidationRule {
    /// Returns the rule's message if `value` violates it.
    fn check(&self, value: &str) -> Option<&str> {
        let trimmed = value.trim();
        match self {
            ValidationRule::Required { message } => trimmed.is_empty().then_some(message),
            ValidationRule::MinLength { min, message } => {
                (!trimmed.is_empty() && trimmed.chars().count() < *min).then_some(message)
            }
            ValidationRule::MaxLength { max, message } => {
                (trimmed.chars().count() > *max).then_some(message)
            }
        }
        .map(String::as_str)
    }
}

/// One section of a specialty's clerking form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldDefinition {
    /// Property name in the stored clerking note.
    pub key: String,
    pub label: String,
    pub input: InputKind,
    pub placeholder: String,
    pub rules: Vec<ValidationRule>,
    /// Whether AI follow-up questions may be requested for this section.
    pub ai_suggestions: bool,
}

impl FieldDefinition {
    pub fn text(key: &str, label: &str, placeholder: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            input: InputKind::Text,
            placeholder: placeholder.to_string(),
            rules: Vec::new(),
            ai_suggestions: false,
        }
    }

    pub fn textarea(key: &str, label: &str, placeholder: &str, rows: u16) -> Self {
        Self {
            input: InputKind::TextArea { rows },
            ..Self::text(key, label, placeholder)
        }
    }

    pub fn required(mut self, message: &str) -> Self {
        self.rules.push(ValidationRule::Required {
            message: message.to_string(),
        });
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn suggestions(mut self, enabled: bool) -> Self {
        self.ai_suggestions = enabled;
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules
            .iter()
            .any(|r| matches!(r, ValidationRule::Required { .. }))
    }

    /// Check `value` against the rules in declaration order; the first
    /// failing rule wins.
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        match self.rules.iter().find_map(|r| r.check(value)) {
            Some(message) => Err(ValidationError {
                key: self.key.clone(),
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{key}: {message}")]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}
