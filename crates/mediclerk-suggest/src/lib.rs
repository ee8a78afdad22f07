//! mediclerk-suggest
//!
//! AI follow-up questions for clerking sections. [`SuggestionService`] is
//! the model seam, [`gemini::GeminiSuggester`] its HTTP implementation, and
//! [`augmenter::SuggestionAugmenter`] tracks per-field request state for a
//! form screen.

pub mod augmenter;
pub mod error;
pub mod gemini;
pub mod parse;
pub mod prompt;

use async_trait::async_trait;
use mediclerk_core::models::record::ClerkingNote;

use error::SuggestError;

/// Everything the model needs to propose questions for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    /// Specialty id the note is being clerked under.
    pub specialty: String,
    pub field_key: String,
    /// Human-readable section label, e.g. "Presenting Complaints".
    pub section: String,
    /// Current form values, trimmed.
    pub snapshot: ClerkingNote,
}

#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Follow-up questions for `request.section`, most relevant first.
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestError>;
}
