//! Prompt construction for section follow-up questions.

use mediclerk_core::models::record::ClerkingNote;
use mediclerk_forms::catalog::display_name;

use crate::SuggestionRequest;

/// Build the full prompt for `request`.
///
/// Only sections with content are included in the clerking data block so
/// the model sees what is already documented.
pub fn build_prompt(request: &SuggestionRequest) -> String {
    let specialty = display_name(&request.specialty);
    let section = &request.section;
    let data = clerking_data_block(&request.snapshot);

    format!(
        "You are assisting a doctor clerking a {specialty} patient. Given the clerking \
information below, suggest specific clinical questions that should be asked to \
improve the \"{section}\" section.\n\
\n\
Rules:\n\
1. Every question must be about the {section} section.\n\
2. Do not ask about anything already documented in the clerking data. If the \
duration, character or timing of a symptom is recorded, do not ask about it again.\n\
3. Focus on new, clinically relevant information.\n\
4. Return as few questions as possible.\n\
5. Respond with ONLY a JSON array of strings, starting with [ and ending with ], \
with no markdown or explanation. Example: [\"question 1?\",\"question 2?\"]\n\
\n\
Clerking data:\n\
{data}\n"
    )
}

/// Pretty-printed JSON of the non-empty sections of `snapshot`.
pub fn clerking_data_block(snapshot: &ClerkingNote) -> String {
    let filled: ClerkingNote = snapshot
        .iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| (k.clone(), v.trim().to_string()))
        .collect();
    serde_json::to_string_pretty(&filled).unwrap_or_else(|_| "{}".to_string())
}
