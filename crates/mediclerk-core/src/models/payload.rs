use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::record::ClerkingNote;

/// Body of a create request: the specialty plus every field of its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionPayload {
    pub specialty: String,
    pub form_data: ClerkingNote,
}

/// Body of an update request. The note is replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdatePayload {
    pub form_data: ClerkingNote,
}

impl From<SubmissionPayload> for UpdatePayload {
    fn from(payload: SubmissionPayload) -> Self {
        Self {
            form_data: payload.form_data,
        }
    }
}
