use super::{HISTORY_ROWS, diagnosis, history, patient_identity};
use crate::Specialty;
use crate::schema::FieldDefinition;

/// Surgery clerking pad. Replaces past medical history with past surgical
/// history.
pub struct Surgery;

impl Specialty for Surgery {
    fn id(&self) -> &'static str {
        "surgery"
    }

    fn name(&self) -> &'static str {
        "Surgery"
    }

    fn description(&self) -> &'static str {
        "clerking pad for surgery"
    }

    fn icon(&self) -> &'static str {
        "icons/surgery.svg"
    }

    fn fields(&self) -> &'static [FieldDefinition] {
        static FIELDS: std::sync::LazyLock<Vec<FieldDefinition>> = std::sync::LazyLock::new(|| {
            let mut fields = patient_identity();
            fields.extend([
                FieldDefinition::textarea(
                    "presenting_complaints",
                    "Presenting Complaints",
                    "Enter presenting complaints",
                    HISTORY_ROWS,
                )
                .required("Presenting complaint is required")
                .suggestions(true),
                history(
                    "history_of_presenting_complaints",
                    "History of Presenting Complaints",
                    "Enter history of presenting complaints",
                ),
                history(
                    "past_surgical_history",
                    "Past Surgical History",
                    "Enter past surgical history",
                ),
                history("drug_history", "Drug History", "Enter drug history"),
                history(
                    "family_and_social_history",
                    "Family and Social History",
                    "Enter family and social history",
                ),
                history("examinations", "Examinations", "Enter examination findings"),
                diagnosis(),
            ]);
            fields
        });
        &FIELDS
    }
}
