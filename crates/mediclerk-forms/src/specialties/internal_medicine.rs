use super::{HISTORY_ROWS, diagnosis, history, patient_identity};
use crate::Specialty;
use crate::schema::FieldDefinition;

/// Internal Medicine clerking pad.
pub struct InternalMedicine;

impl Specialty for InternalMedicine {
    fn id(&self) -> &'static str {
        "internal medicine"
    }

    fn name(&self) -> &'static str {
        "Internal Medicine"
    }

    fn description(&self) -> &'static str {
        "clerking pad for internal medicine"
    }

    fn icon(&self) -> &'static str {
        "icons/medicine.svg"
    }

    fn fields(&self) -> &'static [FieldDefinition] {
        static FIELDS: std::sync::LazyLock<Vec<FieldDefinition>> = std::sync::LazyLock::new(|| {
            let mut fields = patient_identity();
            fields.extend([
                FieldDefinition::textarea(
                    "presenting_complaints",
                    "Presenting Complaints",
                    "Enter presenting complaint",
                    HISTORY_ROWS,
                )
                .required("Presenting complaints is required")
                .suggestions(true),
                history(
                    "history_of_presenting_complaints",
                    "History of Presenting Complaints",
                    "Enter history of presenting complaint",
                ),
                history(
                    "past_medical_history",
                    "Past Medical History",
                    "Enter past medical history",
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
