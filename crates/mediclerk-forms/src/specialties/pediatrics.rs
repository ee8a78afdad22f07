use super::{HISTORY_ROWS, diagnosis, history, patient_identity};
use crate::Specialty;
use crate::schema::FieldDefinition;

/// Pediatrics clerking pad.
/// Adds the birth, feeding, immunization and developmental histories.
pub struct Pediatrics;

impl Specialty for Pediatrics {
    fn id(&self) -> &'static str {
        "pediatrics"
    }

    fn name(&self) -> &'static str {
        "Pediatrics"
    }

    fn description(&self) -> &'static str {
        "clerking pad for pediatrics"
    }

    fn icon(&self) -> &'static str {
        "icons/pediatrics.svg"
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
                .required("Presenting complaints is required")
                .suggestions(true),
                history(
                    "history_of_presenting_complaints",
                    "History of Presenting Complaints",
                    "Enter history of presenting complaints",
                ),
                history(
                    "past_medical_history",
                    "Past Medical History",
                    "Enter past medical history",
                ),
                history("antenatal_history", "Antenatal History", "Enter antenatal history"),
                history("natal_history", "Natal History", "Enter natal history"),
                history("postnatal_history", "Postnatal History", "Enter postnatal history"),
                history(
                    "nutritional_history",
                    "Nutritional History",
                    "Enter nutritional history",
                ),
                history(
                    "immunization_history",
                    "Immunization History",
                    "Enter immunization history",
                ),
                history(
                    "growth_and_developmental_history",
                    "Growth and Developmental History",
                    "Enter growth and developmental history",
                ),
                history("drug_history", "Drug History", "Enter drug history"),
                history(
                    "family_and_social_history",
                    "Family and Social History",
                    "Enter family and social history",
                ),
                history("examinations", "Examinations", "Enter examinations"),
                diagnosis(),
            ]);
            fields
        });
        &FIELDS
    }
}
