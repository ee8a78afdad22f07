use super::{HISTORY_ROWS, diagnosis, history, patient_identity};
use crate::Specialty;
use crate::schema::FieldDefinition;

/// Obstetrics & Gynaecology clerking pad.
pub struct ObsGyn;

impl Specialty for ObsGyn {
    fn id(&self) -> &'static str {
        "obstetrics and gynaecology"
    }

    fn name(&self) -> &'static str {
        "Obstetrics & Gynaecology"
    }

    fn description(&self) -> &'static str {
        "clerking pad for obstetrics and gynaecology"
    }

    fn icon(&self) -> &'static str {
        "icons/obs-gyn.svg"
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
                .required("Presenting complaints are required")
                .suggestions(true),
                history(
                    "history_of_presenting_complaints",
                    "History of Presenting Complaints",
                    "Enter history of presenting complaints",
                ),
                history(
                    "past_gynaecological_history",
                    "Past Gynaecological History",
                    "Enter past gynaecological history",
                ),
                history(
                    "past_obstetrical_history",
                    "Past Obstetrical History",
                    "Enter past obstetrical history",
                ),
                history(
                    "past_medical_history",
                    "Past Medical History",
                    "Enter past medical history",
                ),
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
