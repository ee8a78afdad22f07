pub mod internal_medicine;
pub mod obs_gyn;
pub mod pediatrics;
pub mod surgery;

use crate::schema::FieldDefinition;

/// Row hint for history sections.
const HISTORY_ROWS: u16 = 4;

/// Patient identification sections shared by every clerking pad, in order.
fn patient_identity() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::text("first_name", "First Name", "Enter patient first name")
            .required("Patient first name is required"),
        FieldDefinition::text("last_name", "Last Name", "Enter patient last name")
            .required("Patient last name is required"),
        FieldDefinition::textarea(
            "patient_biodata",
            "Patient Biodata",
            "Enter remaining patient biodata",
            HISTORY_ROWS,
        )
        .required("Patient biodata is required"),
    ]
}

/// An optional free-text history section that supports AI follow-up questions.
fn history(key: &str, label: &str, placeholder: &str) -> FieldDefinition {
    FieldDefinition::textarea(key, label, placeholder, HISTORY_ROWS).suggestions(true)
}

fn diagnosis() -> FieldDefinition {
    FieldDefinition::text("diagnosis", "Diagnosis", "Enter diagnosis")
}
