use std::cell::Cell;
use std::time::Duration;

use mediclerk_core::models::record::{ClerkingNote, ClerkingRecord, RecordId};
use mediclerk_forms::engine::{FormMode, FormSession};
use mediclerk_forms::error::{SubmitError, SubmitRejected};
use mediclerk_forms::registry::fields_for;

fn note(pairs: &[(&str, &str)]) -> ClerkingNote {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn saved(id: u64, specialty: &str, form_data: ClerkingNote) -> ClerkingRecord {
    ClerkingRecord {
        id: RecordId::from(id),
        specialty: specialty.to_string(),
        clerking_note: form_data,
        created_at: "2024-11-02T09:30:00Z".parse().unwrap(),
    }
}

fn fill_all(session: &mut FormSession) {
    for field in session.fields() {
        session
            .set_field_value(&field.key, format!("{} text", field.label))
            .unwrap();
    }
}

#[test]
fn all_empty_form_reports_one_error_per_required_field() {
    for specialty in ["internal medicine", "surgery", "pediatrics", "obstetrics and gynaecology"] {
        let mut session = FormSession::new();
        session.select_specialty(specialty);

        let errors = session.validate();
        let required: Vec<_> = fields_for(specialty)
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.key.clone())
            .collect();

        assert_eq!(errors.len(), required.len());
        for key in &required {
            assert!(errors.contains_key(key), "{specialty}: missing error for {key}");
            assert_eq!(session.error(key), errors.get(key).map(String::as_str));
        }
    }
}

#[tokio::test]
async fn empty_form_never_reaches_persistence() {
    let mut session = FormSession::new();
    session.select_specialty("pediatrics");
    let calls = Cell::new(0);

    let result = session
        .submit(|_payload| {
            calls.set(calls.get() + 1);
            async { Err::<ClerkingRecord, String>("unreachable".to_string()) }
        })
        .await;

    assert!(matches!(
        result,
        Err(SubmitError::Rejected(SubmitRejected::Invalid(_)))
    ));
    assert_eq!(calls.get(), 0);
    assert!(!session.is_busy());
}

#[test]
fn surgery_with_blank_biodata_fails_only_on_biodata() {
    let mut session = FormSession::new();
    session.select_specialty("surgery");
    fill_all(&mut session);
    session.set_field_value("patient_biodata", "   ").unwrap();

    let errors = session.validate();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get("patient_biodata").map(String::as_str),
        Some("Patient biodata is required")
    );

    assert!(matches!(
        session.begin_submit(),
        Err(SubmitRejected::Invalid(e)) if e == errors
    ));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn internal_medicine_submission_navigates_once_to_new_record() {
    let mut session = FormSession::new();
    session.select_specialty("internal medicine");
    fill_all(&mut session);

    let persisted = Cell::new(0);
    let mut navigations = Vec::new();

    let result = session
        .submit(|payload| {
            persisted.set(persisted.get() + 1);
            assert_eq!(payload.specialty, "internal medicine");
            assert_eq!(payload.form_data.len(), fields_for("internal medicine").len());
            async move { Ok::<_, String>(saved(42, &payload.specialty, payload.form_data)) }
        })
        .await;

    if let Ok(record) = &result {
        navigations.push(record.id.clone());
    }

    assert_eq!(persisted.get(), 1);
    assert_eq!(navigations, vec![RecordId::from(42)]);
    assert!(!session.is_busy());
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn failed_persistence_keeps_values_and_surfaces_message() {
    let mut session = FormSession::new();
    session.select_specialty("surgery");
    fill_all(&mut session);
    let before = session.snapshot();

    let result = session
        .submit(|_payload| async {
            Err::<ClerkingRecord, _>("Network error - please check your connection".to_string())
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Network error - please check your connection");
    assert_eq!(session.snapshot(), before);
    assert!(!session.is_busy());
    assert!(session.errors().is_empty());
}

#[test]
fn busy_session_rejects_a_second_submit() {
    let mut session = FormSession::new();
    session.select_specialty("surgery");
    fill_all(&mut session);

    let payload = session.begin_submit().unwrap();
    assert!(session.is_busy());
    assert_eq!(session.begin_submit(), Err(SubmitRejected::Busy));

    let record = saved(9, &payload.specialty, payload.form_data);
    assert!(session.finish_submit(Ok::<_, String>(record)).is_ok());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn abandoned_submit_releases_the_session() {
    let mut session = FormSession::new();
    session.select_specialty("surgery");
    fill_all(&mut session);
    let before = session.snapshot();

    let outcome = tokio::time::timeout(
        Duration::from_millis(10),
        session.submit(|_payload| std::future::pending::<Result<ClerkingRecord, String>>()),
    )
    .await;

    assert!(outcome.is_err());
    assert!(!session.is_busy());
    assert_eq!(session.snapshot(), before);
    assert!(session.begin_submit().is_ok());
}

#[test]
fn submit_without_specialty_is_rejected() {
    let mut session = FormSession::new();
    assert_eq!(session.begin_submit(), Err(SubmitRejected::NoSpecialty));

    session.select_specialty("dermatology");
    assert!(session.fields().is_empty());
    assert_eq!(session.begin_submit(), Err(SubmitRejected::NoSpecialty));
}

#[test]
fn edit_prefill_validates_clean() {
    let values: ClerkingNote = fields_for("obstetrics and gynaecology")
        .iter()
        .map(|f| (f.key.clone(), format!("recorded {}", f.key)))
        .collect();
    let record = saved(5, "obstetrics and gynaecology", values.clone());

    let mut session = FormSession::for_record(&record);

    assert_eq!(session.mode(), &FormMode::Edit(RecordId::from(5)));
    assert_eq!(session.mode().submit_label(), "Update Clerking Note");
    assert!(session.validate().is_empty());
    assert_eq!(session.snapshot(), values);
}

#[test]
fn switching_specialty_discards_previous_answers() {
    let mut session = FormSession::new();
    session.select_specialty("surgery");
    session.set_field_value("first_name", "Ada").unwrap();
    session.set_field_value("past_surgical_history", "Appendicectomy").unwrap();
    session.validate();
    assert!(!session.errors().is_empty());
    let first = session.generation();

    session.select_specialty("pediatrics");

    assert_ne!(session.generation(), first);
    assert!(session.errors().is_empty());
    assert!(session.cell("past_surgical_history").is_none());
    for field in session.fields() {
        assert_eq!(session.value(&field.key), Some(""), "{}", field.key);
    }
}

#[test]
fn late_edit_data_merges_without_clobbering_user_edits() {
    let mut session = FormSession::new();
    session.initialize("surgery", &ClerkingNote::new());
    session.set_field_value("drug_history", "user typed this").unwrap();

    session.initialize(
        "surgery",
        &note(&[
            ("drug_history", "from server"),
            ("diagnosis", "Acute appendicitis"),
            ("PC", "legacy key"),
        ]),
    );

    assert_eq!(session.value("drug_history"), Some("user typed this"));
    assert_eq!(session.value("diagnosis"), Some("Acute appendicitis"));
    assert!(session.cell("PC").is_none());
}

#[test]
fn stale_record_fetch_is_discarded() {
    let mut session = FormSession::new();
    let ticket = session.generation();
    session.select_specialty("surgery");

    let record = saved(3, "pediatrics", note(&[("first_name", "Ada")]));
    assert!(!session.apply_loaded_record(ticket, &record));
    assert_eq!(session.specialty(), Some("surgery"));
    assert_eq!(session.mode(), &FormMode::Create);

    let fresh = session.generation();
    assert!(session.apply_loaded_record(fresh, &record));
    assert_eq!(session.specialty(), Some("pediatrics"));
    assert_eq!(session.value("first_name"), Some("Ada"));
}

#[test]
fn editing_clears_only_that_fields_error() {
    let mut session = FormSession::new();
    session.select_specialty("internal medicine");
    session.validate();

    session.set_field_value("first_name", "Ada").unwrap();

    assert_eq!(session.error("first_name"), None);
    assert_eq!(session.error("last_name"), Some("Patient last name is required"));
}

#[test]
fn unknown_field_is_rejected() {
    let mut session = FormSession::new();
    session.select_specialty("surgery");
    assert!(session.set_field_value("antenatal_history", "x").is_err());
}

#[test]
fn payload_values_are_trimmed_and_cover_every_field() {
    let mut session = FormSession::new();
    session.select_specialty("surgery");
    fill_all(&mut session);
    session.set_field_value("diagnosis", "  Hernia \n").unwrap();

    let payload = session.begin_submit().unwrap();
    assert_eq!(payload.form_data.get("diagnosis").map(String::as_str), Some("Hernia"));
    assert_eq!(payload.form_data.len(), fields_for("surgery").len());
}
