use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use mediclerk_core::models::record::ClerkingRecord;
use mediclerk_forms::catalog::display_name;
use mediclerk_forms::registry::fields_for;

use crate::error::ExportError;

pub const DEFAULT_TEMPLATE_NAME: &str = "clerking_note.md";

/// Built-in layout: title block, then one `##` section per field.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/clerking_note.md.tera");

/// Template context for one record.
#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    pub id: String,
    pub title: String,
    pub specialty: String,
    pub created: String,
    pub patient_name: String,
    /// Schema fields in form order.
    pub sections: Vec<SectionView>,
    /// Note keys the specialty's schema does not define.
    pub extra: Vec<SectionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub key: String,
    pub label: String,
    /// Trimmed content, empty when nothing was recorded.
    pub value: String,
}

impl NoteView {
    pub fn from_record(record: &ClerkingRecord) -> Self {
        let fields = fields_for(&record.specialty);

        let sections = fields
            .iter()
            .map(|f| SectionView {
                key: f.key.clone(),
                label: f.label.clone(),
                value: record.note_value(&f.key).trim().to_string(),
            })
            .collect();

        let extra = record
            .clerking_note
            .iter()
            .filter(|(key, _)| !fields.iter().any(|f| &f.key == *key))
            .map(|(key, value)| SectionView {
                key: key.clone(),
                label: humanize_key(key),
                value: value.trim().to_string(),
            })
            .collect();

        let patient_name = record.patient_name();
        let title = if patient_name.is_empty() {
            "Clerking Note".to_string()
        } else {
            format!("Clerking Note: {patient_name}")
        };

        Self {
            id: record.id.to_string(),
            title,
            specialty: display_name(&record.specialty),
            created: record.created_at.strftime("%Y-%m-%d %H:%M UTC").to_string(),
            patient_name,
            sections,
            extra,
        }
    }
}

/// `family_and_social_history` → `Family And Social History`.
pub fn humanize_key(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render `record` with the built-in template.
pub fn render_record(record: &ClerkingRecord) -> Result<String, ExportError> {
    render_template(DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE, record)
}

/// Render a Tera template against a record's [`NoteView`].
///
/// `template_content` is the raw template string (Jinja2 syntax).
pub fn render_template(
    template_name: &str,
    template_content: &str,
    record: &ClerkingRecord,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let view = NoteView::from_record(record);
    let context = Context::from_value(serde_json::to_value(&view)?)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    debug!(
        record_id = %record.id,
        sections = view.sections.len(),
        extra = view.extra.len(),
        "clerking note rendered"
    );
    Ok(rendered)
}

/// Default file name for an exported record, e.g. `clerking-note-42-okafor.docx`.
pub fn export_file_name(record: &ClerkingRecord) -> String {
    let last_name: String = record
        .note_value(mediclerk_core::models::record::patient_keys::LAST_NAME)
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    if last_name.is_empty() {
        format!("clerking-note-{}.docx", record.id)
    } else {
        format!("clerking-note-{}-{last_name}.docx", record.id)
    }
}
