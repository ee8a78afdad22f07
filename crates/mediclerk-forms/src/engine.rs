//! The form engine: binds a specialty's field schema to live input state.
//!
//! One [`FormSession`] backs one form screen, in both create and edit mode.
//! Every field of the active schema owns a [`FieldCell`] (value, error,
//! dirty flag) indexed by key. Validation runs all at once on submit.
//!
//! Selecting a different specialty releases every cell of the previous
//! schema and bumps the session [`Generation`]. Asynchronous work started
//! against an older generation (a record fetch, a suggestion request) must
//! present its ticket when it completes and is dropped if the form has
//! moved on.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;

use mediclerk_core::models::payload::SubmissionPayload;
use mediclerk_core::models::record::{ClerkingNote, ClerkingRecord, RecordId};
use tracing::{debug, info, warn};

use crate::error::{FieldErrors, FormError, SubmitError, SubmitRejected};
use crate::registry::{SchemaRegistry, registry};
use crate::schema::FieldDefinition;

/// Identifies one binding of the session to a field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

impl FormMode {
    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Save Clerking Note",
            FormMode::Edit(_) => "Update Clerking Note",
        }
    }
}

/// Live state of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCell {
    value: String,
    error: Option<String>,
    dirty: bool,
}

impl FieldCell {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once the user has edited the field since it was last seeded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

pub struct FormSession {
    registry: &'static SchemaRegistry,
    specialty: Option<String>,
    fields: &'static [FieldDefinition],
    cells: HashMap<String, FieldCell>,
    mode: FormMode,
    busy: bool,
    generation: u64,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    /// An empty create-mode session against the compiled-in schemas.
    pub fn new() -> Self {
        Self::with_registry(registry())
    }

    pub fn with_registry(registry: &'static SchemaRegistry) -> Self {
        Self {
            registry,
            specialty: None,
            fields: &[],
            cells: HashMap::new(),
            mode: FormMode::Create,
            busy: false,
            generation: 0,
        }
    }

    /// An edit-mode session pre-populated from a stored record.
    pub fn for_record(record: &ClerkingRecord) -> Self {
        let mut session = Self::new();
        session.load_record(record);
        session
    }

    pub fn specialty(&self) -> Option<&str> {
        self.specialty.as_deref()
    }

    pub fn fields(&self) -> &'static [FieldDefinition] {
        self.fields
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// True while a submission is outstanding. The submit control should be
    /// disabled.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    pub fn cell(&self, key: &str) -> Option<&FieldCell> {
        self.cells.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(FieldCell::value)
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.cells.get(key).and_then(FieldCell::error)
    }

    /// Errors currently displayed, keyed by field.
    pub fn errors(&self) -> FieldErrors {
        self.cells
            .iter()
            .filter_map(|(key, cell)| cell.error.clone().map(|e| (key.clone(), e)))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.cells.values().any(|c| c.dirty)
    }

    /// Choose a specialty for a new note. Equivalent to initializing with
    /// no values.
    pub fn select_specialty(&mut self, specialty_id: &str) {
        self.initialize(specialty_id, &ClerkingNote::new());
    }

    /// Bind the session to a specialty's schema and seed values.
    ///
    /// A different specialty discards all prior values and errors before
    /// seeding. The same specialty merges: fields the user has edited keep
    /// their value, untouched fields take the supplied one.
    pub fn initialize(&mut self, specialty_id: &str, initial_values: &ClerkingNote) {
        let fields = self.registry.fields_for(specialty_id);
        if fields.is_empty() {
            warn!(specialty = specialty_id, "no schema for specialty, no form rendered");
        }
        self.initialize_with_fields(specialty_id, fields, initial_values);
    }

    /// [`initialize`](Self::initialize) with an explicit field list.
    pub fn initialize_with_fields(
        &mut self,
        specialty_id: &str,
        fields: &'static [FieldDefinition],
        initial_values: &ClerkingNote,
    ) {
        let same_list =
            self.specialty.as_deref() == Some(specialty_id) && std::ptr::eq(self.fields, fields);

        if same_list {
            self.merge(initial_values);
        } else {
            self.rebind(specialty_id, fields);
            self.seed(initial_values);
        }
    }

    /// Switch to edit mode for `record` and hydrate from its note.
    pub fn load_record(&mut self, record: &ClerkingRecord) {
        self.mode = FormMode::Edit(record.id.clone());
        self.initialize(&record.specialty, &record.clerking_note);
    }

    /// Apply a record fetched asynchronously, unless the session has been
    /// rebound since `ticket` was taken. Returns whether it was applied.
    pub fn apply_loaded_record(&mut self, ticket: Generation, record: &ClerkingRecord) -> bool {
        if ticket != self.generation() {
            debug!(
                record_id = %record.id,
                "discarding record loaded for a previous form generation"
            );
            return false;
        }
        self.load_record(record);
        true
    }

    /// Set one field's value. Last write wins; the field's error is cleared.
    pub fn set_field_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), FormError> {
        let cell = self
            .cells
            .get_mut(key)
            .ok_or_else(|| FormError::UnknownField {
                specialty: self.specialty.clone().unwrap_or_default(),
                key: key.to_string(),
            })?;
        cell.value = value.into();
        cell.dirty = true;
        cell.error = None;
        Ok(())
    }

    /// Check every field and record the failures on their cells.
    /// An empty map means the form is valid.
    pub fn validate(&mut self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in self.fields {
            let cell = self.cells.entry(field.key.clone()).or_default();
            match field.check(&cell.value) {
                Ok(()) => cell.error = None,
                Err(e) => {
                    cell.error = Some(e.message.clone());
                    errors.insert(e.key, e.message);
                }
            }
        }
        if !errors.is_empty() {
            debug!(failing = errors.len(), "form validation failed");
        }
        errors
    }

    /// Every field of the schema in order, values trimmed.
    pub fn snapshot(&self) -> ClerkingNote {
        self.fields
            .iter()
            .map(|f| {
                let value = self
                    .cells
                    .get(&f.key)
                    .map(|c| c.value.trim().to_string())
                    .unwrap_or_default();
                (f.key.clone(), value)
            })
            .collect()
    }

    /// Validate and, if clean, mark the session busy and return the payload
    /// to persist. Pair with [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SubmitRejected> {
        if self.busy {
            debug!("submit ignored, a submission is outstanding");
            return Err(SubmitRejected::Busy);
        }
        let specialty = match &self.specialty {
            Some(id) if !self.fields.is_empty() => id.clone(),
            _ => return Err(SubmitRejected::NoSpecialty),
        };

        let errors = self.validate();
        if !errors.is_empty() {
            return Err(SubmitRejected::Invalid(errors));
        }

        self.busy = true;
        Ok(SubmissionPayload {
            specialty,
            form_data: self.snapshot(),
        })
    }

    /// Settle an outstanding submission. Field values are never touched on
    /// failure so the user can resubmit.
    pub fn finish_submit<E: Display>(
        &mut self,
        result: Result<ClerkingRecord, E>,
    ) -> Result<ClerkingRecord, SubmitError<E>> {
        self.busy = false;
        match result {
            Ok(record) => {
                info!(record_id = %record.id, specialty = %record.specialty, "clerking note saved");
                for cell in self.cells.values_mut() {
                    cell.dirty = false;
                }
                Ok(record)
            }
            Err(e) => {
                warn!(error = %e, "clerking note submission failed");
                Err(SubmitError::Failed(e))
            }
        }
    }

    /// Validate, build the payload, and hand it to `persist`.
    ///
    /// `persist` is not called when validation fails or another submission
    /// is outstanding. Dropping the returned future while `persist` is
    /// pending releases the session again, keeping every value.
    pub async fn submit<F, Fut, E>(&mut self, persist: F) -> Result<ClerkingRecord, SubmitError<E>>
    where
        F: FnOnce(SubmissionPayload) -> Fut,
        Fut: Future<Output = Result<ClerkingRecord, E>>,
        E: Display,
    {
        let payload = self.begin_submit()?;
        let result = {
            let mut guard = InFlight {
                busy: &mut self.busy,
                settled: false,
            };
            let result = persist(payload).await;
            guard.settled = true;
            result
        };
        self.finish_submit(result)
    }

    fn rebind(&mut self, specialty_id: &str, fields: &'static [FieldDefinition]) {
        debug!(
            from = self.specialty.as_deref().unwrap_or("<none>"),
            to = specialty_id,
            fields = fields.len(),
            "binding form to specialty"
        );
        self.specialty = Some(specialty_id.to_string());
        self.fields = fields;
        self.cells = fields
            .iter()
            .map(|f| (f.key.clone(), FieldCell::default()))
            .collect();
        self.generation += 1;
    }

    fn seed(&mut self, values: &ClerkingNote) {
        for (key, value) in values {
            match self.cells.get_mut(key) {
                Some(cell) => cell.value = value.clone(),
                None => debug!(key = %key, "ignoring value outside the active schema"),
            }
        }
    }

    fn merge(&mut self, values: &ClerkingNote) {
        for (key, value) in values {
            match self.cells.get_mut(key) {
                Some(cell) if cell.dirty => {}
                Some(cell) => {
                    cell.value = value.clone();
                    cell.error = None;
                }
                None => debug!(key = %key, "ignoring value outside the active schema"),
            }
        }
    }
}

/// Clears the busy flag of a submission whose future was dropped before
/// `persist` resolved.
struct InFlight<'a> {
    busy: &'a mut bool,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("pending submission abandoned");
            *self.busy = false;
        }
    }
}
