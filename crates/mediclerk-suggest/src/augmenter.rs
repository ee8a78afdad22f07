//! Per-field suggestion state for one form screen.
//!
//! Each AI-eligible field moves `Idle → Loading → Shown`, falling back to
//! `Idle` when the request fails or the suggestions are cleared. At most one
//! request per field is outstanding. Rebinding to another specialty or
//! closing the screen bumps an epoch so late answers are dropped.
//!
//! The state lock is never held across the model call.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use mediclerk_core::models::record::ClerkingNote;
use mediclerk_forms::schema::FieldDefinition;
use tracing::{debug, warn};

use crate::{SuggestionRequest, SuggestionService};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuggestionState {
    #[default]
    Idle,
    Loading,
    Shown(Vec<String>),
}

#[derive(Default)]
struct Inner {
    specialty: Option<String>,
    fields: &'static [FieldDefinition],
    states: HashMap<String, SuggestionState>,
    epoch: u64,
    closed: bool,
}

pub struct SuggestionAugmenter<S> {
    service: S,
    inner: Mutex<Inner>,
}

impl<S: SuggestionService> SuggestionAugmenter<S> {
    /// An augmenter with no fields bound. Call [`reset`](Self::reset) once a
    /// specialty is selected.
    pub fn new(service: S) -> Self {
        Self {
            service,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind to a specialty's field list, discarding all suggestions and
    /// any answers still in flight.
    pub fn reset(&self, specialty_id: &str, fields: &'static [FieldDefinition]) {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.closed = false;
        inner.specialty = Some(specialty_id.to_string());
        inner.fields = fields;
        inner.states = fields
            .iter()
            .filter(|f| f.ai_suggestions)
            .map(|f| (f.key.clone(), SuggestionState::Idle))
            .collect();
        debug!(specialty = specialty_id, epoch = inner.epoch, "suggestions reset");
    }

    /// The screen is going away. Later results are dropped and no new
    /// requests start.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.closed = true;
        inner.states.clear();
    }

    pub fn state(&self, field_key: &str) -> Option<SuggestionState> {
        self.lock().states.get(field_key).cloned()
    }

    /// Questions currently shown for `field_key`, if any.
    pub fn suggestions(&self, field_key: &str) -> Option<Vec<String>> {
        match self.lock().states.get(field_key) {
            Some(SuggestionState::Shown(questions)) => Some(questions.clone()),
            _ => None,
        }
    }

    pub fn is_loading(&self, field_key: &str) -> bool {
        matches!(self.lock().states.get(field_key), Some(SuggestionState::Loading))
    }

    /// Ask the model for follow-up questions on one section.
    ///
    /// Returns `None` without calling the service when the field is unknown,
    /// not eligible, or already loading. Service failures are logged and
    /// also yield `None`; the field goes back to idle, as it does when the
    /// returned future is dropped early. The form's values are only read.
    pub async fn request_suggestions(
        &self,
        field_key: &str,
        snapshot: &ClerkingNote,
    ) -> Option<Vec<String>> {
        let (request, epoch) = {
            let mut inner = self.lock();
            if inner.closed {
                return None;
            }
            let fields = inner.fields;
            let Some(field) = fields.iter().find(|f| f.key == field_key) else {
                debug!(field = field_key, "suggestions requested for unknown field");
                return None;
            };
            if !field.ai_suggestions {
                debug!(field = field_key, "field is not eligible for suggestions");
                return None;
            }
            let section = field.label.clone();
            let specialty = inner.specialty.clone()?;

            let state = inner.states.entry(field_key.to_string()).or_default();
            if *state == SuggestionState::Loading {
                debug!(field = field_key, "suggestion request already outstanding");
                return None;
            }
            *state = SuggestionState::Loading;

            let request = SuggestionRequest {
                specialty,
                field_key: field_key.to_string(),
                section,
                snapshot: snapshot.clone(),
            };
            (request, inner.epoch)
        };

        let mut pending = Pending {
            inner: &self.inner,
            field_key,
            epoch,
            settled: false,
        };
        let result = self.service.suggest(&request).await;
        pending.settled = true;

        let mut inner = self.lock();
        if inner.epoch != epoch {
            debug!(field = field_key, "discarding suggestions for a previous form");
            return None;
        }
        match result {
            Ok(questions) => {
                inner.states.insert(
                    field_key.to_string(),
                    SuggestionState::Shown(questions.clone()),
                );
                Some(questions)
            }
            Err(e) => {
                warn!(field = field_key, error = %e, "failed to fetch suggestions");
                inner
                    .states
                    .insert(field_key.to_string(), SuggestionState::Idle);
                None
            }
        }
    }

    /// Dismiss the questions shown for `field_key`. No network call.
    pub fn clear_suggestions(&self, field_key: &str) {
        if let Some(state @ SuggestionState::Shown(_)) = self.lock().states.get_mut(field_key) {
            *state = SuggestionState::Idle;
        }
    }
}

/// Puts a field back to `Idle` when its request future is dropped before
/// the model answers.
struct Pending<'a> {
    inner: &'a Mutex<Inner>,
    field_key: &'a str,
    epoch: u64,
    settled: bool,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.epoch != self.epoch {
            return;
        }
        if let Some(state @ SuggestionState::Loading) = inner.states.get_mut(self.field_key) {
            debug!(field = self.field_key, "suggestion request abandoned");
            *state = SuggestionState::Idle;
        }
    }
}
