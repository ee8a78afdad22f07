use std::collections::BTreeMap;

use thiserror::Error;

/// Field key → validation message, ordered by key.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown specialty: {0}")]
    UnknownSpecialty(String),

    #[error("duplicate field key '{key}' in specialty '{specialty}'")]
    DuplicateFieldKey { specialty: String, key: String },

    #[error("duplicate specialty id: {0}")]
    DuplicateSpecialty(String),

    #[error("unknown field '{key}' for specialty '{specialty}'")]
    UnknownField { specialty: String, key: String },
}

/// Why a submission never reached the persistence callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    #[error("a submission is already in progress")]
    Busy,

    #[error("no specialty selected")]
    NoSpecialty,
}

/// Outcome of a failed submission. `Failed` carries the persistence error
/// untouched so the caller can display it.
#[derive(Debug, Error)]
pub enum SubmitError<E> {
    #[error(transparent)]
    Rejected(#[from] SubmitRejected),

    #[error("{0}")]
    Failed(E),
}
