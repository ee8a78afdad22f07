//! REST path conventions.
//!
//! Pure string functions relative to the API base URL (for example
//! `http://localhost:8000/api`). These define the canonical layout of the
//! clerking backend.

use crate::models::record::RecordId;

pub const LOGIN: &str = "auth/login";

pub const REGISTER: &str = "auth/register";

pub const CREATE_RECORD: &str = "clerk-note";

pub const LIST_RECORDS: &str = "clerkpad/retrieve";

pub fn retrieve_record(id: &RecordId) -> String {
    format!("clerkpad/retrieve/{id}")
}

pub fn update_record(id: &RecordId) -> String {
    format!("clerkpad/update/{id}")
}

pub fn delete_record(id: &RecordId) -> String {
    format!("clerkpad/delete/{id}")
}

/// Join a base URL and a relative endpoint path with exactly one slash.
pub fn join(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
